//! Output formatting for the subnet tree.
//!
//! - [`diagram`] - ASCII box-drawing renderer for segment tries
//! - [`terminal`] - ANSI colorization and stdout printing

pub mod diagram;
pub mod terminal;

pub use diagram::{build_table, merge_line_blocks};
pub use terminal::{colorize, print_diagrams};
