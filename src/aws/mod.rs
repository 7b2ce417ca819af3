//! AWS integration: fetching EC2 inventory through the `aws` CLI.
//!
//! - [`cli`] - command execution
//! - [`ec2`] - paginated describe-* calls flattened into records
//! - [`cache`] - dated JSON read-through cache

pub mod cache;
pub mod cli;
pub mod ec2;

pub use cache::{read_inventory_cache, Inventory};
