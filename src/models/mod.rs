//! Domain models for the subnet tree.
//!
//! - [`Ipv4`] - CIDR block math
//! - [`Segment`] - binary trie node over CIDR blocks
//! - [`VpcRecord`], [`SubnetRecord`], [`NicRecord`] - flat provider records

mod ipv4;
mod records;
mod segment;

pub use ipv4::{parse_addr, Ipv4, MAX_LENGTH};
pub use records::{NicRecord, SubnetRecord, VpcRecord};
pub use segment::{Host, Segment};
