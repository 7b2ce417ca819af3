//! IPv4 CIDR math for the segment trie.

use crate::error::TreeError;
use std::net::Ipv4Addr;
use std::str::FromStr;

pub const MAX_LENGTH: u8 = 32;

/// An IPv4 CIDR block: base address plus prefix length.
///
/// A block with mask `m` spans `2^(32-m)` consecutive addresses starting
/// at `addr`.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Ipv4 {
    pub addr: Ipv4Addr,
    pub mask: u8,
}

impl Ipv4 {
    /// Parse a CIDR string like `10.0.0.0/16`.
    ///
    /// Strict: exactly one `/`, a four-component dotted quad with each
    /// component in 0..=255, and a prefix length in 0..=32.
    pub fn new(addr_cidr: &str) -> Result<Ipv4, TreeError> {
        let addr_cidr = addr_cidr.trim();
        let parts: Vec<&str> = addr_cidr.split('/').collect();
        if parts.len() != 2 {
            return Err(TreeError::Format(format!("invalid CIDR: {addr_cidr}")));
        }
        let addr = parse_addr(parts[0])?;
        let mask = u8::from_str(parts[1])
            .map_err(|_| TreeError::Format(format!("invalid prefix length: {}", parts[1])))?;
        if mask > MAX_LENGTH {
            return Err(TreeError::Format(format!("prefix length too long: {addr_cidr}")));
        }
        Ok(Ipv4 { addr, mask })
    }

    /// Number of addresses covered by this block.
    pub fn size(&self) -> u64 {
        1u64 << (MAX_LENGTH - self.mask)
    }

    /// Size of each of the two halves produced by one more prefix bit.
    pub fn half_size(&self) -> u64 {
        self.size() / 2
    }

    /// Check if an IP address is contained within this block.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        let base = u32::from(self.addr) as u64;
        let ip = u32::from(ip) as u64;
        ip >= base && ip < base + self.size()
    }

    /// The lower (0) or upper (1) half of this block, one bit more specific.
    pub fn child(&self, index: usize) -> Ipv4 {
        debug_assert!(index < 2, "child index must be 0 or 1");
        debug_assert!(self.mask < MAX_LENGTH, "cannot subdivide a /32");
        let base = u32::from(self.addr) as u64 + self.half_size() * index as u64;
        Ipv4 {
            addr: Ipv4Addr::from(base as u32),
            mask: self.mask + 1,
        }
    }
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

/// Parse a bare dotted quad (no prefix length).
pub fn parse_addr(s: &str) -> Result<Ipv4Addr, TreeError> {
    Ipv4Addr::from_str(s.trim())
        .map_err(|_| TreeError::Format(format!("invalid IPv4 address: {s}")))
}
