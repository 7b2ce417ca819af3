//! Binary trie over CIDR blocks.
//!
//! Each [`Segment`] covers one CIDR block and owns at most two children,
//! the two halves produced by extending the prefix by one bit. Declared
//! blocks (VPCs, subnets) carry a label; nodes created only to route the
//! trie carry none and render as `NotAllocated` gaps.

use super::ipv4::{Ipv4, MAX_LENGTH};
use crate::error::TreeError;
use std::net::Ipv4Addr;

/// A network interface attached to a declared subnet segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub addr: Ipv4Addr,
    pub info1: String,
    pub info2: String,
}

/// A node in the CIDR trie.
///
/// `children` is `None` until the block is subdivided; once allocated it
/// holds two slots, `[0]` for the lower half and `[1]` for the upper half.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    cidr: Ipv4,
    label: Option<String>,
    children: Option<Box<[Option<Segment>; 2]>>,
    hosts: Vec<Host>,
}

impl Segment {
    pub fn new(cidr: Ipv4, label: Option<String>) -> Segment {
        Segment {
            cidr,
            label,
            children: None,
            hosts: Vec::new(),
        }
    }

    /// A synthetic routing node: no label, no hosts.
    fn placeholder(cidr: Ipv4) -> Segment {
        Segment::new(cidr, None)
    }

    pub fn cidr(&self) -> Ipv4 {
        self.cidr
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// True once the block has been subdivided (at least one child slot
    /// was touched by [`insert`](Segment::insert) or
    /// [`get_or_create_child`](Segment::get_or_create_child)).
    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    /// Check if an IP address falls within this segment's block.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        self.cidr.contains(ip)
    }

    /// Longest existing chain of children below this node.
    pub fn max_depth(&self) -> usize {
        match &self.children {
            None => 0,
            Some(children) => children
                .iter()
                .flatten()
                .map(|child| child.max_depth() + 1)
                .max()
                .unwrap_or(0),
        }
    }

    /// Insert a declared block as a descendant of this segment.
    ///
    /// Strict: the block must be strictly more specific than this one,
    /// its base address must land on the binary subdivision grid, and it
    /// must not overlap an already declared block. Any violation is a
    /// [`TreeError::Alignment`].
    pub fn insert(&mut self, segment: Segment) -> Result<(), TreeError> {
        if segment.cidr.mask <= self.cidr.mask || self.cidr.mask >= MAX_LENGTH {
            return Err(self.misaligned(&segment));
        }
        let base = u32::from(self.cidr.addr) as u64;
        let addr = u32::from(segment.cidr.addr) as u64;
        let half = self.cidr.half_size();

        if segment.cidr.mask == self.cidr.mask + 1 {
            // Direct child: must be exactly one of the two halves.
            let slot = if addr == base {
                0
            } else if addr == base + half {
                1
            } else {
                return Err(self.misaligned(&segment));
            };
            let parent_cidr = self.cidr;
            let children = self.children.get_or_insert_with(|| Box::new([None, None]));
            return match children[slot].take() {
                None => {
                    children[slot] = Some(segment);
                    Ok(())
                }
                // A placeholder here means deeper blocks were already
                // routed through this half; adopt them so sibling
                // insertion order does not matter.
                Some(existing) if existing.label.is_none() && existing.hosts.is_empty() => {
                    let mut segment = segment;
                    debug_assert!(segment.children.is_none());
                    segment.children = existing.children;
                    children[slot] = Some(segment);
                    Ok(())
                }
                // A declared block in this slot is a duplicate or overlap.
                Some(existing) => {
                    children[slot] = Some(existing);
                    Err(TreeError::Alignment {
                        parent: parent_cidr.to_string(),
                        child: segment.cidr.to_string(),
                    })
                }
            };
        }

        // Deeper descendant: route through the matching half, creating a
        // placeholder when that half was never declared.
        let offset = match addr.checked_sub(base) {
            Some(offset) => offset,
            None => return Err(self.misaligned(&segment)),
        };
        let index = (offset / half) as usize;
        if index >= 2 {
            return Err(self.misaligned(&segment));
        }
        let child_cidr = self.cidr.child(index);
        let children = self.children.get_or_insert_with(|| Box::new([None, None]));
        children[index]
            .get_or_insert_with(|| Segment::placeholder(child_cidr))
            .insert(segment)
    }

    /// Return the child covering half `index`, creating a placeholder if
    /// that half was never declared. Permissive counterpart of
    /// [`insert`](Segment::insert), used by the renderer to materialize
    /// `NotAllocated` branches.
    pub fn get_or_create_child(&mut self, index: usize) -> &mut Segment {
        let child_cidr = self.cidr.child(index);
        let children = self.children.get_or_insert_with(|| Box::new([None, None]));
        children[index].get_or_insert_with(|| Segment::placeholder(child_cidr))
    }

    /// Append a host record. No dedup, no ordering at append time.
    pub fn add_host(&mut self, addr: Ipv4Addr, info1: String, info2: String) {
        self.hosts.push(Host { addr, info1, info2 });
    }

    /// Hosts ordered by ascending address; ties keep insertion order.
    pub fn sorted_hosts(&self) -> Vec<&Host> {
        let mut hosts: Vec<&Host> = self.hosts.iter().collect();
        hosts.sort_by_key(|host| host.addr);
        hosts
    }

    fn misaligned(&self, segment: &Segment) -> TreeError {
        TreeError::Alignment {
            parent: self.cidr.to_string(),
            child: segment.cidr.to_string(),
        }
    }
}
