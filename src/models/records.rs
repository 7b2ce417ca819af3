//! Flat provider records, as produced by the AWS fetch layer and stored
//! in the inventory cache. CIDRs and addresses stay plain strings here;
//! the tree builder parses and validates them.

use serde::{Deserialize, Serialize};

/// A VPC: one top-level CIDR block.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VpcRecord {
    pub cidr: String,
    pub vpc_id: String,
    /// Value of the `Name` tag, `-` when untagged.
    pub name: String,
}

/// A subnet declared inside a VPC.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SubnetRecord {
    pub cidr: String,
    pub vpc_id: String,
    pub subnet_id: String,
    pub az: String,
    pub name: String,
}

/// A network interface attached to a subnet.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NicRecord {
    pub subnet_id: String,
    /// Private IP as a dotted quad.
    pub ip: String,
    /// Short description: instance id, requester, or description text.
    pub info1: String,
    /// Full interface record serialized as JSON.
    pub info2: String,
}
