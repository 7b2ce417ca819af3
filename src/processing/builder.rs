//! Builds one segment trie per VPC from the flat provider records.

use crate::error::TreeError;
use crate::models::{parse_addr, Ipv4, NicRecord, Segment, SubnetRecord, VpcRecord};
use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;

/// Construct one [`Segment`] trie per VPC, in VPC input order.
///
/// Subnets are inserted into their owning VPC's trie; NIC records become
/// host entries on their owning subnet's node. A subnet referencing an
/// unknown VPC, or a NIC referencing an unknown subnet, is a
/// [`TreeError::UnknownOwner`]: orphan records mean the inventory is
/// inconsistent and the whole report is invalid.
pub fn build_segments(
    vpcs: &[VpcRecord],
    subnets: &[SubnetRecord],
    nics: &[NicRecord],
) -> Result<Vec<Segment>, TreeError> {
    let vpc_ids: HashSet<&str> = vpcs.iter().map(|v| v.vpc_id.as_str()).collect();
    for subnet in subnets {
        if !vpc_ids.contains(subnet.vpc_id.as_str()) {
            return Err(TreeError::UnknownOwner(subnet.vpc_id.clone()));
        }
    }

    let mut hosts_by_subnet = group_hosts_by_subnet(subnets, nics)?;

    let mut segments = Vec::with_capacity(vpcs.len());
    for vpc in vpcs {
        let cidr = Ipv4::new(&vpc.cidr)?;
        let label = format!("{} {} {}", vpc.cidr, vpc.vpc_id, vpc.name);
        let mut root = Segment::new(cidr, Some(label));

        for subnet in subnets.iter().filter(|s| s.vpc_id == vpc.vpc_id) {
            let subnet_cidr = Ipv4::new(&subnet.cidr)?;
            let label = format!(
                "{} {} {} {}",
                subnet.cidr, subnet.subnet_id, subnet.az, subnet.name
            );
            let mut segment = Segment::new(subnet_cidr, Some(label));
            if let Some(hosts) = hosts_by_subnet.remove(subnet.subnet_id.as_str()) {
                for (addr, nic) in hosts {
                    segment.add_host(addr, nic.info1.clone(), nic.info2.clone());
                }
            }
            root.insert(segment)?;
        }
        segments.push(root);
    }

    Ok(segments)
}

/// Group NICs by owning subnet id, parsing addresses up front so a
/// malformed record fails the run before any trie is built.
fn group_hosts_by_subnet<'a>(
    subnets: &[SubnetRecord],
    nics: &'a [NicRecord],
) -> Result<HashMap<&'a str, Vec<(Ipv4Addr, &'a NicRecord)>>, TreeError> {
    let subnet_ids: HashSet<&str> = subnets.iter().map(|s| s.subnet_id.as_str()).collect();
    let mut hosts: HashMap<&str, Vec<(Ipv4Addr, &NicRecord)>> = HashMap::new();
    for nic in nics {
        if !subnet_ids.contains(nic.subnet_id.as_str()) {
            return Err(TreeError::UnknownOwner(nic.subnet_id.clone()));
        }
        let addr = parse_addr(&nic.ip)?;
        hosts.entry(nic.subnet_id.as_str()).or_default().push((addr, nic));
    }
    Ok(hosts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vpc(cidr: &str, id: &str) -> VpcRecord {
        VpcRecord {
            cidr: cidr.to_string(),
            vpc_id: id.to_string(),
            name: "test".to_string(),
        }
    }

    fn subnet(cidr: &str, vpc_id: &str, id: &str) -> SubnetRecord {
        SubnetRecord {
            cidr: cidr.to_string(),
            vpc_id: vpc_id.to_string(),
            subnet_id: id.to_string(),
            az: "us-east-1a".to_string(),
            name: "web".to_string(),
        }
    }

    fn nic(subnet_id: &str, ip: &str, info1: &str) -> NicRecord {
        NicRecord {
            subnet_id: subnet_id.to_string(),
            ip: ip.to_string(),
            info1: info1.to_string(),
            info2: "{}".to_string(),
        }
    }

    #[test]
    fn test_build_two_vpcs_in_order() {
        let vpcs = vec![vpc("10.0.0.0/16", "vpc-1"), vpc("172.31.0.0/16", "vpc-2")];
        let subnets = vec![
            subnet("10.0.0.0/24", "vpc-1", "subnet-1"),
            subnet("172.31.0.0/20", "vpc-2", "subnet-2"),
        ];
        let segments = build_segments(&vpcs, &subnets, &[]).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].label(), Some("10.0.0.0/16 vpc-1 test"));
        assert_eq!(segments[1].label(), Some("172.31.0.0/16 vpc-2 test"));
        assert_eq!(segments[0].max_depth(), 8);
        assert_eq!(segments[1].max_depth(), 4);
    }

    #[test]
    fn test_subnet_label_composition() {
        let vpcs = vec![vpc("10.0.0.0/16", "vpc-1")];
        let subnets = vec![subnet("10.0.0.0/17", "vpc-1", "subnet-1")];
        let mut segments = build_segments(&vpcs, &subnets, &[]).unwrap();
        let child = segments[0].get_or_create_child(0);
        assert_eq!(child.label(), Some("10.0.0.0/17 subnet-1 us-east-1a web"));
    }

    #[test]
    fn test_hosts_attach_to_owning_subnet() {
        let vpcs = vec![vpc("10.0.0.0/16", "vpc-1")];
        let subnets = vec![
            subnet("10.0.0.0/17", "vpc-1", "subnet-1"),
            subnet("10.0.128.0/17", "vpc-1", "subnet-2"),
        ];
        let nics = vec![
            nic("subnet-1", "10.0.0.9", "i-b"),
            nic("subnet-1", "10.0.0.5", "i-a"),
        ];
        let mut segments = build_segments(&vpcs, &subnets, &nics).unwrap();

        let first = segments[0].get_or_create_child(0);
        let hosts: Vec<&str> = first.sorted_hosts().iter().map(|h| h.info1.as_str()).collect();
        assert_eq!(hosts, vec!["i-a", "i-b"]);

        let second = segments[0].get_or_create_child(1);
        assert!(second.sorted_hosts().is_empty());
    }

    #[test]
    fn test_orphan_subnet_is_an_error() {
        let vpcs = vec![vpc("10.0.0.0/16", "vpc-1")];
        let subnets = vec![subnet("10.9.0.0/24", "vpc-gone", "subnet-1")];
        let err = build_segments(&vpcs, &subnets, &[]).unwrap_err();
        assert_eq!(err, TreeError::UnknownOwner("vpc-gone".to_string()));
    }

    #[test]
    fn test_orphan_nic_is_an_error() {
        let vpcs = vec![vpc("10.0.0.0/16", "vpc-1")];
        let subnets = vec![subnet("10.0.0.0/24", "vpc-1", "subnet-1")];
        let nics = vec![nic("subnet-gone", "10.0.0.5", "i-a")];
        let err = build_segments(&vpcs, &subnets, &nics).unwrap_err();
        assert_eq!(err, TreeError::UnknownOwner("subnet-gone".to_string()));
    }

    #[test]
    fn test_bad_cidr_is_an_error() {
        let vpcs = vec![vpc("10.0.0.0/40", "vpc-1")];
        assert!(matches!(
            build_segments(&vpcs, &[], &[]),
            Err(TreeError::Format(_))
        ));
    }

    #[test]
    fn test_misaligned_subnet_is_an_error() {
        let vpcs = vec![vpc("10.0.0.0/16", "vpc-1")];
        let subnets = vec![subnet("10.0.64.0/17", "vpc-1", "subnet-1")];
        assert!(matches!(
            build_segments(&vpcs, &subnets, &[]),
            Err(TreeError::Alignment { .. })
        ));
    }
}
