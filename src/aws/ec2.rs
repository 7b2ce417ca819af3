//! EC2 inventory fetching via the `aws` CLI.
//!
//! Each fetch pages through `aws ec2 describe-*` JSON output following
//! `NextToken` with `--starting-token`, and flattens the responses into
//! the plain records the tree builder consumes.

use super::cli;
use crate::config;
use crate::models::{NicRecord, SubnetRecord, VpcRecord};
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct DescribeVpcsResponse {
    vpcs: Vec<VpcEntry>,
    next_token: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct VpcEntry {
    cidr_block: String,
    vpc_id: String,
    #[serde(default)]
    tags: Vec<Tag>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct DescribeSubnetsResponse {
    subnets: Vec<SubnetEntry>,
    next_token: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SubnetEntry {
    cidr_block: String,
    vpc_id: String,
    subnet_id: String,
    availability_zone: String,
    #[serde(default)]
    tags: Vec<Tag>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct DescribeNicsResponse {
    network_interfaces: Vec<Value>,
    next_token: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct Tag {
    key: String,
    value: String,
}

/// Fetch all VPCs in the account/region.
pub fn fetch_vpcs(aws_args: &str) -> Result<Vec<VpcRecord>, Box<dyn Error>> {
    let mut vpcs = Vec::new();
    paginate("describe-vpcs", aws_args, |output| {
        let response: DescribeVpcsResponse = decode(output)?;
        for entry in response.vpcs {
            vpcs.push(VpcRecord {
                cidr: entry.cidr_block,
                vpc_id: entry.vpc_id,
                name: name_tag(&entry.tags),
            });
        }
        Ok(response.next_token)
    })?;
    log::info!("Got {} VPCs from aws ec2 describe-vpcs", vpcs.len());
    Ok(vpcs)
}

/// Fetch all subnets in the account/region.
pub fn fetch_subnets(aws_args: &str) -> Result<Vec<SubnetRecord>, Box<dyn Error>> {
    let mut subnets = Vec::new();
    paginate("describe-subnets", aws_args, |output| {
        let response: DescribeSubnetsResponse = decode(output)?;
        for entry in response.subnets {
            subnets.push(SubnetRecord {
                cidr: entry.cidr_block,
                vpc_id: entry.vpc_id,
                subnet_id: entry.subnet_id,
                az: entry.availability_zone,
                name: name_tag(&entry.tags),
            });
        }
        Ok(response.next_token)
    })?;
    log::info!("Got {} subnets from aws ec2 describe-subnets", subnets.len());
    Ok(subnets)
}

/// Fetch all network interfaces in the account/region.
///
/// The full interface record minus the routing fields is kept as the
/// `info2` JSON blob for verbose host lines.
pub fn fetch_nics(aws_args: &str) -> Result<Vec<NicRecord>, Box<dyn Error>> {
    let mut nics = Vec::new();
    paginate("describe-network-interfaces", aws_args, |output| {
        let response: DescribeNicsResponse = decode(output)?;
        for entry in response.network_interfaces {
            nics.push(nic_record(entry)?);
        }
        Ok(response.next_token)
    })?;
    log::info!(
        "Got {} NICs from aws ec2 describe-network-interfaces",
        nics.len()
    );
    Ok(nics)
}

/// Run one `aws ec2` subcommand page by page, feeding each page of JSON
/// to `consume` until it reports no `NextToken`.
fn paginate<F>(subcommand: &str, aws_args: &str, mut consume: F) -> Result<(), Box<dyn Error>>
where
    F: FnMut(&str) -> Result<Option<String>, Box<dyn Error>>,
{
    let mut token: Option<String> = None;
    let mut page = 0;
    loop {
        let mut cmd = format!("aws ec2 {subcommand}");
        if !aws_args.is_empty() {
            cmd.push(' ');
            cmd.push_str(aws_args);
        }
        if let Some(token) = &token {
            cmd.push_str(&format!(" --starting-token {token}"));
        }
        cmd.push_str(" --output json");

        let output = cli::run(&cmd)?;
        let next_token = consume(&output)?;

        log::info!("got {subcommand} page#{page} next_token={next_token:?}");
        match next_token {
            Some(next) => {
                if Some(&next) == token.as_ref() {
                    return Err("NextToken not unique - possible infinite loop".into());
                }
                token = Some(next);
                // Rate limiting pause between pages.
                std::thread::sleep(std::time::Duration::from_millis(config::SLEEP_MSEC));
                page += 1;
            }
            None => return Ok(()),
        }
    }
}

fn decode<'a, T: Deserialize<'a>>(output: &'a str) -> Result<T, Box<dyn Error>> {
    let mut deserializer = serde_json::Deserializer::from_str(output);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::error!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", output);
        format!("Error parsing JSON: path={} error={}", e.path(), e).into()
    })
}

/// Value of the `Name` tag, `-` when absent.
fn name_tag(tags: &[Tag]) -> String {
    tags.iter()
        .find(|tag| tag.key == "Name")
        .map(|tag| tag.value.clone())
        .unwrap_or_else(|| "-".to_string())
}

/// Flatten one raw `NetworkInterfaces` element into a [`NicRecord`].
fn nic_record(mut entry: Value) -> Result<NicRecord, Box<dyn Error>> {
    let subnet_id = entry
        .get("SubnetId")
        .and_then(Value::as_str)
        .ok_or("NIC record missing SubnetId")?
        .to_string();
    let ip = entry
        .get("PrivateIpAddress")
        .and_then(Value::as_str)
        .ok_or("NIC record missing PrivateIpAddress")?
        .to_string();

    if let Some(detail) = entry.as_object_mut() {
        for key in ["AvailabilityZone", "PrivateIpAddress", "SubnetId", "VpcId"] {
            detail.remove(key);
        }
    }
    let info1 = nic_info_to_str(&entry);
    let info2 = serde_json::to_string(&entry)?;

    Ok(NicRecord {
        subnet_id,
        ip,
        info1,
        info2,
    })
}

/// Short NIC description: attached instance id, an `amazon-*` requester,
/// or the free-text description as a last resort.
fn nic_info_to_str(nic: &Value) -> String {
    let mut info = String::new();
    if let Some(instance_id) = nic.pointer("/Attachment/InstanceId").and_then(Value::as_str) {
        info.push_str(instance_id);
        info.push(' ');
    }
    if let Some(requester) = nic.get("RequesterId").and_then(Value::as_str) {
        if requester.starts_with("amazon-") {
            info.push_str(requester);
            info.push(' ');
        }
    }
    if info.is_empty() {
        if let Some(description) = nic.get("Description").and_then(Value::as_str) {
            info.push_str(description);
        }
    }
    info.trim_end().to_string()
}
