//! Inventory cache.
//!
//! The fetched VPC/subnet/NIC records are written to a dated JSON file so
//! repeated runs on the same day skip the aws CLI round trips.

use super::ec2;
use crate::models::{NicRecord, SubnetRecord, VpcRecord};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// One day's fetched EC2 records.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Inventory {
    pub vpcs: Vec<VpcRecord>,
    pub subnets: Vec<SubnetRecord>,
    #[serde(default)]
    pub nics: Vec<NicRecord>,
}

/// Read the inventory from a cache file, or fetch from AWS and write one.
///
/// # Arguments
/// * `cache_file` - Optional path to a specific cache file; must exist.
///   If None, a dated default name is used and created on miss.
/// * `aws_args` - Extra `aws` CLI arguments (profile/region), may be empty.
/// * `with_nics` - Whether NICs are fetched at all; at verbosity 0 the
///   diagram shows no host lines so the slow NIC listing is skipped.
pub fn read_inventory_cache(
    cache_file: Option<&str>,
    aws_args: &str,
    with_nics: bool,
) -> Result<Inventory, Box<dyn Error>> {
    let now = chrono::Utc::now();

    let cache_file = match cache_file {
        Some(file) => {
            if !Path::new(file).exists() {
                return Err(format!("Cache file does not exist: {file}").into());
            }
            log::info!("Using provided cache file: {file}");
            file.to_string()
        }
        None => format!("aws_subnet_cache_{}.json", now.format("%Y-%m-%d")),
    };

    let inventory = match std::fs::read_to_string(&cache_file) {
        Ok(json) => {
            log::info!("Reading from cache file: {cache_file}");
            let inventory: Inventory =
                serde_json::from_str(&json).map_err(|e| format!("Error parsing cache JSON: {e}"))?;
            if with_nics && inventory.nics.is_empty() {
                log::warn!(
                    "Cache {cache_file} holds no NICs (written with --simple?); host lines will be empty"
                );
            }
            inventory
        }
        Err(_) => {
            log::warn!("Cache file not found: {cache_file}");
            let inventory = Inventory {
                vpcs: ec2::fetch_vpcs(aws_args)?,
                subnets: ec2::fetch_subnets(aws_args)?,
                nics: if with_nics {
                    ec2::fetch_nics(aws_args)?
                } else {
                    Vec::new()
                },
            };
            let json = serde_json::to_string(&inventory)
                .map_err(|e| format!("Error serializing JSON: {e}"))?;
            log::warn!("Writing data to cache file: {cache_file}");
            std::fs::write(&cache_file, json)
                .map_err(|e| format!("Error writing cache file {cache_file}: {e}"))?;
            inventory
        }
    };

    Ok(inventory)
}
