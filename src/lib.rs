// cargo watch -x 'fmt' -x 'run'  // 'run -- --some-arg'

pub mod aws;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

pub use aws::{read_inventory_cache, Inventory};
pub use error::TreeError;
pub use processing::build_segments;

/// Render every VPC in the inventory to diagram lines, blank-line
/// separated, preserving VPC input order.
pub fn build_report(inventory: &Inventory, verbosity: u8) -> Result<Vec<String>, TreeError> {
    let segments = build_segments(&inventory.vpcs, &inventory.subnets, &inventory.nics)?;
    let mut lines = Vec::new();
    for (i, mut segment) in segments.into_iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(output::build_table(&mut segment, verbosity));
    }
    Ok(lines)
}
