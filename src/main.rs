use aws_subnet_tree::output::print_diagrams;
use aws_subnet_tree::{build_segments, read_inventory_cache};
use clap::Parser;
use std::error::Error;

/// Render the IPv4 allocation of AWS VPCs and subnets as ASCII tree diagrams.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// AWS profile passed to the aws CLI
    #[arg(long)]
    profile: Option<String>,

    /// AWS region passed to the aws CLI
    #[arg(long)]
    region: Option<String>,

    /// Topology only: no host lines, and skip the NIC listing
    #[arg(long, conflicts_with = "verbose")]
    simple: bool,

    /// Add the full interface detail blob to each host line
    #[arg(short, long)]
    verbose: bool,

    /// Force ANSI colors even when stdout is not a tty
    #[arg(long)]
    color: bool,

    /// Read records from a previously written cache file
    #[arg(long)]
    cache_file: Option<String>,
}

impl Args {
    fn verbosity(&self) -> u8 {
        if self.simple {
            0
        } else if self.verbose {
            2
        } else {
            1
        }
    }

    /// Extra arguments forwarded to every aws CLI call.
    fn aws_cli_args(&self) -> String {
        let mut args = Vec::new();
        if let Some(profile) = &self.profile {
            args.push(format!("--profile {profile}"));
        }
        if let Some(region) = &self.region {
            args.push(format!("--region {region}"));
        }
        args.join(" ")
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default()).ok();
    dotenv::dotenv().ok();

    let args = Args::parse();
    if args.color {
        colored::control::set_override(true);
    }
    let verbosity = args.verbosity();
    log::info!("#Start main() verbosity={verbosity}");

    let inventory = read_inventory_cache(
        args.cache_file.as_deref(),
        &args.aws_cli_args(),
        verbosity > 0,
    )?;
    let segments = build_segments(&inventory.vpcs, &inventory.subnets, &inventory.nics)?;
    print_diagrams(segments, verbosity).await?;

    Ok(())
}
