//! Command line front end.
//!
//! Every flag can also come from the environment (or a `.env` file), e.g.
//! `IPBLOCKS_SUBNET=10.0.0.0/16 IPBLOCKS_BLOCK=/20 ipblocks`.

use crate::models::{parse_block_size, AddressDescriptor, BlockKind, Ipv4};
use crate::output::{render_ranges, render_verbose, to_json, BlocksReport};
use crate::scan::{render_report, scan_ranges, ScanConfig, ScanReport};
use clap::Parser;
use std::error::Error;
use std::time::Duration;

/// Divide an IPv4 subnet into consecutive smaller blocks.
#[derive(Parser, Debug, Clone)]
#[command(name = "ipblocks", version, about)]
pub struct Args {
    /// CIDR representation of subnet to divide
    #[arg(short, long, env = "IPBLOCKS_SUBNET", default_value = "192.168.1.0/24")]
    pub subnet: Ipv4,

    /// Size of block to divide subnet into, e.g. /28
    #[arg(short, long, env = "IPBLOCKS_BLOCK", default_value = "/28")]
    pub block: String,

    /// Output verbose information describing subnet
    #[arg(short, long, env = "IPBLOCKS_VERBOSE")]
    pub verbose: bool,

    /// Print subnet, blocks and ranges as a JSON document
    #[arg(long, conflicts_with = "verbose")]
    pub json: bool,

    /// Port scan every range with nmap
    #[arg(long)]
    pub scan: bool,

    /// Ports passed to nmap -p
    #[arg(long, env = "IPBLOCKS_PORTS", default_value = "80,443,843")]
    pub ports: String,

    /// Time limit per range scan, in seconds
    #[arg(long, env = "IPBLOCKS_TIMEOUT", default_value_t = 300)]
    pub timeout: u64,

    /// Number of nmap processes running at once
    #[arg(long, env = "IPBLOCKS_CONCURRENCY", default_value_t = 8)]
    pub concurrency: usize,

    /// nmap executable
    #[arg(long, env = "IPBLOCKS_NMAP", default_value = "nmap")]
    pub nmap: String,
}

impl Args {
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            nmap: self.nmap.clone(),
            ports: self.ports.clone(),
            timeout: Duration::from_secs(self.timeout),
            concurrency: self.concurrency,
        }
    }
}

/// Blocks computed for one invocation.
#[derive(Debug)]
pub struct Calculation {
    pub subnet: Ipv4,
    pub target: u8,
    pub original: AddressDescriptor,
    pub blocks: Vec<AddressDescriptor>,
    pub ranges: Vec<String>,
}

/// Build the subnet descriptor and divide it into `block` sized blocks.
pub fn calculate(subnet: Ipv4, block: &str) -> crate::Result<Calculation> {
    let target = parse_block_size(block)?;
    let original = subnet.descriptor(BlockKind::Subnet)?;
    let blocks = original.subdivide(target)?;
    let ranges = crate::processing::format_ranges(&blocks);
    Ok(Calculation {
        subnet,
        target,
        original,
        blocks,
        ranges,
    })
}

/// Text printed to stdout for the calculation and any scan reports.
///
/// With `--json` the scan reports go inside the JSON document so stdout
/// stays a single valid document.
pub fn render(
    args: &Args,
    calc: &Calculation,
    scans: Option<&[ScanReport]>,
) -> Result<String, Box<dyn Error>> {
    if args.json {
        let report = BlocksReport {
            subnet: calc.subnet,
            original: &calc.original,
            blocks: &calc.blocks,
            ranges: &calc.ranges,
            scans,
        };
        return Ok(format!("{}\n", to_json(&report)?));
    }

    let mut out = if args.verbose {
        render_verbose(
            &calc.subnet,
            &calc.original,
            &calc.blocks,
            &calc.ranges,
            calc.target,
        )
    } else {
        render_ranges(&calc.ranges)
    };
    for report in scans.unwrap_or_default() {
        out.push_str(&render_report(report));
    }
    Ok(out)
}

/// Calculate, print and optionally scan.
pub async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    log::info!("#Start run() {} as blocks of {}", args.subnet, args.block);

    let calc = calculate(args.subnet, &args.block)?;
    let scans = if args.scan {
        Some(scan_ranges(&calc.ranges, &args.scan_config()).await)
    } else {
        None
    };
    print!("{}", render(&args, &calc, scans.as_deref())?);

    let failed = scans
        .iter()
        .flatten()
        .filter(|r| r.result.is_err())
        .count();
    if failed > 0 {
        return Err(format!("{failed} of {} range scans failed", calc.ranges.len()).into());
    }
    Ok(())
}
