//! Parallel port scanning of divided blocks.
//!
//! Each CIDR range is handed to an external `nmap` process. At most
//! `concurrency` processes run at once and every process has its own timeout.
//!
//! - [`command`] - Child process execution
//! - [`report`] - nmap output parsing and printing

mod command;
mod report;

use colored::Colorize;
use futures::stream::{self, StreamExt};
use std::time::{Duration, Instant};

pub use command::run;
pub use report::{
    parse_grepable, parse_outcome, render_report, HostReport, PortReport, ScanOutcome, ScanReport,
};

/// How nmap is invoked for each range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// nmap executable, a name on `PATH` or a full path.
    pub nmap: String,
    /// Comma separated port list passed to `-p`.
    pub ports: String,
    /// Per range time limit.
    pub timeout: Duration,
    /// Maximum number of nmap processes running at once.
    pub concurrency: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            nmap: "nmap".to_string(),
            ports: "80,443,843".to_string(),
            timeout: Duration::from_secs(300),
            concurrency: 8,
        }
    }
}

/// Command line scanning a single target with grepable output on stdout.
pub fn nmap_command(config: &ScanConfig, target: &str) -> String {
    let nmap = if config.nmap.contains(' ') {
        format!("'{}'", config.nmap)
    } else {
        config.nmap.clone()
    };
    format!("{nmap} -p {} -oG - {target}", config.ports)
}

/// Scan one range and parse what nmap reports.
pub async fn scan_range(config: &ScanConfig, target: &str) -> ScanReport {
    log::info!("Scanning: {}", target.green());
    let started = Instant::now();
    let result = run(&nmap_command(config, target), config.timeout)
        .await
        .map(|stdout| parse_outcome(&stdout))
        .map_err(|e| e.to_string());
    let elapsed = started.elapsed();

    match &result {
        Ok(outcome) => log::info!("{target}: {} hosts up in {:?}", outcome.hosts_up, elapsed),
        Err(e) => log::warn!("{target}: {}", e.red()),
    }
    ScanReport {
        target: target.to_string(),
        elapsed,
        result,
    }
}

/// Scan every range, returning the reports in the same order as `ranges`.
///
/// A failing range is recorded in its report and does not stop the others.
pub async fn scan_ranges(ranges: &[String], config: &ScanConfig) -> Vec<ScanReport> {
    log::info!(
        "#Start scan_ranges() {} ranges, {} at a time",
        ranges.len(),
        config.concurrency
    );
    stream::iter(ranges)
        .map(|target| scan_range(config, target))
        .buffered(config.concurrency.max(1))
        .collect()
        .await
}
