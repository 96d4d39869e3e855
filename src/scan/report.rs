//! Parsing and printing of nmap scan results.
//!
//! nmap is run with `-oG -`, its grepable format on stdout. Every host that
//! is up gets a `Status: Up` line, and hosts with open (or closed, or
//! filtered) ports get a second line listing them:
//!
//! ```text
//! Host: 192.168.1.1 (router.lan)	Status: Up
//! Host: 192.168.1.1 (router.lan)	Ports: 80/open/tcp//http///, 443/closed/tcp//https///	Ignored State: filtered (997)
//! # Nmap done at Thu Oct 15 10:00:00 2026 -- 16 IP addresses (2 hosts up) scanned in 3.21 seconds
//! ```

use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;

static HOST_PORTS_REGEX: OnceLock<Regex> = OnceLock::new();
static HOST_UP_REGEX: OnceLock<Regex> = OnceLock::new();
static SUMMARY_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_host_ports_regex() -> &'static Regex {
    HOST_PORTS_REGEX.get_or_init(|| {
        Regex::new(r"^Host:\s+(\S+)\s+\(([^)]*)\).*?\tPorts:\s+([^\t]*)").expect("Invalid Regex")
    })
}

fn get_host_up_regex() -> &'static Regex {
    HOST_UP_REGEX.get_or_init(|| {
        Regex::new(r"^Host:\s+(\S+)\s+\([^)]*\)\s+Status:\s+Up").expect("Invalid Regex")
    })
}

fn get_summary_regex() -> &'static Regex {
    SUMMARY_REGEX.get_or_init(|| {
        Regex::new(r"^# Nmap done .*\((\d+) hosts? up\)").expect("Invalid Regex")
    })
}

/// One port as reported by nmap.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PortReport {
    pub id: u16,
    pub state: String,
    pub protocol: String,
    pub service: String,
}

/// A host with at least one reported port.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HostReport {
    pub address: String,
    pub hostname: Option<String>,
    pub ports: Vec<PortReport>,
}

/// What nmap found in one range.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Every host nmap reported as up, with or without ports.
    pub hosts_up: usize,
    /// Hosts that listed ports.
    pub hosts: Vec<HostReport>,
}

/// Outcome of scanning one CIDR range.
#[derive(Debug)]
pub struct ScanReport {
    pub target: String,
    pub elapsed: Duration,
    pub result: Result<ScanOutcome, String>,
}

impl Serialize for ScanReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("ScanReport", 5)?;
        s.serialize_field("target", &self.target)?;
        s.serialize_field("elapsed_secs", &self.elapsed.as_secs_f64())?;
        match &self.result {
            Ok(outcome) => {
                s.serialize_field("hosts_up", &outcome.hosts_up)?;
                s.serialize_field("hosts", &outcome.hosts)?;
                s.serialize_field("error", &None::<&str>)?;
            }
            Err(e) => {
                s.serialize_field("hosts_up", &0)?;
                s.serialize_field("hosts", &Vec::<HostReport>::new())?;
                s.serialize_field("error", &Some(e))?;
            }
        }
        s.end()
    }
}

/// Parse nmap grepable output into the up count and the hosts listing ports.
pub fn parse_outcome(output: &str) -> ScanOutcome {
    let hosts = parse_grepable(output);
    let hosts_up = summary_hosts_up(output)
        .unwrap_or_else(|| status_up_addresses(output).len())
        .max(hosts.len());
    ScanOutcome { hosts_up, hosts }
}

/// Collect the hosts that list ports in nmap grepable output.
pub fn parse_grepable(output: &str) -> Vec<HostReport> {
    output
        .lines()
        .filter_map(|line| get_host_ports_regex().captures(line))
        .map(|caps| {
            let hostname = caps[2].trim();
            HostReport {
                address: caps[1].to_string(),
                hostname: (!hostname.is_empty()).then(|| hostname.to_string()),
                ports: caps[3].split(", ").filter_map(parse_port).collect(),
            }
        })
        .filter(|host| !host.ports.is_empty())
        .collect()
}

/// `(N hosts up)` from the trailing `# Nmap done` comment.
fn summary_hosts_up(output: &str) -> Option<usize> {
    output
        .lines()
        .filter_map(|line| get_summary_regex().captures(line))
        .last()
        .and_then(|caps| caps[1].parse().ok())
}

fn status_up_addresses(output: &str) -> HashSet<&str> {
    output
        .lines()
        .filter_map(|line| get_host_up_regex().captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// `80/open/tcp//http///` -> port 80, open, tcp, http
fn parse_port(entry: &str) -> Option<PortReport> {
    let mut fields = entry.trim().split('/');
    let id = fields.next()?.parse().ok()?;
    let state = fields.next()?.to_string();
    let protocol = fields.next()?.to_string();
    let service = fields.nth(1).unwrap_or_default().to_string();
    Some(PortReport {
        id,
        state,
        protocol,
        service,
    })
}

/// Render a scan report the way it is printed to stdout.
pub fn render_report(report: &ScanReport) -> String {
    let mut out = String::new();
    match &report.result {
        Ok(outcome) => {
            for host in &outcome.hosts {
                out.push_str(&format!("Host {:?}:\n", host.address));
                for port in &host.ports {
                    out.push_str(&format!(
                        "\tPort {}/{} {} {}\n",
                        port.id, port.protocol, port.state, port.service
                    ));
                }
            }
            out.push_str(&format!(
                "Nmap done: {} hosts up scanned in {:.3} seconds\n",
                outcome.hosts_up,
                report.elapsed.as_secs_f64()
            ));
        }
        Err(e) => out.push_str(&format!("Scan of {} failed: {e}\n", report.target)),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# Nmap 7.94 scan initiated as: nmap -p 80,443,843 -oG - 192.168.1.0/28
Host: 192.168.1.1 (router.lan)\tStatus: Up
Host: 192.168.1.1 (router.lan)\tPorts: 80/open/tcp//http///, 443/open/tcp//https///, 843/closed/tcp/////\tIgnored State: filtered (997)
Host: 192.168.1.7 ()\tStatus: Up
Host: 192.168.1.7 ()\tPorts: 443/filtered/tcp//https///
Host: 192.168.1.9 (printer.lan)\tStatus: Up
# Nmap done at Thu Oct 15 10:00:00 2026 -- 16 IP addresses (3 hosts up) scanned in 3.21 seconds
";

    #[test]
    fn test_parse_grepable() {
        let hosts = parse_grepable(SAMPLE);
        assert_eq!(hosts.len(), 2);

        assert_eq!(hosts[0].address, "192.168.1.1");
        assert_eq!(hosts[0].hostname.as_deref(), Some("router.lan"));
        assert_eq!(hosts[0].ports.len(), 3);
        assert_eq!(
            hosts[0].ports[0],
            PortReport {
                id: 80,
                state: "open".to_string(),
                protocol: "tcp".to_string(),
                service: "http".to_string(),
            }
        );
        assert_eq!(hosts[0].ports[2].service, "");

        assert_eq!(hosts[1].address, "192.168.1.7");
        assert_eq!(hosts[1].hostname, None);
        assert_eq!(hosts[1].ports[0].state, "filtered");
    }

    #[test]
    fn test_parse_outcome_counts_hosts_without_ports() {
        let outcome = parse_outcome(SAMPLE);
        assert_eq!(outcome.hosts_up, 3);
        assert_eq!(outcome.hosts.len(), 2);
    }

    #[test]
    fn test_parse_outcome_without_summary_counts_status_lines() {
        let output = "Host: 10.0.0.1 ()\tStatus: Up
Host: 10.0.0.1 ()\tPorts: 22/open/tcp//ssh///
Host: 10.0.0.2 ()\tStatus: Up
";
        let outcome = parse_outcome(output);
        assert_eq!(outcome.hosts_up, 2);
        assert_eq!(outcome.hosts.len(), 1);
    }

    #[test]
    fn test_parse_grepable_no_hosts() {
        let output = "# Nmap done at Thu Oct 15 10:00:00 2026 -- 16 IP addresses (0 hosts up) scanned in 3.01 seconds\n";
        assert!(parse_grepable(output).is_empty());
        assert_eq!(parse_outcome(output).hosts_up, 0);
        assert_eq!(parse_outcome("").hosts_up, 0);
    }

    #[test]
    fn test_parse_port_rejects_garbage() {
        assert_eq!(parse_port("http/open/tcp"), None);
        assert_eq!(parse_port("80"), None);
    }

    #[test]
    fn test_render_report() {
        let report = ScanReport {
            target: "192.168.1.0/28".to_string(),
            elapsed: Duration::from_millis(1500),
            result: Ok(parse_outcome(SAMPLE)),
        };
        let out = render_report(&report);
        assert!(out.starts_with("Host \"192.168.1.1\":\n\tPort 80/tcp open http\n"));
        assert!(out.ends_with("Nmap done: 3 hosts up scanned in 1.500 seconds\n"));

        let failed = ScanReport {
            target: "10.0.0.0/30".to_string(),
            elapsed: Duration::ZERO,
            result: Err("Timed out after 1s".to_string()),
        };
        assert_eq!(
            render_report(&failed),
            "Scan of 10.0.0.0/30 failed: Timed out after 1s\n"
        );
    }

    #[test]
    fn test_serialize_report() {
        let report = ScanReport {
            target: "192.168.1.0/28".to_string(),
            elapsed: Duration::from_millis(250),
            result: Ok(parse_outcome(SAMPLE)),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["target"], "192.168.1.0/28");
        assert_eq!(value["elapsed_secs"], 0.25);
        assert_eq!(value["hosts_up"], 3);
        assert_eq!(value["hosts"][0]["address"], "192.168.1.1");
        assert_eq!(value["hosts"][0]["ports"][1]["service"], "https");
        assert!(value["error"].is_null());

        let failed = ScanReport {
            target: "10.0.0.0/30".to_string(),
            elapsed: Duration::ZERO,
            result: Err("boom".to_string()),
        };
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["error"], "boom");
        assert_eq!(value["hosts"].as_array().unwrap().len(), 0);
    }
}
