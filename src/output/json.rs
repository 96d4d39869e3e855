//! JSON output of a subdivision.

use crate::models::{AddressDescriptor, Ipv4};
use crate::scan::ScanReport;
use serde::Serialize;

/// Everything computed for one invocation, serialized as a single document.
#[derive(Serialize, Debug)]
pub struct BlocksReport<'a> {
    pub subnet: Ipv4,
    pub original: &'a AddressDescriptor,
    pub blocks: &'a [AddressDescriptor],
    pub ranges: &'a [String],
    /// One entry per range, present only when the ranges were scanned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scans: Option<&'a [ScanReport]>,
}

/// Pretty-printed JSON for the report.
pub fn to_json(report: &BlocksReport<'_>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
