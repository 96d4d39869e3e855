//! Terminal output.
//!
//! Plain mode prints one range per line so the output can be piped into
//! other tools. Verbose mode adds the source subnet and every divided block.

use crate::models::{AddressDescriptor, Ipv4};
use colored::Colorize;

/// Render the verbose report for `subnet` divided into `/target` blocks.
pub fn render_verbose(
    subnet: &Ipv4,
    original: &AddressDescriptor,
    blocks: &[AddressDescriptor],
    ranges: &[String],
    target: u8,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("Calculating {subnet} as blocks of /{target}\n"));
    out.push('\n');
    out.push_str(&format!("{} {original}\n", "Subnet:".bold()));
    out.push('\n');
    out.push_str(&format!("{}\n", "Divided Blocks:".bold()));
    for block in blocks {
        out.push_str(&format!("{block}\n"));
    }
    out.push('\n');
    out.push_str(&format!("{}\n", "Block Range:".bold()));
    out.push_str(&render_ranges(ranges));
    out
}

/// One range per line.
pub fn render_ranges(ranges: &[String]) -> String {
    ranges.iter().map(|r| format!("{r}\n")).collect()
}
