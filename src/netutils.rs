use crate::types::PersistedRecord;
use anyhow::{Context, Result};
use cidr::IpCidr;
use std::collections::HashSet;
use std::net::IpAddr;
use std::path::Path;
use tracing::warn;

/// Largest CIDR block (in host bits) expanded from the candidate file.
const MAX_CIDR_HOST_BITS: u8 = 16;

/// Parse the candidate list: one address (or CIDR block) per line.
/// Blank lines and `#` comments are skipped; junk is warned about and dropped.
pub fn parse_candidates(text: &str) -> Vec<IpAddr> {
    let mut out = Vec::new();
    for (lineno, raw) in text.lines().enumerate() {
        let l = raw.trim();
        if l.is_empty() || l.starts_with('#') {
            continue;
        }

        if let Ok(ip) = l.parse::<IpAddr>() {
            out.push(ip);
            continue;
        }

        if l.contains('/') {
            if let Ok(cidr) = l.parse::<IpCidr>() {
                let max_len = match cidr {
                    IpCidr::V4(_) => 32,
                    IpCidr::V6(_) => 128,
                };
                let host_bits = max_len - cidr.network_length();
                if host_bits > MAX_CIDR_HOST_BITS {
                    warn!(line = lineno + 1, block = %l, "cidr block too large, skipped");
                } else {
                    out.extend(cidr.iter().map(|inet| inet.address()));
                }
                continue;
            }
        }

        warn!(line = lineno + 1, entry = %l, "ignoring unrecognized candidate entry");
    }
    out
}

pub fn load_candidates(path: impl AsRef<Path>) -> Result<Vec<IpAddr>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read candidate file {}", path.display()))?;
    Ok(parse_candidates(&text))
}

/// Previously confirmed addresses first, then the fresh list, each address once.
///
/// Seeds only influence the order in which work is picked up; they are probed
/// like any other candidate.
pub fn merge_candidates(seeds: &[PersistedRecord], fresh: Vec<IpAddr>) -> Vec<IpAddr> {
    let mut seen = HashSet::with_capacity(seeds.len() + fresh.len());
    seeds
        .iter()
        .map(|r| r.address)
        .chain(fresh)
        .filter(|ip| seen.insert(*ip))
        .collect()
}
