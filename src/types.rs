use serde::Serialize;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Result of probing one candidate. `delay_ms` is only set on success.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub address: IpAddr,
    pub delay_ms: Option<u64>,
}

impl ProbeOutcome {
    pub fn success(address: IpAddr, delay_ms: u64) -> Self {
        Self { address, delay_ms: Some(delay_ms) }
    }

    pub fn failure(address: IpAddr) -> Self {
        Self { address, delay_ms: None }
    }

    pub fn is_success(&self) -> bool {
        self.delay_ms.is_some()
    }
}

/// One line of the result file: `<address> <delay>ms`.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct PersistedRecord {
    pub address: IpAddr,
    pub delay_ms: u64,
}

impl fmt::Display for PersistedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}ms", self.address, self.delay_ms)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("malformed result line: {0:?}")]
pub struct ParseRecordError(pub String);

impl FromStr for PersistedRecord {
    type Err = ParseRecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let bad = || ParseRecordError(line.to_string());
        let mut parts = line.split_whitespace();
        let address = parts.next().ok_or_else(bad)?.parse::<IpAddr>().map_err(|_| bad())?;
        let delay_ms = parts
            .next()
            .and_then(|d| d.strip_suffix("ms"))
            .ok_or_else(bad)?
            .parse::<u64>()
            .map_err(|_| bad())?;
        if parts.next().is_some() {
            return Err(bad());
        }
        Ok(Self { address, delay_ms })
    }
}

/// End-of-run numbers shown on the console and in the JSON report.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub elapsed_secs: u64,
    pub candidates: usize,
    pub confirmed: usize,
    pub delay_threshold_ms: u64,
    pub matched: usize,
}
