use crate::types::{PersistedRecord, RunSummary};
use chrono::Utc;
use serde_json::json;
use std::net::IpAddr;

/// Final view over the confirmed records of a run.
#[derive(Debug, Clone)]
pub struct Report {
    records: Vec<PersistedRecord>,
    delay_threshold_ms: u64,
}

impl Report {
    /// Records come in append order. With `sort_by_delay` they are ordered by
    /// ascending delay; ties keep append order.
    pub fn new(mut records: Vec<PersistedRecord>, sort_by_delay: bool, delay_threshold_ms: u64) -> Self {
        if sort_by_delay {
            records.sort_by_key(|r| r.delay_ms);
        }
        Self { records, delay_threshold_ms }
    }

    pub fn records(&self) -> &[PersistedRecord] {
        &self.records
    }

    /// Addresses with delay at or under the threshold, in report order.
    pub fn matched(&self) -> Vec<IpAddr> {
        self.records
            .iter()
            .filter(|r| r.delay_ms <= self.delay_threshold_ms)
            .map(|r| r.address)
            .collect()
    }

    /// `<address> <delay>ms` per record, newline separated.
    pub fn human_listing(&self) -> String {
        self.records
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `a|b`, three newlines, then `"a","b"`.
    pub fn compact_listing(&self) -> String {
        let matched: Vec<String> = self.matched().iter().map(|ip| ip.to_string()).collect();
        format!("{}\n\n\n\"{}\"", matched.join("|"), matched.join("\",\""))
    }

    pub fn summary(&self, elapsed_secs: u64, candidates: usize) -> RunSummary {
        RunSummary {
            elapsed_secs,
            candidates,
            confirmed: self.records.len(),
            delay_threshold_ms: self.delay_threshold_ms,
            matched: self.matched().len(),
        }
    }

    pub fn to_json(&self, summary: &RunSummary) -> serde_json::Value {
        json!({
            "generated_at": Utc::now(),
            "summary": summary,
            "records": self.records,
            "matched": self.matched(),
        })
    }
}
