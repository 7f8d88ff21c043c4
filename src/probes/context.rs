// probes/context.rs
use crate::config::SniConfig;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 443;

/// Immutable per-run state shared by every probe task.
#[derive(Debug)]
pub struct ProbeContext<T> {
    pub transport: T,
    pub hostnames: Arc<[String]>,
    pub port: u16,
    pub dial_timeout: Duration,
    pub handshake_timeout: Duration,
    pub concurrency: usize,
}

impl<T> ProbeContext<T> {
    pub fn new(transport: T, cfg: &SniConfig) -> Self {
        Self {
            transport,
            hostnames: cfg.server_name.iter().cloned().collect(),
            port: DEFAULT_PORT,
            dial_timeout: cfg.dial_timeout(),
            handshake_timeout: cfg.handshake_timeout(),
            concurrency: cfg.concurrency,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}
