// Shared fakes for the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use sni_scan::config::SniConfig;
use sni_scan::probes::{PeerIdentity, ProbeContext, ProbeError, Transport};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub mod tls;

#[derive(Debug, Clone)]
pub enum Behavior {
    /// Accept, then present a certificate with `names` after a simulated latency.
    Serve {
        names: Vec<String>,
        latency_ms: u64,
        per_host_ms: HashMap<String, u64>,
    },
    DialRefused,
    DialHangs,
    HandshakeFails,
    HandshakeHangs,
    NoCertificate,
    Panics,
}

impl Behavior {
    pub fn serve(names: &[&str], latency_ms: u64) -> Self {
        Behavior::Serve {
            names: names.iter().map(|s| s.to_string()).collect(),
            latency_ms,
            per_host_ms: HashMap::new(),
        }
    }

    pub fn with_latency(mut self, host: &str, ms: u64) -> Self {
        if let Behavior::Serve { per_host_ms, .. } = &mut self {
            per_host_ms.insert(host.to_string(), ms);
        }
        self
    }
}

/// Deterministic stand-in for the network. Unknown addresses refuse the dial.
#[derive(Default)]
pub struct FakeTransport {
    behaviors: HashMap<IpAddr, Behavior>,
    pub dials: Mutex<Vec<IpAddr>>,
    pub handshakes: Mutex<Vec<(IpAddr, String)>>,
    in_flight: AtomicUsize,
    pub peak: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, ip: &str, b: Behavior) -> Self {
        self.behaviors.insert(ip.parse().unwrap(), b);
        self
    }

    pub fn dials(&self) -> Vec<IpAddr> {
        self.dials.lock().unwrap().clone()
    }

    pub fn handshakes_for(&self, ip: &str) -> Vec<String> {
        let ip: IpAddr = ip.parse().unwrap();
        self.handshakes
            .lock()
            .unwrap()
            .iter()
            .filter(|(a, _)| *a == ip)
            .map(|(_, h)| h.clone())
            .collect()
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for FakeTransport {
    type Conn = IpAddr;

    async fn connect(&self, addr: SocketAddr) -> Result<IpAddr, ProbeError> {
        let ip = addr.ip();
        self.dials.lock().unwrap().push(ip);
        match self.behaviors.get(&ip) {
            None | Some(Behavior::DialRefused) => Err(ProbeError::Dial(
                std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            )),
            Some(Behavior::DialHangs) => std::future::pending().await,
            Some(_) => Ok(ip),
        }
    }

    async fn handshake(
        &self,
        ip: IpAddr,
        server_name: &str,
    ) -> Result<Option<PeerIdentity>, ProbeError> {
        self.handshakes.lock().unwrap().push((ip, server_name.to_string()));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        match self.behaviors.get(&ip).cloned() {
            Some(Behavior::Serve { names, latency_ms, per_host_ms }) => {
                let ms = per_host_ms.get(server_name).copied().unwrap_or(latency_ms);
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok(Some(PeerIdentity { dns_names: names }))
            }
            Some(Behavior::HandshakeFails) => Err(ProbeError::Handshake(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "bad certificate",
            ))),
            Some(Behavior::HandshakeHangs) => std::future::pending().await,
            Some(Behavior::NoCertificate) => Ok(None),
            Some(Behavior::Panics) => panic!("simulated transport crash"),
            _ => unreachable!("dial should have failed"),
        }
    }
}

pub fn config(concurrency: usize, hostnames: &[&str]) -> SniConfig {
    SniConfig {
        concurrency,
        timeout: 2000,
        handshake_timeout: None,
        delay: 200,
        server_name: hostnames.iter().map(|s| s.to_string()).collect(),
        sort_by_delay: true,
    }
}

pub fn context(t: FakeTransport, cfg: &SniConfig) -> ProbeContext<FakeTransport> {
    ProbeContext::new(t, cfg)
}

pub fn ips(v: &[&str]) -> Vec<IpAddr> {
    v.iter().map(|s| s.parse().unwrap()).collect()
}
