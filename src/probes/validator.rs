use super::{PeerIdentity, ProbeContext, ProbeError, Transport};
use std::net::{IpAddr, SocketAddr};
use tokio::time::{timeout, Instant};

/// A candidate failed on `hostname`; later hostnames were not tried.
#[derive(Debug, thiserror::Error)]
#[error("{hostname}: {error}")]
pub struct Rejection {
    pub hostname: String,
    #[source]
    pub error: ProbeError,
}

/// Run every configured hostname against `ip`, in order, stopping at the first
/// failure. Returns the truncated mean handshake latency in milliseconds.
pub async fn validate_candidate<T: Transport>(
    ctx: &ProbeContext<T>,
    ip: IpAddr,
) -> Result<u64, Rejection> {
    let addr = SocketAddr::new(ip, ctx.port);
    let mut total: u64 = 0;

    for hostname in ctx.hostnames.iter() {
        let latency = check_hostname(ctx, addr, hostname)
            .await
            .map_err(|error| Rejection { hostname: hostname.clone(), error })?;
        total += latency;
    }

    Ok(total / ctx.hostnames.len().max(1) as u64)
}

/// dial -> handshake -> certificate names -> coverage, for a single hostname.
async fn check_hostname<T: Transport>(
    ctx: &ProbeContext<T>,
    addr: SocketAddr,
    hostname: &str,
) -> Result<u64, ProbeError> {
    let conn = timeout(ctx.dial_timeout, ctx.transport.connect(addr))
        .await
        .map_err(|_| ProbeError::DialTimeout(ctx.dial_timeout))??;

    let started = Instant::now();
    let peer = timeout(ctx.handshake_timeout, ctx.transport.handshake(conn, hostname))
        .await
        .map_err(|_| ProbeError::HandshakeTimeout(ctx.handshake_timeout))??;
    let dns_names = require_dns_names(peer)?;
    let latency = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    if !hostname_covered(&dns_names, hostname) {
        return Err(ProbeError::NameMismatch(hostname.to_string()));
    }
    Ok(latency)
}

fn require_dns_names(peer: Option<PeerIdentity>) -> Result<Vec<String>, ProbeError> {
    let peer = peer.ok_or(ProbeError::NoPeerCertificate)?;
    if peer.dns_names.is_empty() {
        return Err(ProbeError::NoDnsNames);
    }
    Ok(peer.dns_names)
}

/// True when `dns_names` has `hostname` itself, or `hostname` with every
/// "www" replaced by "*" (so `*.example.com` covers `www.example.com`).
pub fn hostname_covered(dns_names: &[String], hostname: &str) -> bool {
    let wildcard = hostname.replace("www", "*");
    dns_names.iter().any(|n| n == hostname || *n == wildcard)
}
