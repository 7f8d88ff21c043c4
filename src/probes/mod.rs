pub mod context;
pub mod tls;
pub mod validator;

pub use context::ProbeContext;
pub use tls::RustlsTransport;
pub use validator::{hostname_covered, validate_candidate};

use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;

/// What the validator needs to know about the peer after a handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerIdentity {
    /// Subject alternative DNS names of the leaf certificate.
    pub dns_names: Vec<String>,
}

/// Reasons a candidate is rejected. Never leaves the probe task.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("dial error: {0}")]
    Dial(#[source] std::io::Error),
    #[error("dial timed out after {0:?}")]
    DialTimeout(Duration),
    #[error("invalid server name {0:?}")]
    InvalidServerName(String),
    #[error("handshake error: {0}")]
    Handshake(#[source] std::io::Error),
    #[error("handshake timed out after {0:?}")]
    HandshakeTimeout(Duration),
    #[error("peer certificates is nil")]
    NoPeerCertificate,
    #[error("peer certificate has no dns names")]
    NoDnsNames,
    #[error("certificate does not cover {0}")]
    NameMismatch(String),
}

/// Network seam: one TCP dial, then one TLS client handshake on that connection.
///
/// Implementations do not enforce deadlines; the validator wraps both calls
/// in the configured timeouts.
#[async_trait]
pub trait Transport: Send + Sync {
    type Conn: Send;

    async fn connect(&self, addr: SocketAddr) -> Result<Self::Conn, ProbeError>;

    /// Handshake with `server_name` as SNI. `Ok(None)` means the peer sent no certificate.
    async fn handshake(
        &self,
        conn: Self::Conn,
        server_name: &str,
    ) -> Result<Option<PeerIdentity>, ProbeError>;
}
