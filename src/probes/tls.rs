// src/probes/tls.rs
use super::{PeerIdentity, ProbeError, Transport};
use anyhow::{Context, Result};
use async_trait::async_trait;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use x509_parser::prelude::*;

/// Real transport: tokio TCP dial plus a rustls handshake verified against
/// the configured trust anchors.
#[derive(Clone)]
pub struct RustlsTransport {
    connector: TlsConnector,
}

impl RustlsTransport {
    pub fn new(roots: RootCertStore) -> Result<Self> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let cfg = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .context("select tls protocol versions")?
            .with_root_certificates(roots)
            .with_no_client_auth();
        Ok(Self { connector: TlsConnector::from(Arc::new(cfg)) })
    }
}

#[async_trait]
impl Transport for RustlsTransport {
    type Conn = TcpStream;

    async fn connect(&self, addr: SocketAddr) -> Result<TcpStream, ProbeError> {
        TcpStream::connect(addr).await.map_err(ProbeError::Dial)
    }

    async fn handshake(
        &self,
        conn: TcpStream,
        server_name: &str,
    ) -> Result<Option<PeerIdentity>, ProbeError> {
        let sni = ServerName::try_from(server_name.to_owned())
            .map_err(|_| ProbeError::InvalidServerName(server_name.to_string()))?;
        let tls = self
            .connector
            .connect(sni, conn)
            .await
            .map_err(ProbeError::Handshake)?;

        let leaf = match tls.get_ref().1.peer_certificates().and_then(|c| c.first()) {
            Some(cert) => cert,
            None => return Ok(None),
        };
        Ok(Some(PeerIdentity { dns_names: san_dns_names(leaf.as_ref()) }))
    }
}

/// Subject alternative DNS names of a DER certificate. Unparsable input yields none.
pub fn san_dns_names(der: &[u8]) -> Vec<String> {
    let Ok((_, parsed)) = parse_x509_certificate(der) else {
        return Vec::new();
    };
    let mut sans = Vec::new();
    if let Ok(Some(ext)) = parsed.subject_alternative_name() {
        for name in ext.value.general_names.iter() {
            if let GeneralName::DNSName(d) = name {
                sans.push(d.to_string());
            }
        }
    }
    sans
}
