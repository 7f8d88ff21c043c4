use anyhow::{bail, Context, Result};
use rustls::RootCertStore;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Build a root store from a concatenated PEM bundle.
pub fn parse_trust_store(reader: &mut dyn BufRead) -> Result<RootCertStore> {
    let certs = rustls_pemfile::certs(reader)
        .collect::<Result<Vec<_>, _>>()
        .context("decode pem bundle")?;

    let mut roots = RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(certs);
    if ignored > 0 {
        warn!(ignored, "skipped unparsable certificates in trust bundle");
    }
    if added == 0 {
        bail!("no usable certificates in trust bundle");
    }
    debug!(added, "trust anchors loaded");
    Ok(roots)
}

pub fn load_trust_store(path: impl AsRef<Path>) -> Result<RootCertStore> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("read pem file {}", path.display()))?;
    parse_trust_store(&mut BufReader::new(f))
        .with_context(|| format!("load pem file {}", path.display()))
}
