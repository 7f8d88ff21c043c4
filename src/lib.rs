pub mod cli;
pub mod config;
pub mod netutils;
pub mod probes;
pub mod report;
pub mod scan;
pub mod store;
pub mod trust;
pub mod types;
pub mod utils;

pub use scan::{probe_candidates, run};

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` wins over `default_level`.
/// Safe to call more than once.
pub fn init_tracing_with(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn init_tracing() {
    init_tracing_with("info");
}
