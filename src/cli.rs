use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "sni-scan", about = "Find IPs that serve valid TLS for a set of SNI hostnames")]
pub struct Cli {
    /// JSON run configuration
    #[arg(long, value_name = "FILE", default_value = "sni.json")]
    pub config: PathBuf,

    /// Candidate addresses, one IP or CIDR per line
    #[arg(long, value_name = "FILE", default_value = "sniip.txt")]
    pub candidates: PathBuf,

    /// Confirmed `<ip> <delay>ms` lines; also seeds the next run
    #[arg(long, value_name = "FILE", default_value = "sniip_output.txt")]
    pub results: PathBuf,

    /// `|`-joined and quoted lists of IPs under the delay threshold
    #[arg(long, value_name = "FILE", default_value = "ip.txt")]
    pub compact_out: PathBuf,

    /// PEM bundle of trusted CAs
    #[arg(long, value_name = "FILE", default_value = "cacert.pem")]
    pub ca_bundle: PathBuf,

    #[arg(long, default_value_t = 443)]
    pub port: u16,

    /// Override `concurrency` from the config file
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Also write a JSON report to this file
    #[arg(long, value_name = "FILE")]
    pub json_out: Option<PathBuf>,

    /// Load everything, print the plan and exit (no network activity)
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Force override safety checks (use with care)
    #[arg(long, action = ArgAction::SetTrue)]
    pub force: bool,

    /// Exit right away instead of waiting for Enter
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_wait: bool,

    #[arg(long, action = ArgAction::SetTrue)]
    pub no_progress: bool,

    /// Debug logging (shows why each candidate was rejected)
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse() -> Self {
        Parser::parse()
    }
}
