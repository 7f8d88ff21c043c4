use anyhow::Result;
use sni_scan::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    sni_scan::init_tracing_with(if cli.verbose { "sni_scan=debug,info" } else { "info" });
    sni_scan::run(cli).await
}
