use crate::cli::Cli;
use crate::config::{SniConfig, MAX_CONCURRENCY};
use crate::netutils::{load_candidates, merge_candidates};
use crate::probes::{validate_candidate, ProbeContext, RustlsTransport, Transport};
use crate::report::Report;
use crate::store::{self, ResultStore};
use crate::trust::load_trust_store;
use crate::types::{PersistedRecord, ProbeOutcome, RunSummary};
use crate::utils::ProbePool;
use anyhow::{bail, Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

const MAX_CANDIDATES: usize = 100_000;

/// Probe every candidate with at most `ctx.concurrency` probes in flight.
///
/// Successes are appended to `store` as they are confirmed. Returns once every
/// probe has finished, with one outcome per probe in completion order.
pub async fn probe_candidates<T>(
    ctx: Arc<ProbeContext<T>>,
    candidates: Vec<IpAddr>,
    store: Arc<ResultStore>,
    pb: ProgressBar,
) -> Result<Vec<ProbeOutcome>>
where
    T: Transport + 'static,
{
    let pool = ProbePool::new(ctx.concurrency);
    let (tx, mut rx) = mpsc::unbounded_channel();

    for ip in candidates {
        let ctx = ctx.clone();
        let store = store.clone();
        let tx = tx.clone();
        let pb = pb.clone();
        pool.dispatch(async move {
            let outcome = probe_one(&ctx, &store, ip).await;
            pb.inc(1);
            // receiver lives until after the drain
            let _ = tx.send(outcome);
        })
        .await
        .context("probe pool closed")?;
    }
    drop(tx);

    pool.drain().await.context("probe pool closed")?;

    // every finished task sent before releasing its permit
    let mut outcomes = Vec::new();
    while let Ok(o) = rx.try_recv() {
        outcomes.push(o);
    }
    Ok(outcomes)
}

async fn probe_one<T: Transport>(ctx: &ProbeContext<T>, store: &ResultStore, ip: IpAddr) -> ProbeOutcome {
    match validate_candidate(ctx, ip).await {
        Ok(delay_ms) => {
            let record = PersistedRecord { address: ip, delay_ms };
            match store.append(&record).await {
                Ok(()) => {
                    info!(addr = %ip, delay_ms, "sni ip, recorded");
                    ProbeOutcome::success(ip, delay_ms)
                }
                Err(e) => {
                    error!(addr = %ip, error = %format!("{:#}", e), "failed to record sni ip");
                    ProbeOutcome::failure(ip)
                }
            }
        }
        Err(rejection) => {
            debug!(addr = %ip, hostname = %rejection.hostname, error = %rejection.error, "candidate rejected");
            ProbeOutcome::failure(ip)
        }
    }
}

fn progress_bar(len: usize, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

/// Whole run: load inputs, probe, aggregate, write outputs.
pub async fn run(cli: Cli) -> Result<()> {
    println!("{}", "initial...".bold());

    let mut cfg = SniConfig::load(&cli.config)?;
    if let Some(c) = cli.concurrency {
        cfg.concurrency = c;
        cfg.validate()?;
    }
    if cfg.concurrency > MAX_CONCURRENCY && !cli.force {
        bail!(
            "concurrency {} is above {}. Use --force to override.",
            cfg.concurrency,
            MAX_CONCURRENCY
        );
    }
    let roots = load_trust_store(&cli.ca_bundle)?;
    let transport = RustlsTransport::new(roots)?;

    let results = Arc::new(ResultStore::open(&cli.results)?);
    store::ensure_file(&cli.compact_out)?;

    let seeds = results.read_records()?;
    let fresh = load_candidates(&cli.candidates)?;
    let candidates = merge_candidates(&seeds, fresh);
    info!(seeds = seeds.len(), total = candidates.len(), "candidates loaded");

    if candidates.len() > MAX_CANDIDATES && !cli.force {
        bail!("Too many candidates ({}). Use --force to override.", candidates.len());
    }

    if cli.dry_run {
        println!("candidates: {}", candidates.len());
        println!("server names: {}", cfg.server_name.join(", "));
        println!("concurrency: {}", cfg.concurrency);
        return Ok(());
    }

    results.truncate()?;

    let ctx = Arc::new(ProbeContext::new(transport, &cfg).with_port(cli.port));
    let total = candidates.len();
    let pb = progress_bar(total, cli.no_progress);

    let t0 = Instant::now();
    probe_candidates(ctx, candidates, results.clone(), pb.clone()).await?;
    pb.finish_and_clear();
    let elapsed = t0.elapsed().as_secs();

    let report = Report::new(results.read_records()?, cfg.sort_by_delay, cfg.delay);
    results.overwrite(&report.human_listing())?;
    store::write_text_file(&cli.compact_out, &report.compact_listing())?;

    let summary = report.summary(elapsed, total);
    if let Some(path) = &cli.json_out {
        store::write_json_file_atomic(path, &report.to_json(&summary))?;
        info!(file = %path.display(), "wrote json report");
    }

    print_summary(&summary);

    if !cli.no_wait {
        let mut line = String::new();
        // any input, or EOF, ends the run
        let _ = BufReader::new(tokio::io::stdin()).read_line(&mut line).await;
    }
    Ok(())
}

fn print_summary(s: &RunSummary) {
    println!();
    println!(
        "time: {}s, ok ip count: {}, matched ip with delay({}ms) count: {}",
        s.elapsed_secs.to_string().bold(),
        s.confirmed.to_string().green(),
        s.delay_threshold_ms,
        s.matched.to_string().green().bold(),
    );
    println!();
}
