use crate::config::Settings;
use crate::traits::Pinger;
use crate::types::{Mirror, ProbeFailure, ProbeOutcome, ProbeResult};
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Plain HTTP GET against the mirror base URL.
///
/// The shared client carries the per-mirror timeout; the body is never read,
/// so a sample covers the time until the response headers arrive.
pub struct HttpPinger {
    client: Client,
}

impl HttpPinger {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Pinger for HttpPinger {
    async fn ping(&self, url: &str) -> Result<(), ProbeFailure> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProbeFailure::Network(e.to_string()))?;

        if resp.status() != StatusCode::OK {
            return Err(ProbeFailure::Status(resp.status().as_u16()));
        }
        Ok(())
    }
}

/// Mean of the samples. `None` when there are none or they add up to zero,
/// which only happens when nothing was actually measured.
pub fn average_latency(samples: &[Duration]) -> Option<Duration> {
    let total: Duration = samples.iter().sum();
    if samples.is_empty() || total.is_zero() {
        return None;
    }
    let n = u32::try_from(samples.len()).ok()?;
    Some(total / n)
}

/// Ping one mirror `settings.pings` times in a row.
///
/// The first failed attempt ends probing for this mirror; earlier samples
/// are discarded.
pub async fn probe_mirror<P>(pinger: &P, mirror: &Mirror, settings: &Settings) -> ProbeOutcome
where
    P: Pinger + ?Sized,
{
    let mut samples = Vec::with_capacity(settings.pings);

    for _ in 0..settings.pings {
        let start = Instant::now();
        if let Err(failure) = pinger.ping(&mirror.url).await {
            report_failure(mirror, &failure, settings.verbose);
            return ProbeOutcome::Failed(failure);
        }
        samples.push(start.elapsed());
    }

    match average_latency(&samples) {
        Some(average_latency) => ProbeOutcome::Success { average_latency },
        None => {
            let failure = ProbeFailure::NotResponding;
            report_failure(mirror, &failure, settings.verbose);
            ProbeOutcome::Failed(failure)
        }
    }
}

fn report_failure(mirror: &Mirror, failure: &ProbeFailure, verbose: bool) {
    if !verbose {
        tracing::debug!(mirror = %mirror, "probe failed: {}", failure);
        return;
    }
    match failure {
        ProbeFailure::Network(reason) => {
            tracing::warn!("could not get response from {} ({})", mirror, reason)
        }
        ProbeFailure::Status(code) => {
            tracing::warn!("got {} status code from {}", code, mirror)
        }
        ProbeFailure::NotResponding => tracing::warn!("{} is not responding", mirror),
    }
}

fn progress_bar(len: usize, verbose: bool) -> ProgressBar {
    // Warnings would tear through the bar, so skip it in verbose mode.
    if verbose {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} {msg}") {
        pb.set_style(style.progress_chars("|| "));
    }
    pb.set_message("Pinging mirrors...");
    pb
}

/// Probe every mirror concurrently and return one result per finished probe.
///
/// Logic:
/// 1. One tokio task per mirror, all spawned before anything is awaited
/// 2. Each task pushes its result into a channel sized for all of them
/// 3. Wait for every task (join_all), then drain the channel
///
/// Results come back in completion order, not list order.
pub async fn benchmark_mirrors<P>(
    pinger: Arc<P>,
    mirrors: Vec<Mirror>,
    settings: &Settings,
) -> Vec<ProbeResult>
where
    P: Pinger + 'static,
{
    let total = mirrors.len();
    let (tx, mut rx) = mpsc::channel(total.max(1));
    let settings = Arc::new(settings.clone());
    let pb = progress_bar(total, settings.verbose);

    let handles: Vec<_> = mirrors
        .into_iter()
        .enumerate()
        .map(|(order, mirror)| {
            let pinger = Arc::clone(&pinger);
            let settings = Arc::clone(&settings);
            let tx = tx.clone();
            let pb = pb.clone();
            tokio::spawn(async move {
                let outcome = probe_mirror(pinger.as_ref(), &mirror, &settings).await;
                pb.inc(1);
                // Capacity covers every task, so this never waits.
                let _ = tx
                    .send(ProbeResult {
                        order,
                        mirror,
                        outcome,
                    })
                    .await;
            })
        })
        .collect();
    drop(tx);

    for joined in futures::future::join_all(handles).await {
        if let Err(e) = joined {
            tracing::warn!("probe task did not finish: {}", e);
        }
    }
    pb.finish_and_clear();

    let mut results = Vec::with_capacity(total);
    while let Some(result) = rx.recv().await {
        results.push(result);
    }
    results
}
