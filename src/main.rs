mod config;
mod error;
mod output;
mod probe;
mod rank;
mod sources;
mod traits;
mod types;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Args, Settings};
use probe::HttpPinger;
use reqwest::Client;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use traits::{MirrorSource, Pinger};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so the generated list can be piped from stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

async fn run(args: Args) -> Result<()> {
    let settings = Settings::resolve(&args)?;

    // One client (and connection pool) for the list and every probe.
    // Its timeout is the per-mirror one; the list request overrides it.
    let client = Client::builder()
        .timeout(settings.mirror_timeout)
        .build()
        .context("could not build HTTP client")?;

    let source = sources::get_source(client.clone(), &settings);
    let pinger = Arc::new(HttpPinger::new(client));
    generate(source.as_ref(), pinger, &settings).await?;
    Ok(())
}

/// fetch -> parse -> probe -> rank -> write.
/// Nothing is written unless ranking succeeded.
async fn generate<P>(
    source: &dyn MirrorSource,
    pinger: Arc<P>,
    settings: &Settings,
) -> error::Result<()>
where
    P: Pinger + 'static,
{
    // 1. Fetch and parse the mirror list
    let listing = source.fetch().await?;
    let mirrors = sources::parse_mirror_list(&listing)?;
    tracing::info!("found {} mirror(s) in {}", mirrors.len(), source.url());

    // 2. Ping every mirror
    let begin = Instant::now();
    let results = probe::benchmark_mirrors(pinger, mirrors, settings).await;
    let responded = results
        .iter()
        .filter(|r| r.average_latency().is_some())
        .count();
    tracing::info!("{} of {} mirror(s) responded", responded, results.len());

    // 3. Rank, then write only if we got enough
    let ranked = rank::select_fastest(results, settings.count)?;
    output::write_mirror_list(&ranked, settings).await?;

    tracing::info!("mirror list is generated");
    tracing::info!("executed in {:.2} seconds", begin.elapsed().as_secs_f64());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MirrorError;
    use crate::types::ProbeFailure;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;
    use tempfile::tempdir;
    use tokio::fs;

    struct StaticSource(&'static str);

    #[async_trait]
    impl MirrorSource for StaticSource {
        fn url(&self) -> &str {
            "static"
        }

        async fn fetch(&self) -> error::Result<String> {
            Ok(self.0.to_string())
        }
    }

    /// URL -> latency; missing URLs time out.
    struct FixedPinger(HashMap<&'static str, u64>);

    #[async_trait]
    impl Pinger for FixedPinger {
        async fn ping(&self, url: &str) -> std::result::Result<(), ProbeFailure> {
            match self.0.get(url) {
                Some(ms) => {
                    tokio::time::sleep(Duration::from_millis(*ms)).await;
                    Ok(())
                }
                None => Err(ProbeFailure::Network("timed out".to_string())),
            }
        }
    }

    const LISTING: &str = "## Worldwide\n\
                           #Server = https://x.example.org/$repo/os/$arch\n\
                           #Server = https://y.example.org/$repo/os/$arch\n\
                           #Server = https://z.example.org/$repo/os/$arch\n";

    fn pinger() -> Arc<FixedPinger> {
        Arc::new(FixedPinger(HashMap::from([
            ("https://x.example.org", 300),
            ("https://y.example.org", 100),
        ])))
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_writes_fastest() -> error::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("mirrorlist");
        let settings = Settings {
            count: 2,
            pings: 2,
            output: Some(path.clone()),
            ..Settings::default()
        };

        generate(&StaticSource(LISTING), pinger(), &settings).await?;

        let content = fs::read_to_string(&path).await?;
        let servers: Vec<_> = content.lines().filter(|l| l.starts_with("Server")).collect();
        assert_eq!(
            servers,
            vec![
                "Server = https://y.example.org/$repo/os/$arch",
                "Server = https://x.example.org/$repo/os/$arch",
            ]
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_leaves_output_alone_on_failure() -> error::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("mirrorlist");
        let previous = "Server = https://old.example.org/$repo/os/$arch\n";
        fs::write(&path, previous).await?;

        let settings = Settings {
            count: 3,
            pings: 2,
            output: Some(path.clone()),
            backup: true,
            ..Settings::default()
        };

        match generate(&StaticSource(LISTING), pinger(), &settings).await {
            Err(MirrorError::InsufficientMirrors {
                requested,
                available,
            }) => {
                assert_eq!(requested, 3);
                assert_eq!(available, 2);
            }
            other => panic!("expected InsufficientMirrors, got {:?}", other),
        }

        assert_eq!(fs::read_to_string(&path).await?, previous);
        // Not even a backup copy.
        let mut entries = fs::read_dir(dir.path()).await?;
        let mut count = 0;
        while entries.next_entry().await?.is_some() {
            count += 1;
        }
        assert_eq!(count, 1);
        Ok(())
    }
}
