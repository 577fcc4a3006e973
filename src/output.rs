use crate::config::Settings;
use crate::error::Result;
use crate::types::RankedMirror;
use crate::utils;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

const FOOTER: &str = "# Generated by mirrorlist";

/// Render the selection as pacman `Server` lines, each preceded by its
/// average latency in seconds.
pub fn render(ranked: &[RankedMirror]) -> String {
    let mut content = String::new();
    for entry in ranked {
        content.push_str(&format!("# {:.6}\n", entry.latency.as_secs_f64()));
        content.push_str(&format!("Server = {}/$repo/os/$arch\n", entry.mirror.url));
    }
    content.push_str(FOOTER);
    content.push('\n');
    content
}

/// Write the rendered list to `--output` (truncating it) or to stdout.
pub async fn write_mirror_list(ranked: &[RankedMirror], settings: &Settings) -> Result<()> {
    let content = render(ranked);

    match settings.output.as_deref() {
        Some(path) => write_file(path, &content, settings.backup).await,
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(content.as_bytes()).await?;
            stdout.flush().await?;
            Ok(())
        }
    }
}

async fn write_file(path: &Path, content: &str, backup: bool) -> Result<()> {
    if backup {
        utils::backup_file(path).await?;
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, content).await?;
    tracing::debug!("mirror list written to {:?}", path);
    Ok(())
}
