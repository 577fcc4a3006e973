use crate::config::Protocol;
use crate::error::{MirrorError, Result};
use crate::traits::MirrorSource;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const ALL_LINK: &str = "https://archlinux.org/mirrorlist/all";
const HTTP_LINK: &str = "https://archlinux.org/mirrorlist/all/http";
const HTTPS_LINK: &str = "https://archlinux.org/mirrorlist/all/https";

pub fn list_url(protocol: Protocol) -> &'static str {
    match protocol {
        Protocol::All => ALL_LINK,
        Protocol::Http => HTTP_LINK,
        Protocol::Https => HTTPS_LINK,
    }
}

/// The official Arch Linux mirror list generator.
pub struct ArchLinuxSource {
    url: String,
    client: Client,
    timeout: Duration,
}

impl ArchLinuxSource {
    pub fn new(client: Client, protocol: Protocol, timeout: Duration) -> Self {
        Self::with_url(client, list_url(protocol), timeout)
    }

    pub fn with_url(client: Client, url: &str, timeout: Duration) -> Self {
        Self {
            url: url.to_string(),
            client,
            timeout,
        }
    }

    fn unavailable(&self, reason: impl ToString) -> MirrorError {
        MirrorError::SourceUnavailable {
            url: self.url.clone(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl MirrorSource for ArchLinuxSource {
    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<String> {
        let resp = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.unavailable(e))?;

        if !resp.status().is_success() {
            return Err(self.unavailable(format!("got {} status code", resp.status())));
        }

        resp.text().await.map_err(|e| self.unavailable(e))
    }
}
