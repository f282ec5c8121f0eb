use anyhow::{bail, Context, Result};
use std::time::Duration;
use url::Url;

use crate::ayd::DEFAULT_TIMEOUT_SECS;
use crate::mcp::ServerInfo;

/// Configuration for the server
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Ayd instance
    pub ayd_url: Url,
    /// Per-request timeout against Ayd
    pub timeout: Duration,
    /// Advertised in `initialize`
    pub server_info: ServerInfo,
}

impl Config {
    /// Validate raw CLI values.
    ///
    /// The URL must be absolute and use `http` or `https`.
    pub fn new(ayd_url: &str, timeout_secs: u64) -> Result<Self> {
        let ayd_url =
            Url::parse(ayd_url).with_context(|| format!("Invalid Ayd URL: {}", ayd_url))?;

        if !matches!(ayd_url.scheme(), "http" | "https") {
            bail!(
                "Invalid Ayd URL: {} (scheme must be http or https)",
                ayd_url
            );
        }
        if timeout_secs == 0 {
            bail!("Timeout must be at least 1 second");
        }

        Ok(Self {
            ayd_url,
            timeout: Duration::from_secs(timeout_secs),
            server_info: ServerInfo::default(),
        })
    }

    pub fn with_default_timeout(ayd_url: &str) -> Result<Self> {
        Self::new(ayd_url, DEFAULT_TIMEOUT_SECS)
    }
}
