// src/fetch.rs

//! Remote export fetcher.
//!
//! The scheduling service publishes the same document in two
//! representations selected by a `format` query parameter: a cheap CSV
//! probe used only for change detection and the full XLSX export that
//! gets parsed into the schedule.

use std::time::Duration;

use url::Url;

use crate::error::Result;
use crate::models::HttpConfig;

/// Export representations offered by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Probe representation, fingerprinted but never parsed.
    Csv,
    /// Full tabular export.
    Xlsx,
}

impl ExportFormat {
    fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// HTTP client bound to the configured export base URL.
pub struct Fetcher {
    client: reqwest::Client,
    base: Url,
}

impl Fetcher {
    /// Create a fetcher for the given base URL.
    pub fn new(config: &HttpConfig, base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)?;
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, base })
    }

    /// Issue one export read. Non-success responses surface as errors;
    /// retry policy lives in the checker, not here.
    async fn fetch(&self, format: ExportFormat) -> Result<Vec<u8>> {
        let url = self.base.join("export")?;
        let response = self
            .client
            .get(url)
            .query(&[("format", format.as_str())])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Download the cheap probe representation.
    pub async fn fetch_probe(&self) -> Result<Vec<u8>> {
        log::info!("Download schedule probe ...");
        self.fetch(ExportFormat::Csv).await
    }

    /// Download the full export for parsing.
    pub async fn fetch_full(&self) -> Result<Vec<u8>> {
        log::info!("Download full schedule export ...");
        self.fetch(ExportFormat::Xlsx).await
    }
}
