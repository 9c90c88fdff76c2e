// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::core::interfaces::DownloadStatsRetrieval;
use crate::core::models::{DownloadStats, PythonPackage};
use crate::infra::networking::http::HTTPClient;
use anyhow::Context;
use serde::Deserialize;
use std::sync::Arc;

pub static URL_PYPISTATS: &str = "https://pypistats.org";

#[derive(Debug, Deserialize)]
struct RecentDownloads {
    data: DownloadStats,
}

pub struct PyPIStatsClient {
    base_url: String,
    http_client: Arc<HTTPClient>,
}

impl PyPIStatsClient {
    pub fn new(base_url: String, http_client: Arc<HTTPClient>) -> Self {
        Self { base_url, http_client }
    }
}

impl DownloadStatsRetrieval for PyPIStatsClient {
    async fn fetch_downloads(&self, package: &PythonPackage) -> anyhow::Result<DownloadStats> {
        let endpoint = format!("{}/api/packages/{}/recent", self.base_url, package.name);

        let recent = self
            .http_client
            .get(&endpoint)
            .send()
            .await?
            .error_for_status()
            .context("[pkgscan.pypistats] cannot fetch recent downloads")?
            .json::<RecentDownloads>()
            .await?;

        log::info!("[pkgscan.pypistats] fetched recent downloads for {}", package);
        Ok(recent.data)
    }
}
