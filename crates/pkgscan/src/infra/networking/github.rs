// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::core::errors::PkgScanError;
use crate::core::interfaces::SourceHostRetrieval;
use crate::core::sourcehost::{RepositoryMetadata, ScrapedPage, SourceHostData, SourceHostReference};
use crate::infra::networking::http::{HTTPClient, github_api_headers};
use reqwest::StatusCode;
use std::sync::Arc;

pub static URL_GITHUB_API: &str = "https://api.github.com";

static GITHUB_API: &str = "GitHub API";

pub struct GitHubClient {
    api_url: String,
    http_client: Arc<HTTPClient>,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(api_url: String, http_client: Arc<HTTPClient>, token: Option<String>) -> Self {
        Self {
            api_url,
            http_client,
            token,
        }
    }

    async fn get_repository(&self, slug: &str) -> anyhow::Result<RepositoryMetadata> {
        let endpoint = format!("{}/repos/{}", self.api_url, slug);

        let headers = github_api_headers(self.token.as_deref())?;

        let response = self
            .http_client
            .get(&endpoint)
            .headers(headers)
            .send()
            .await.map_err(|incoming| PkgScanError::SourceUnavailable {
            origin: GITHUB_API,
            reason: incoming.to_string(),
        })?;

        match response.status() {
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                return Err(PkgScanError::RateLimited(GITHUB_API).into());
            },
            status if !status.is_success() => {
                return Err(PkgScanError::SourceUnavailable {
                    origin: GITHUB_API,
                    reason: format!("status {}", status),
                }
                .into());
            },
            _ => {},
        }

        let metadata = response.json::<RepositoryMetadata>().await?;
        Ok(metadata)
    }

    async fn scrape_repository_page(&self, url: &str) -> anyhow::Result<ScrapedPage> {
        let html = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(ScrapedPage { html })
    }
}

impl SourceHostRetrieval for GitHubClient {
    async fn fetch(&self, reference: &SourceHostReference) -> SourceHostData {
        let Some(url) = reference.url() else {
            return SourceHostData::NotFound;
        };

        let rate_limited = match reference.repository_slug() {
            Some(slug) => match self.get_repository(&slug).await {
                Ok(metadata) => {
                    log::info!("[pkgscan.github] fetched repository metadata for {}", slug);
                    return SourceHostData::Api(metadata);
                },
                Err(incoming) => {
                    log::info!("[pkgscan.github] falling back to page scraping for {} : {}", slug, incoming);
                    PkgScanError::is_rate_limited(&incoming)
                },
            },
            None => false,
        };

        match self.scrape_repository_page(url).await {
            Ok(page) => SourceHostData::Scrape(page),
            Err(incoming) => {
                log::warn!("[pkgscan.github] cannot scrape {} : {}", url, incoming);
                SourceHostData::Unavailable { rate_limited }
            },
        }
    }
}
