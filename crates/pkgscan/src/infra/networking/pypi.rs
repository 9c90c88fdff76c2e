// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::core::errors::PkgScanError;
use crate::core::interfaces::{MaintainersDirectory, RegistryMetadataRetrieval};
use crate::core::maintainers;
use crate::core::maintainers::ProfilePage;
use crate::core::models::{PythonPackage, RegistryMetadata};
use crate::infra::networking::http::HTTPClient;
use anyhow::Context;
use std::sync::Arc;

pub static URL_PYPI: &str = "https://pypi.org";

pub struct PyPIClient {
    base_url: String,
    http_client: Arc<HTTPClient>,
}

impl PyPIClient {
    pub fn new(base_url: String, http_client: Arc<HTTPClient>) -> Self {
        Self { base_url, http_client }
    }

    async fn get_page(&self, endpoint: &str) -> anyhow::Result<String> {
        let page = self
            .http_client
            .get(endpoint)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(page)
    }
}

impl RegistryMetadataRetrieval for PyPIClient {
    async fn fetch_metadata(&self, package: &PythonPackage) -> anyhow::Result<RegistryMetadata> {
        let endpoint = format!("{}/pypi/{}/json", self.base_url, package.name);

        let response = self
            .http_client
            .get(&endpoint)
            .send()
            .await
            .map_err(|incoming| PkgScanError::SourceUnavailable {
                origin: "PyPI",
                reason: incoming.to_string(),
            })?;

        let body = response.text().await?;

        // the registry answers unknown packages with an error page instead of metadata
        match serde_json::from_str::<RegistryMetadata>(&body) {
            Ok(metadata) => {
                log::info!(
                    "[pkgscan.pypi] found {} releases for {}",
                    metadata.releases.len(),
                    package
                );
                Ok(metadata)
            },
            Err(incoming) => {
                log::info!("[pkgscan.pypi] cannot parse metadata for {} : {}", package, incoming);
                Err(PkgScanError::PackageNotFound(package.name.clone()).into())
            },
        }
    }
}

impl MaintainersDirectory for PyPIClient {
    async fn list_maintainers(&self, package: &PythonPackage) -> anyhow::Result<Vec<String>> {
        let endpoint = format!("{}/project/{}/", self.base_url, package.name);

        let package_page = self
            .get_page(&endpoint)
            .await
            .context("[pkgscan.pypi] cannot fetch package page")?;

        let usernames = maintainers::maintainer_usernames(&package_page);
        log::info!("[pkgscan.pypi] found {} maintainers for {}", usernames.len(), package);
        Ok(usernames)
    }

    async fn fetch_profiles(&self, usernames: &[String]) -> anyhow::Result<Vec<ProfilePage>> {
        let mut profiles = Vec::with_capacity(usernames.len());

        for username in usernames {
            let endpoint = format!("{}/user/{}/", self.base_url, username);

            let profile_page = self
                .get_page(&endpoint)
                .await
                .with_context(|| format!("[pkgscan.pypi] cannot fetch profile for {}", username))?;

            profiles.push(ProfilePage::new(username, &profile_page));
        }

        Ok(profiles)
    }
}
