// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

#[cfg(test)]
use crate::core::errors::PkgScanError;
use crate::core::interfaces::{
    DownloadStatsRetrieval, MaintainersDirectory, PackageStaticAnalysis, RegistryMetadataRetrieval,
    SourceHostRetrieval,
};
use crate::core::maintainers::ProfilePage;
use crate::core::models::{DownloadStats, PythonPackage, RegistryMetadata, StaticAnalysisResult};
use crate::core::sourcehost::{SourceHostData, SourceHostReference};
use crate::infra::analysis::StaticAnalysisRunner;
use crate::infra::networking::github::GitHubClient;
use crate::infra::networking::pypi::PyPIClient;
use crate::infra::networking::pypistats::PyPIStatsClient;

pub enum RegistryMetadataFetcher {
    PyPI(PyPIClient),
    #[cfg(test)]
    FakeRegistry(Option<RegistryMetadata>),
}

impl RegistryMetadataRetrieval for RegistryMetadataFetcher {
    async fn fetch_metadata(&self, package: &PythonPackage) -> anyhow::Result<RegistryMetadata> {
        match self {
            RegistryMetadataFetcher::PyPI(delegate) => delegate.fetch_metadata(package).await,
            #[cfg(test)]
            RegistryMetadataFetcher::FakeRegistry(metadata) => metadata
                .clone()
                .ok_or_else(|| PkgScanError::PackageNotFound(package.name.clone()).into()),
        }
    }
}

pub enum MaintainersFetcher {
    PyPI(PyPIClient),
    #[cfg(test)]
    FakeDirectory(Option<Vec<ProfilePage>>),
}

impl MaintainersDirectory for MaintainersFetcher {
    async fn list_maintainers(&self, package: &PythonPackage) -> anyhow::Result<Vec<String>> {
        match self {
            MaintainersFetcher::PyPI(delegate) => delegate.list_maintainers(package).await,
            #[cfg(test)]
            MaintainersFetcher::FakeDirectory(profiles) => {
                let profiles = profiles.as_ref().ok_or(PkgScanError::SourceUnavailable {
                    origin: "fake directory",
                    reason: "unreachable".to_string(),
                })?;
                Ok(profiles.iter().map(|profile| profile.username.clone()).collect())
            },
        }
    }

    async fn fetch_profiles(&self, usernames: &[String]) -> anyhow::Result<Vec<ProfilePage>> {
        match self {
            MaintainersFetcher::PyPI(delegate) => delegate.fetch_profiles(usernames).await,
            #[cfg(test)]
            MaintainersFetcher::FakeDirectory(profiles) => {
                let profiles = profiles.clone().unwrap_or_default();
                let pages = usernames
                    .iter()
                    .filter_map(|username| profiles.iter().find(|profile| &profile.username == username))
                    .cloned()
                    .collect();
                Ok(pages)
            },
        }
    }
}

pub enum SourceHostFetcher {
    GitHub(GitHubClient),
    #[cfg(test)]
    FakeHost(SourceHostData),
}

impl SourceHostRetrieval for SourceHostFetcher {
    async fn fetch(&self, reference: &SourceHostReference) -> SourceHostData {
        if reference.is_empty() {
            return SourceHostData::NotFound;
        }

        match self {
            SourceHostFetcher::GitHub(delegate) => delegate.fetch(reference).await,
            #[cfg(test)]
            SourceHostFetcher::FakeHost(data) => data.clone(),
        }
    }
}

pub enum DownloadStatsFetcher {
    PyPIStats(PyPIStatsClient),
    #[cfg(test)]
    FakeStats(Option<DownloadStats>),
}

impl DownloadStatsRetrieval for DownloadStatsFetcher {
    async fn fetch_downloads(&self, package: &PythonPackage) -> anyhow::Result<DownloadStats> {
        match self {
            DownloadStatsFetcher::PyPIStats(delegate) => delegate.fetch_downloads(package).await,
            #[cfg(test)]
            DownloadStatsFetcher::FakeStats(stats) => stats.ok_or_else(|| {
                PkgScanError::SourceUnavailable {
                    origin: "fake stats",
                    reason: "unreachable".to_string(),
                }
                .into()
            }),
        }
    }
}

pub enum StaticAnalyser {
    Local(StaticAnalysisRunner),
    #[cfg(test)]
    FakeAnalyser(Option<StaticAnalysisResult>),
}

impl PackageStaticAnalysis for StaticAnalyser {
    async fn analyse(&self, package: &PythonPackage) -> anyhow::Result<StaticAnalysisResult> {
        match self {
            StaticAnalyser::Local(delegate) => delegate.analyse(package).await,
            #[cfg(test)]
            StaticAnalyser::FakeAnalyser(result) => result.clone().ok_or_else(|| {
                PkgScanError::ToolInvocation {
                    tool: "fake analyser".to_string(),
                    reason: "unreachable".to_string(),
                }
                .into()
            }),
        }
    }
}
