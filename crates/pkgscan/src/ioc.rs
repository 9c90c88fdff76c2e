// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::core::aggregator::PackageAggregator;
use crate::core::sources::{
    DownloadStatsFetcher, MaintainersFetcher, RegistryMetadataFetcher, SourceHostFetcher, StaticAnalyser,
};
use crate::infra::analysis::{AnalysisTools, StaticAnalysisRunner};
use crate::infra::networking::github::GitHubClient;
use crate::infra::networking::http::HTTP_CLIENT;
use crate::infra::networking::pypi::PyPIClient;
use crate::infra::networking::pypistats::PyPIStatsClient;
use crate::infra::reporting::console::ConsoleReporter;
use crate::pkgscan::{PkgScan, ScanRequest};
use camino::Utf8PathBuf;
use std::env::home_dir;
use std::path::PathBuf;

static PKGSCAN_HOME: &str = ".pkgscan";
static WORKING_DIR_NAME: &str = "pkg-source";
static FALLBACK_WORKING_DIR: &str = "/var/cache/.pkgscan/pkg-source";

#[derive(Clone, Debug, PartialEq)]
pub struct Endpoints {
    pub pypi: String,
    pub github_api: String,
    pub pypistats: String,
}

fn working_dir() -> Utf8PathBuf {
    let base = match home_dir() {
        None => PathBuf::from("/var/cache"),
        Some(dir) => dir,
    };

    Utf8PathBuf::try_from(base.join(PKGSCAN_HOME).join(WORKING_DIR_NAME))
        .unwrap_or_else(|_| Utf8PathBuf::from(FALLBACK_WORKING_DIR))
}

fn pypi_client(endpoints: &Endpoints) -> PyPIClient {
    PyPIClient::new(endpoints.pypi.clone(), HTTP_CLIENT.clone())
}

fn source_host_fetcher(request: &ScanRequest) -> SourceHostFetcher {
    let delegate = GitHubClient::new(
        request.endpoints.github_api.clone(),
        HTTP_CLIENT.clone(),
        request.github_token.clone(),
    );
    SourceHostFetcher::GitHub(delegate)
}

fn download_stats_fetcher(endpoints: &Endpoints) -> DownloadStatsFetcher {
    let delegate = PyPIStatsClient::new(endpoints.pypistats.clone(), HTTP_CLIENT.clone());
    DownloadStatsFetcher::PyPIStats(delegate)
}

fn static_analyser() -> StaticAnalyser {
    let delegate = StaticAnalysisRunner::new(working_dir(), AnalysisTools::default());
    StaticAnalyser::Local(delegate)
}

fn package_aggregator(request: &ScanRequest) -> PackageAggregator {
    PackageAggregator::new(
        RegistryMetadataFetcher::PyPI(pypi_client(&request.endpoints)),
        MaintainersFetcher::PyPI(pypi_client(&request.endpoints)),
        source_host_fetcher(request),
        download_stats_fetcher(&request.endpoints),
        static_analyser(),
    )
}

pub fn create_pkgscan(request: &ScanRequest) -> PkgScan {
    PkgScan::new(package_aggregator(request), ConsoleReporter::new(request.use_colors))
}
