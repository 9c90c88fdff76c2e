// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::core::interfaces::{
    DownloadStatsRetrieval, MaintainersDirectory, PackageStaticAnalysis, RegistryMetadataRetrieval,
    SourceHostRetrieval,
};
use crate::core::maintainers::MaintainersSummary;
use crate::core::models::{DownloadStats, PackageReport, PythonPackage, RegistrySummary, StaticAnalysisResult};
use crate::core::releases::ReleaseHistory;
use crate::core::sourcehost;
use crate::core::sourcehost::SourceHostSummary;
use crate::core::sources::{
    DownloadStatsFetcher, MaintainersFetcher, RegistryMetadataFetcher, SourceHostFetcher, StaticAnalyser,
};
use chrono::{NaiveDateTime, Utc};

pub struct PackageAggregator {
    registry: RegistryMetadataFetcher,
    maintainers: MaintainersFetcher,
    source_host: SourceHostFetcher,
    downloads: DownloadStatsFetcher,
    analyser: StaticAnalyser,
}

impl PackageAggregator {
    pub fn new(
        registry: RegistryMetadataFetcher,
        maintainers: MaintainersFetcher,
        source_host: SourceHostFetcher,
        downloads: DownloadStatsFetcher,
        analyser: StaticAnalyser,
    ) -> Self {
        Self {
            registry,
            maintainers,
            source_host,
            downloads,
            analyser,
        }
    }

    pub async fn build(&self, package: &PythonPackage, verbose: bool) -> anyhow::Result<PackageReport> {
        self.build_at(package, verbose, Utc::now().naive_utc()).await
    }

    /// Builds the report for `package`, failing only when the registry has no
    /// usable metadata for it. Every other source degrades to an empty field.
    pub async fn build_at(
        &self,
        package: &PythonPackage,
        verbose: bool,
        now: NaiveDateTime,
    ) -> anyhow::Result<PackageReport> {
        let metadata = self.registry.fetch_metadata(package).await?;
        let history = ReleaseHistory::from_releases(&metadata.releases)?;
        let reference = sourcehost::resolve(&metadata.info);

        let (source_host, maintainers, downloads) = tokio::join!(
            self.source_host.fetch(&reference),
            self.gather_maintainers(package),
            self.gather_downloads(package)
        );

        let static_analysis = match verbose {
            true => Some(self.gather_static_analysis(package).await),
            false => None,
        };

        let report = PackageReport {
            package: package.clone(),
            registry: RegistrySummary::from(&metadata.info),
            releases: history.summarize(now),
            source_host: SourceHostSummary::new(reference, &source_host),
            maintainers,
            downloads,
            static_analysis,
        };

        Ok(report)
    }

    async fn gather_maintainers(&self, package: &PythonPackage) -> Option<MaintainersSummary> {
        let gathered = async {
            let usernames = self.maintainers.list_maintainers(package).await?;
            let profiles = self.maintainers.fetch_profiles(&usernames).await?;
            anyhow::Ok(MaintainersSummary::new(usernames, &profiles))
        }
        .await;

        match gathered {
            Ok(summary) => Some(summary),
            Err(incoming) => {
                log::warn!("[pkgscan.aggregator] cannot gather maintainers for {} : {:#}", package, incoming);
                None
            },
        }
    }

    async fn gather_downloads(&self, package: &PythonPackage) -> Option<DownloadStats> {
        match self.downloads.fetch_downloads(package).await {
            Ok(stats) => Some(stats),
            Err(incoming) => {
                log::warn!("[pkgscan.aggregator] cannot gather downloads for {} : {:#}", package, incoming);
                None
            },
        }
    }

    async fn gather_static_analysis(&self, package: &PythonPackage) -> StaticAnalysisResult {
        match self.analyser.analyse(package).await {
            Ok(result) => result,
            Err(incoming) => {
                log::warn!("[pkgscan.aggregator] cannot analyse {} : {:#}", package, incoming);
                StaticAnalysisResult::failed()
            },
        }
    }
}
