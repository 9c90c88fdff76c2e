// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::core::maintainers::ProfilePage;
use crate::core::models::{DownloadStats, PythonPackage, RegistryMetadata, StaticAnalysisResult};
use crate::core::sourcehost::{SourceHostData, SourceHostReference};

pub trait RegistryMetadataRetrieval {
    async fn fetch_metadata(&self, package: &PythonPackage) -> anyhow::Result<RegistryMetadata>;
}

pub trait MaintainersDirectory {
    async fn list_maintainers(&self, package: &PythonPackage) -> anyhow::Result<Vec<String>>;
    async fn fetch_profiles(&self, usernames: &[String]) -> anyhow::Result<Vec<ProfilePage>>;
}

pub trait SourceHostRetrieval {
    async fn fetch(&self, reference: &SourceHostReference) -> SourceHostData;
}

pub trait DownloadStatsRetrieval {
    async fn fetch_downloads(&self, package: &PythonPackage) -> anyhow::Result<DownloadStats>;
}

pub trait PackageStaticAnalysis {
    async fn analyse(&self, package: &PythonPackage) -> anyhow::Result<StaticAnalysisResult>;
}
