// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::core::maintainers::MaintainersSummary;
use crate::core::sourcehost::SourceHostSummary;
use anyhow::bail;
use indexmap::IndexMap;
use packageurl::PackageUrl;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Hash, Eq)]
pub struct PythonPackage {
    pub name: String,
}

impl PythonPackage {
    pub fn with(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

impl TryFrom<String> for PythonPackage {
    type Error = anyhow::Error;

    fn try_from(value: String) -> anyhow::Result<Self> {
        let trimmed = value.trim();

        if !trimmed.starts_with("pkg:") {
            if trimmed.is_empty() || trimmed.contains(['/', ' ']) {
                bail!("pkgscan.cli : '{}' is not a valid package name", value);
            }
            return Ok(PythonPackage::with(trimmed));
        }

        let purl = PackageUrl::from_str(trimmed)?;
        if purl.ty() != "pypi" {
            bail!("pkgscan.cli : expecting a pypi package url, got '{}'", purl.ty());
        }

        Ok(PythonPackage::with(purl.name()))
    }
}

impl Display for PythonPackage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("pkg:pypi/{}", self.name))
    }
}

/// One distributable file uploaded for a given version
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ReleaseArtifact {
    pub upload_time: String,
    #[serde(default)]
    pub has_sig: bool,
}

impl ReleaseArtifact {
    #[cfg(test)]
    pub fn uploaded_at(upload_time: &str) -> Self {
        Self {
            upload_time: upload_time.to_string(),
            has_sig: false,
        }
    }
}

pub type ReleaseMap = BTreeMap<String, Vec<ReleaseArtifact>>;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: Option<String>,
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub home_page: Option<String>,
    pub license: Option<String>,
    pub summary: Option<String>,
    pub project_urls: Option<IndexMap<String, String>>,
}

/// Payload served by the registry JSON endpoint
#[derive(Clone, Debug, Deserialize)]
pub struct RegistryMetadata {
    pub info: PackageInfo,
    #[serde(default)]
    pub releases: ReleaseMap,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RegistrySummary {
    pub name: String,
    pub version: Option<String>,
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub home_page: Option<String>,
    pub license: Option<String>,
    pub summary: Option<String>,
}

impl From<&PackageInfo> for RegistrySummary {
    fn from(info: &PackageInfo) -> Self {
        let non_blank = |field: &Option<String>| field.as_ref().filter(|value| !value.trim().is_empty()).cloned();

        Self {
            name: info.name.clone(),
            version: non_blank(&info.version),
            author: non_blank(&info.author),
            author_email: non_blank(&info.author_email),
            home_page: non_blank(&info.home_page),
            license: non_blank(&info.license),
            summary: non_blank(&info.summary),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReleaseSummary {
    pub first_release_date: Option<String>,
    pub last_release_date: Option<String>,
    pub latest_version: Option<String>,
    pub version_count: usize,
    pub latest_signed: bool,
    pub releases_past_year: usize,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct DownloadStats {
    pub last_day: u64,
    pub last_week: u64,
    pub last_month: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub all: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SecurityFindings {
    Counted(SeverityCounts),
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LintScore {
    Average(f64),
    NoFilesFound,
    Error,
}

impl Display for LintScore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LintScore::Average(score) => f.write_fmt(format_args!("{:.2}", score)),
            LintScore::NoFilesFound => f.write_str("No files found"),
            LintScore::Error => f.write_str("Error"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StaticAnalysisResult {
    pub security: SecurityFindings,
    pub lint: LintScore,
}

impl StaticAnalysisResult {
    pub fn failed() -> Self {
        Self {
            security: SecurityFindings::Error,
            lint: LintScore::Error,
        }
    }
}

/// Everything we learned about a package, built once per invocation
#[derive(Clone, Debug)]
pub struct PackageReport {
    pub package: PythonPackage,
    pub registry: RegistrySummary,
    pub releases: ReleaseSummary,
    pub source_host: SourceHostSummary,
    pub maintainers: Option<MaintainersSummary>,
    pub downloads: Option<DownloadStats>,
    pub static_analysis: Option<StaticAnalysisResult>,
}
