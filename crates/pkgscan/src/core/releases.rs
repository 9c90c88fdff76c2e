// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::core::errors::PkgScanError;
use crate::core::models::{ReleaseArtifact, ReleaseMap, ReleaseSummary};
use crate::core::versions;
use chrono::{NaiveDateTime, TimeDelta};

/// Upload time assumed for versions that have no artifacts at all
pub static MISSING_UPLOAD_TIME: &str = "2010-11-04T00:05:23";

static RECENT_RELEASES_WINDOW_DAYS: i64 = 365;

/// Release map ordered once by version precedence, shared by every
/// release-derived field of a report
#[derive(Clone, Debug)]
pub struct ReleaseHistory {
    ordered: Vec<(String, Vec<ReleaseArtifact>)>,
}

impl ReleaseHistory {
    pub fn from_releases(releases: &ReleaseMap) -> Result<Self, PkgScanError> {
        let ordered = versions::sort_versions(releases.keys())?
            .into_iter()
            .map(|version| {
                let artifacts = releases.get(&version).cloned().unwrap_or_default();
                (version, artifacts)
            })
            .collect();

        Ok(Self { ordered })
    }

    pub fn version_count(&self) -> usize {
        self.ordered.len()
    }

    pub fn latest_version(&self) -> Option<&str> {
        self.ordered.last().map(|(version, _)| version.as_str())
    }

    /// Date of the lowest version that actually shipped artifacts
    pub fn first_release_date(&self) -> Result<String, PkgScanError> {
        self.ordered
            .iter()
            .find_map(|(_, artifacts)| artifacts.first())
            .map(|artifact| calendar_date(&artifact.upload_time))
            .ok_or(PkgScanError::NoReleasesFound)
    }

    /// Date of the highest version, which is `None` when that version has no artifacts.
    ///
    /// Unlike `first_release_date`, empty versions are not skipped here.
    pub fn last_release_date(&self) -> Option<String> {
        self.latest_artifacts()
            .first()
            .map(|artifact| calendar_date(&artifact.upload_time))
    }

    pub fn is_latest_signed(&self) -> bool {
        self.latest_artifacts().iter().any(|artifact| artifact.has_sig)
    }

    /// Counts consecutive versions, from the highest one down, uploaded within
    /// the last year. Counting halts at the first older version, even when
    /// lower-ordered versions would still fall inside the window.
    pub fn releases_in_past_year(&self, now: NaiveDateTime) -> usize {
        let cutoff = now - TimeDelta::days(RECENT_RELEASES_WINDOW_DAYS);

        self.ordered
            .iter()
            .rev()
            .map(|(version, artifacts)| upload_datetime(version, artifacts))
            .take_while(|uploaded| *uploaded > cutoff)
            .count()
    }

    pub fn summarize(&self, now: NaiveDateTime) -> ReleaseSummary {
        let first_release_date = match self.first_release_date() {
            Ok(date) => Some(date),
            Err(incoming) => {
                log::warn!("[pkgscan.releases] {}", incoming);
                None
            },
        };

        ReleaseSummary {
            first_release_date,
            last_release_date: self.last_release_date(),
            latest_version: self.latest_version().map(str::to_string),
            version_count: self.version_count(),
            latest_signed: self.is_latest_signed(),
            releases_past_year: self.releases_in_past_year(now),
        }
    }

    fn latest_artifacts(&self) -> &[ReleaseArtifact] {
        self.ordered
            .last()
            .map(|(_, artifacts)| artifacts.as_slice())
            .unwrap_or_default()
    }
}

fn calendar_date(upload_time: &str) -> String {
    upload_time.chars().take(10).collect()
}

fn upload_datetime(version: &str, artifacts: &[ReleaseArtifact]) -> NaiveDateTime {
    let upload_time = artifacts
        .first()
        .map(|artifact| artifact.upload_time.as_str())
        .unwrap_or(MISSING_UPLOAD_TIME);

    upload_time.parse::<NaiveDateTime>().unwrap_or_else(|_| {
        log::warn!(
            "[pkgscan.releases] cannot parse upload time '{}' for version {}",
            upload_time,
            version
        );
        NaiveDateTime::default()
    })
}
