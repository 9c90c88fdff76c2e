// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PkgScanError {
    #[error("no such package on PyPI : {0}")]
    PackageNotFound(String),

    #[error("{origin} is unavailable ({reason})")]
    SourceUnavailable { origin: &'static str, reason: String },

    #[error("rate limited by {0}")]
    RateLimited(&'static str),

    #[error("invalid version identifier : '{0}'")]
    InvalidVersion(String),

    #[error("no releases with distributable artifacts found")]
    NoReleasesFound,

    #[error("cannot run {tool} ({reason})")]
    ToolInvocation { tool: String, reason: String },

    #[error("cannot download package {package} ({reason})")]
    Download { package: String, reason: String },
}

impl PkgScanError {
    pub fn is_rate_limited(error: &anyhow::Error) -> bool {
        matches!(error.downcast_ref::<PkgScanError>(), Some(PkgScanError::RateLimited(_)))
    }
}
