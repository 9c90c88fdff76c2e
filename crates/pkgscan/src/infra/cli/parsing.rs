// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::core::models::PythonPackage;
use crate::infra::networking::github::URL_GITHUB_API;
use crate::infra::networking::pypi::URL_PYPI;
use crate::infra::networking::pypistats::URL_PYPISTATS;
use crate::ioc::Endpoints;
use crate::pkgscan::ScanRequest;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct CliParser {
    /// Package name or package url (purl) to inspect
    pub name: String,

    /// Also download the package and run static analysis tools against it
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_colors: bool,

    /// Token for authenticated calls to the GitHub API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    #[arg(long, env = "PKGSCAN_PYPI_URL", default_value = URL_PYPI, hide = true)]
    pub pypi_url: String,

    #[arg(long, env = "PKGSCAN_GITHUB_API_URL", default_value = URL_GITHUB_API, hide = true)]
    pub github_api_url: String,

    #[arg(long, env = "PKGSCAN_PYPISTATS_URL", default_value = URL_PYPISTATS, hide = true)]
    pub pypistats_url: String,
}

pub fn parse_arguments() -> anyhow::Result<ScanRequest> {
    scan_request(CliParser::parse())
}

fn scan_request(cli: CliParser) -> anyhow::Result<ScanRequest> {
    let package = PythonPackage::try_from(cli.name)?;

    let endpoints = Endpoints {
        pypi: cli.pypi_url.trim_end_matches('/').to_string(),
        github_api: cli.github_api_url.trim_end_matches('/').to_string(),
        pypistats: cli.pypistats_url.trim_end_matches('/').to_string(),
    };

    let github_token = cli.github_token.filter(|token| !token.trim().is_empty());

    Ok(ScanRequest {
        package,
        verbose: cli.verbose,
        use_colors: !cli.no_colors,
        github_token,
        endpoints,
    })
}
