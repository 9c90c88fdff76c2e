// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::core::aggregator::PackageAggregator;
use crate::core::models::PythonPackage;
use crate::infra::reporting::console::ConsoleReporter;
use crate::ioc::Endpoints;

#[derive(Debug)]
pub struct ScanRequest {
    pub package: PythonPackage,
    pub verbose: bool,
    pub use_colors: bool,
    pub github_token: Option<String>,
    pub endpoints: Endpoints,
}

pub struct PkgScan {
    aggregator: PackageAggregator,
    reporter: ConsoleReporter,
}

impl PkgScan {
    pub fn new(aggregator: PackageAggregator, reporter: ConsoleReporter) -> Self {
        Self { aggregator, reporter }
    }

    pub async fn execute(&self, package: &PythonPackage, verbose: bool) -> anyhow::Result<()> {
        self.reporter.report_scan_started(package, verbose);

        log::info!("[pkgscan.executor] building report for {}", package);
        let report = self.aggregator.build(package, verbose).await?;
        log::info!("[pkgscan.executor] report ready for {}", package);

        self.reporter.report_package(&report);
        Ok(())
    }
}
