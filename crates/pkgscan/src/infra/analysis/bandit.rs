// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::core::errors::PkgScanError;
use crate::core::models::{SecurityFindings, SeverityCounts};
use anyhow::Context;
use camino::Utf8Path;
use serde::Deserialize;
use std::fs;
use tokio::process::Command;

pub static BANDIT_REPORT: &str = "bandit.csv";

#[derive(Debug, Deserialize)]
struct BanditFinding {
    issue_severity: String,
}

/// Counts every finding of a bandit CSV report, and the findings per severity
pub fn parse_report(report: &str) -> anyhow::Result<SeverityCounts> {
    let mut reader = csv::Reader::from_reader(report.as_bytes());
    let mut counts = SeverityCounts::default();

    for record in reader.deserialize::<BanditFinding>() {
        let finding = record.context("[pkgscan.bandit] malformed report entry")?;
        counts.all += 1;

        match finding.issue_severity.trim().to_uppercase().as_str() {
            "LOW" => counts.low += 1,
            "MEDIUM" => counts.medium += 1,
            "HIGH" => counts.high += 1,
            _ => {},
        }
    }

    Ok(counts)
}

pub async fn scan(executable: &str, target: &Utf8Path) -> SecurityFindings {
    let report_path = target.join(BANDIT_REPORT);

    let invocation = Command::new(executable)
        .args(["--quiet", "--recursive", "--format", "csv", "-o"])
        .arg(report_path.as_str())
        .arg("--ignore-nosec")
        .arg(target.as_str())
        .output()
        .await;

    // bandit exits with 1 whenever it finds something, so only the report tells
    if let Err(incoming) = invocation {
        let failure = PkgScanError::ToolInvocation {
            tool: executable.to_string(),
            reason: incoming.to_string(),
        };
        log::warn!("[pkgscan.bandit] {}", failure);
        return SecurityFindings::Error;
    }

    let counted = fs::read_to_string(&report_path)
        .context("[pkgscan.bandit] no report produced")
        .and_then(|report| parse_report(&report));

    match counted {
        Ok(counts) => {
            log::info!("[pkgscan.bandit] found {} issues", counts.all);
            SecurityFindings::Counted(counts)
        },
        Err(incoming) => {
            log::warn!("{:#}", incoming);
            SecurityFindings::Error
        },
    }
}
