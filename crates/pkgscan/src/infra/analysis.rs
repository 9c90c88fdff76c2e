// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

pub mod bandit;
pub mod pylint;
pub mod workspace;

use crate::core::errors::PkgScanError;
use crate::core::interfaces::PackageStaticAnalysis;
use crate::core::models::{LintScore, PythonPackage, SecurityFindings, StaticAnalysisResult};
use crate::infra::analysis::workspace::AnalysisWorkspace;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use decompress::{Decompressor, ExtractOptsBuilder, decompressors};
use std::fs;
use tokio::process::Command;

/// Executables invoked while analysing a package
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisTools {
    pub python: String,
    pub bandit: String,
    pub pylint: String,
}

impl Default for AnalysisTools {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            bandit: "bandit".to_string(),
            pylint: "pylint".to_string(),
        }
    }
}

pub struct StaticAnalysisRunner {
    working_dir: Utf8PathBuf,
    tools: AnalysisTools,
}

impl StaticAnalysisRunner {
    pub fn new(working_dir: Utf8PathBuf, tools: AnalysisTools) -> Self {
        Self { working_dir, tools }
    }

    /// Fetches the package distribution into a freshly acquired working directory,
    /// unpacking every archive found there
    pub async fn download(&self, package: &PythonPackage) -> anyhow::Result<AnalysisWorkspace> {
        let workspace = AnalysisWorkspace::acquire(&self.working_dir).await?;

        log::info!("[pkgscan.analysis] downloading package : {}", package);

        let output = Command::new(&self.tools.python)
            .args(["-m", "pip", "-q", "download", "--no-dependencies", "--destination-directory"])
            .arg(workspace.path().as_str())
            .arg(&package.name)
            .output()
            .await
            .map_err(|incoming| PkgScanError::ToolInvocation {
                tool: self.tools.python.clone(),
                reason: incoming.to_string(),
            })?;

        if !output.status.success() {
            return Err(PkgScanError::Download {
                package: package.name.clone(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        unpack_archives(workspace.path()).map_err(|incoming| PkgScanError::Download {
            package: package.name.clone(),
            reason: format!("{:#}", incoming),
        })?;

        log::info!("[pkgscan.analysis] downloaded and extracted files for {}", package);
        Ok(workspace)
    }

    pub async fn run_security_scan(&self, working_dir: &Utf8Path) -> SecurityFindings {
        bandit::scan(&self.tools.bandit, working_dir).await
    }

    pub async fn run_lint_scan(&self, working_dir: &Utf8Path) -> LintScore {
        pylint::scan(&self.tools.pylint, working_dir).await
    }

    pub fn cleanup(&self, workspace: AnalysisWorkspace) {
        workspace.cleanup()
    }
}

impl PackageStaticAnalysis for StaticAnalysisRunner {
    async fn analyse(&self, package: &PythonPackage) -> anyhow::Result<StaticAnalysisResult> {
        let workspace = self.download(package).await?;

        let security = self.run_security_scan(workspace.path()).await;
        let lint = self.run_lint_scan(workspace.path()).await;

        self.cleanup(workspace);
        Ok(StaticAnalysisResult { security, lint })
    }
}

fn unpack_archives(working_dir: &Utf8Path) -> anyhow::Result<()> {
    let extraction_opts = ExtractOptsBuilder::default().build()?;

    for entry in working_dir.read_dir_utf8()? {
        let archive = entry?.into_path();
        let file_name = archive.file_name().unwrap_or_default();

        let (stem, decompressor): (&str, Box<dyn Decompressor>) = if let Some(stem) = file_name.strip_suffix(".whl") {
            (stem, Box::new(decompressors::zip::Zip::default()))
        } else if let Some(stem) = file_name.strip_suffix(".tar.gz") {
            (stem, Box::new(decompressors::targz::Targz::default()))
        } else {
            continue;
        };

        let destination = working_dir.join(stem);
        fs::create_dir_all(&destination).context("failed to create extraction folder")?;

        log::info!("[pkgscan.analysis] unpacking {}", file_name);
        decompressor
            .decompress(archive.as_std_path(), destination.as_std_path(), &extraction_opts)
            .with_context(|| format!("cannot unpack {}", file_name))?;
    }

    Ok(())
}
