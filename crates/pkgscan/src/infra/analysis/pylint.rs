// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::core::errors::PkgScanError;
use crate::core::models::LintScore;
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::sync::LazyLock;
use tokio::process::Command;
use walkdir::WalkDir;

static PYLINT_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"rated at (-?\d+(?:\.\d+)?)/10").expect("score pattern must be valid"));

pub fn parse_score(output: &str) -> Option<f64> {
    PYLINT_SCORE
        .captures(output)
        .and_then(|captures| captures.get(1))
        .and_then(|score| score.as_str().parse::<f64>().ok())
}

pub fn average_score(scores: &[f64]) -> LintScore {
    if scores.is_empty() {
        return LintScore::NoFilesFound;
    }

    let average = scores.iter().sum::<f64>() / scores.len() as f64;
    LintScore::Average((average * 100.0).round() / 100.0)
}

/// Python sources below `root`, in a stable order
pub fn python_sources(root: &Utf8Path) -> Vec<Utf8PathBuf> {
    let mut sources = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| Utf8PathBuf::try_from(entry.into_path()).ok())
        .filter(|path| path.extension() == Some("py"))
        .collect::<Vec<_>>();

    sources.sort();
    sources
}

pub async fn scan(executable: &str, target: &Utf8Path) -> LintScore {
    let mut scores = Vec::new();

    for source in python_sources(target) {
        let output = match Command::new(executable).arg(source.as_str()).output().await {
            Ok(output) => output,
            Err(incoming) => {
                let failure = PkgScanError::ToolInvocation {
                    tool: executable.to_string(),
                    reason: incoming.to_string(),
                };
                log::warn!("[pkgscan.pylint] {}", failure);
                return LintScore::Error;
            },
        };

        match parse_score(&String::from_utf8_lossy(&output.stdout)) {
            Some(score) => scores.push(score),
            None => log::info!("[pkgscan.pylint] no score for {}", source),
        }
    }

    average_score(&scores)
}

#[cfg(test)]
mod tests {
    use crate::core::models::LintScore;
    use crate::infra::analysis::pylint::{average_score, parse_score, python_sources, scan};
    use assertor::{EqualityAssertion, OptionAssertion};
    use camino::Utf8PathBuf;
    use std::fs;
    use temp_dir::TempDir;

    #[test]
    fn should_parse_score_from_summary_line() {
        let output = r#"
************* Module six
six.py:1:0: C0114: Missing module docstring (missing-module-docstring)

------------------------------------------------------------------
Your code has been rated at 7.45/10 (previous run: 7.45/10, +0.00)
"#;

        assertor::assert_that!(parse_score(output)).is_equal_to(Some(7.45))
    }

    #[test]
    fn should_parse_negative_scores() {
        let output = "Your code has been rated at -3.50/10";
        assertor::assert_that!(parse_score(output)).is_equal_to(Some(-3.5))
    }

    #[test]
    fn should_not_find_score_without_summary_line() {
        assertor::assert_that!(parse_score("No config file found")).is_none()
    }

    #[test]
    fn should_average_scores_with_two_decimals() {
        let score = average_score(&[10.0, 7.45, 3.0]);

        assertor::assert_that!(score.clone()).is_equal_to(LintScore::Average(6.82));
        assertor::assert_that!(score.to_string()).is_equal_to("6.82".to_string())
    }

    #[test]
    fn should_report_sentinel_when_nothing_was_scored() {
        let score = average_score(&[]);
        assertor::assert_that!(score.to_string()).is_equal_to("No files found".to_string())
    }

    #[test]
    fn should_find_python_sources_recursively() {
        let temp = TempDir::new().expect("Cant create temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("six-1.16.0")).unwrap();
        fs::write(root.join("six-1.16.0/six.py"), "import os").unwrap();
        fs::write(root.join("setup.py"), "import setuptools").unwrap();
        fs::write(root.join("bandit.csv"), "filename").unwrap();

        let sources = python_sources(&root);

        assertor::assert_that!(sources).is_equal_to(vec![root.join("setup.py"), root.join("six-1.16.0/six.py")])
    }

    #[tokio::test]
    async fn should_report_sentinel_without_python_sources() {
        let temp = TempDir::new().expect("Cant create temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).unwrap();

        let score = scan("definitely-not-pylint", &root).await;

        assertor::assert_that!(score).is_equal_to(LintScore::NoFilesFound)
    }

    #[tokio::test]
    async fn should_report_error_when_tool_is_missing() {
        let temp = TempDir::new().expect("Cant create temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).unwrap();
        fs::write(root.join("six.py"), "import os").unwrap();

        let score = scan("definitely-not-pylint", &root).await;

        assertor::assert_that!(score).is_equal_to(LintScore::Error)
    }
}
