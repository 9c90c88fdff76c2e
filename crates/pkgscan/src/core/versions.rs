// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::core::errors::PkgScanError;
use regex::{Captures, Regex};
use std::cmp::Ordering;
use std::sync::LazyLock;

// Public version identifiers as accepted by PyPI, including the lenient
// spellings it normalizes ("2.0-beta.1", "1.4-2", "v1.0.RC1")
static PYTHON_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        ^\s*v?
        (?:(?P<epoch>\d+)!)?
        (?P<release>\d+(?:\.\d+)*)
        (?:[-_.]?(?P<pre_l>alpha|a|beta|b|preview|pre|c|rc)[-_.]?(?P<pre_n>\d+)?)?
        (?:-(?P<post_implicit>\d+)|[-_.]?(?P<post_l>post|rev|r)[-_.]?(?P<post_n>\d+)?)?
        (?:[-_.]?(?P<dev_l>dev)[-_.]?(?P<dev_n>\d+)?)?
        (?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?
        \s*$",
    )
    .expect("version pattern must compile")
});

/// Where a version sits relative to its final release
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    DevelopmentOnly,
    Alpha(u64),
    Beta(u64),
    Candidate(u64),
    Final,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LocalSegment {
    Text(String),
    Number(u64),
}

#[derive(Clone, Debug)]
pub struct PythonVersion {
    pub epoch: u64,
    pub release: Vec<u64>,
    pub phase: Phase,
    pub post: Option<u64>,
    pub dev: Option<u64>,
    pub local: Option<Vec<LocalSegment>>,
}

impl PythonVersion {
    fn significant_release(&self) -> &[u64] {
        let length = self.release.iter().rposition(|number| *number != 0).map_or(0, |index| index + 1);
        &self.release[..length]
    }

    fn development_rank(&self) -> (bool, u64) {
        (self.dev.is_none(), self.dev.unwrap_or_default())
    }
}

impl Ord for PythonVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.significant_release().cmp(other.significant_release()))
            .then_with(|| self.phase.cmp(&other.phase))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| self.development_rank().cmp(&other.development_rank()))
            .then_with(|| self.local.cmp(&other.local))
    }
}

impl PartialOrd for PythonVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PythonVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PythonVersion {}

fn number(captures: &Captures<'_>, group: &str) -> Result<Option<u64>, std::num::ParseIntError> {
    captures.name(group).map(|found| found.as_str().parse::<u64>()).transpose()
}

/// Parses a version identifier the way PyPI orders them: epoch, release
/// numbers, pre-release, post-release, development release and local label
pub fn parse_version(raw: &str) -> Result<PythonVersion, PkgScanError> {
    let invalid = || PkgScanError::InvalidVersion(raw.to_string());
    let captures = PYTHON_VERSION.captures(raw).ok_or_else(invalid)?;

    let epoch = number(&captures, "epoch").map_err(|_| invalid())?.unwrap_or_default();

    let release = captures["release"]
        .split('.')
        .map(str::parse::<u64>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;

    let pre_number = number(&captures, "pre_n").map_err(|_| invalid())?.unwrap_or_default();
    let pre = captures.name("pre_l").map(|label| match label.as_str().to_lowercase().as_str() {
        "a" | "alpha" => Phase::Alpha(pre_number),
        "b" | "beta" => Phase::Beta(pre_number),
        _ => Phase::Candidate(pre_number),
    });

    let post = match number(&captures, "post_implicit").map_err(|_| invalid())? {
        Some(implicit) => Some(implicit),
        None if captures.name("post_l").is_some() => {
            Some(number(&captures, "post_n").map_err(|_| invalid())?.unwrap_or_default())
        },
        None => None,
    };

    let dev = match captures.name("dev_l") {
        Some(_) => Some(number(&captures, "dev_n").map_err(|_| invalid())?.unwrap_or_default()),
        None => None,
    };

    let phase = match pre {
        Some(phase) => phase,
        None if post.is_none() && dev.is_some() => Phase::DevelopmentOnly,
        None => Phase::Final,
    };

    let local = captures.name("local").map(|label| {
        label
            .as_str()
            .split(['-', '_', '.'])
            .map(|segment| match segment.parse::<u64>() {
                Ok(value) => LocalSegment::Number(value),
                Err(_) => LocalSegment::Text(segment.to_lowercase()),
            })
            .collect::<Vec<_>>()
    });

    Ok(PythonVersion {
        epoch,
        release,
        phase,
        post,
        dev,
        local,
    })
}

/// Sorts version identifiers ascending by PyPI precedence.
///
/// Fails on the first identifier that cannot be parsed; identifiers that
/// compare equal keep their relative input order.
pub fn sort_versions<I, S>(versions: I) -> Result<Vec<String>, PkgScanError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = versions
        .into_iter()
        .map(|raw| parse_version(raw.as_ref()).map(|version| (version, raw.as_ref().to_string())))
        .collect::<Result<Vec<_>, _>>()?;

    parsed.sort_by(|(left, _), (right, _)| left.cmp(right));
    Ok(parsed.into_iter().map(|(_, raw)| raw).collect())
}


#[cfg(test)]
mod proptests {
    use crate::core::versions::{parse_version, sort_versions};
    use proptest::prelude::*;

    const PYTHON_VERSIONS: &str = r"[0-9]{1,3}(\.[0-9]{1,3}){0,3}((a|b|rc)[0-9]{1,2})?(\.post[0-9]{1,2})?(\.dev[0-9]{1,2})?";

    proptest! {
        #[test]
        fn sorting_returns_an_ordered_permutation(
            versions in prop::collection::vec(PYTHON_VERSIONS, 0..12)
        ) {
            let sorted = sort_versions(&versions).unwrap();

            let mut expected_items = versions.clone();
            expected_items.sort();
            let mut sorted_items = sorted.clone();
            sorted_items.sort();
            prop_assert_eq!(sorted_items, expected_items);

            for pair in sorted.windows(2) {
                prop_assert!(parse_version(&pair[0]).unwrap() <= parse_version(&pair[1]).unwrap());
            }
        }

        #[test]
        fn comparison_is_reflexive(version in PYTHON_VERSIONS) {
            let parsed = parse_version(&version).unwrap();
            prop_assert_eq!(parsed.clone(), parsed);
        }
    }
}
