// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("maintainer page selectors must be valid")
}

static MAINTAINER_USERNAME: LazyLock<Selector> = LazyLock::new(|| selector("span.sidebar-section__user-gravatar-text"));
static AUTHOR_METADATA: LazyLock<Selector> = LazyLock::new(|| selector("div.author-profile__metadiv"));
static TIME: LazyLock<Selector> = LazyLock::new(|| selector("time"));
static PACKAGE_COUNT_SECTION: LazyLock<Selector> = LazyLock::new(|| selector("div.left-layout__main"));
static HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h2"));

/// Raw registry profile page for one maintainer
#[derive(Clone, Debug, PartialEq)]
pub struct ProfilePage {
    pub username: String,
    pub html: String,
}

impl ProfilePage {
    pub fn new(username: &str, html: &str) -> Self {
        Self {
            username: username.to_string(),
            html: html.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaintainerProfile {
    pub username: String,
    pub account_created: Option<String>,
    pub packages_maintained: Option<String>,
}

impl MaintainerProfile {
    pub fn packages_maintained_count(&self) -> Option<u32> {
        self.packages_maintained
            .as_ref()
            .and_then(|count| count.replace(',', "").parse::<u32>().ok())
    }
}

impl From<&ProfilePage> for MaintainerProfile {
    fn from(page: &ProfilePage) -> Self {
        let document = Html::parse_document(&page.html);

        Self {
            username: page.username.clone(),
            account_created: account_creation_dates(&document).into_iter().next(),
            packages_maintained: package_counts(&document).into_iter().next(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaintainersSummary {
    pub usernames: Vec<String>,
    pub account_creation_dates: Vec<String>,
    pub packages_maintained: Vec<String>,
    pub profiles: Vec<MaintainerProfile>,
}

impl MaintainersSummary {
    pub fn new(usernames: Vec<String>, profiles: &[ProfilePage]) -> Self {
        Self {
            usernames,
            account_creation_dates: creation_dates(profiles),
            packages_maintained: maintained_package_counts(profiles),
            profiles: profiles.iter().map(MaintainerProfile::from).collect(),
        }
    }
}

/// Deduplicated, alphabetically sorted maintainer usernames listed on a package page
pub fn maintainer_usernames(package_page: &str) -> Vec<String> {
    let document = Html::parse_document(package_page);

    document
        .select(&MAINTAINER_USERNAME)
        .map(trimmed_text)
        .filter(|username| !username.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Every account creation date found across profiles, in profile order.
///
/// A profile may contribute zero or several dates.
pub fn creation_dates(profiles: &[ProfilePage]) -> Vec<String> {
    profiles
        .iter()
        .flat_map(|profile| account_creation_dates(&Html::parse_document(&profile.html)))
        .collect()
}

/// Leading count token of every package-count heading found across profiles,
/// kept as text the way the registry renders it
pub fn maintained_package_counts(profiles: &[ProfilePage]) -> Vec<String> {
    profiles
        .iter()
        .flat_map(|profile| package_counts(&Html::parse_document(&profile.html)))
        .collect()
}

fn account_creation_dates(document: &Html) -> Vec<String> {
    document
        .select(&AUTHOR_METADATA)
        .filter_map(|section| section.select(&TIME).next())
        .map(trimmed_text)
        .filter(|date| !date.is_empty())
        .collect()
}

fn package_counts(document: &Html) -> Vec<String> {
    document
        .select(&PACKAGE_COUNT_SECTION)
        .filter_map(|section| section.select(&HEADING).next())
        .filter_map(|heading| trimmed_text(heading).split_whitespace().next().map(str::to_string))
        .collect()
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
