// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::core::models::PackageInfo;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

pub static SOURCE_HOST_MARKER: &str = "github";

// Current repository page first, legacy markup second
static STAR_COUNTER_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["#repo-stars-counter-star", "a.social-count.js-social-count"]
        .iter()
        .map(|css| Selector::parse(css).expect("star counter selector must be valid"))
        .collect()
});

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceHostReference(Option<String>);

impl SourceHostReference {
    #[cfg(test)]
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn new(url: &str) -> Self {
        Self(Some(url.to_string()))
    }

    pub fn url(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Last two path segments of the reference, as `owner/repo`
    pub fn repository_slug(&self) -> Option<String> {
        let url = self.url()?.trim_end_matches('/');
        let segments = url.rsplit('/').take(2).collect::<Vec<_>>();

        match segments.as_slice() {
            [repo, owner] if !repo.is_empty() && !owner.is_empty() => {
                Some(format!("{}/{}", owner, repo.trim_end_matches(".git")))
            },
            _ => None,
        }
    }
}

/// Scans the home page, then every project url in declaration order, for the
/// first field mentioning the source host. This is a plain substring test.
pub fn resolve(info: &PackageInfo) -> SourceHostReference {
    let project_urls = info.project_urls.iter().flat_map(|urls| urls.values());

    info.home_page
        .iter()
        .chain(project_urls)
        .find(|field| field.contains(SOURCE_HOST_MARKER))
        .map(|field| SourceHostReference::new(field))
        .unwrap_or_default()
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RepositoryMetadata {
    pub full_name: Option<String>,
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScrapedPage {
    pub html: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataOrigin {
    Api,
    Scrape,
}

impl Display for DataOrigin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DataOrigin::Api => f.write_str("api"),
            DataOrigin::Scrape => f.write_str("scrape"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SourceHostData {
    NotFound,
    Api(RepositoryMetadata),
    Scrape(ScrapedPage),
    Unavailable { rate_limited: bool },
}

impl SourceHostData {
    pub fn origin(&self) -> Option<DataOrigin> {
        match self {
            SourceHostData::Api(_) => Some(DataOrigin::Api),
            SourceHostData::Scrape(_) => Some(DataOrigin::Scrape),
            SourceHostData::NotFound | SourceHostData::Unavailable { .. } => None,
        }
    }

    pub fn star_count(&self) -> StarCount {
        match self {
            SourceHostData::NotFound => StarCount::NoHostFound,
            SourceHostData::Api(metadata) => StarCount::Counted(metadata.stargazers_count),
            SourceHostData::Scrape(page) => scraped_star_count(&page.html),
            SourceHostData::Unavailable { rate_limited: true } => StarCount::RateLimited,
            SourceHostData::Unavailable { rate_limited: false } => StarCount::Error,
        }
    }
}

fn scraped_star_count(html: &str) -> StarCount {
    let document = Html::parse_document(html);

    STAR_COUNTER_SELECTORS
        .iter()
        .find_map(|selector| document.select(selector).next())
        .map(|element| {
            let exact = element.value().attr("title").map(str::to_string);
            exact.unwrap_or_else(|| element.text().collect::<String>())
        })
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .map(StarCount::Displayed)
        .unwrap_or(StarCount::Error)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StarCount {
    Counted(u64),
    Displayed(String),
    NoHostFound,
    RateLimited,
    Error,
}

impl Display for StarCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StarCount::Counted(stars) => f.write_fmt(format_args!("{}", stars)),
            StarCount::Displayed(stars) => f.write_str(stars),
            StarCount::NoHostFound => f.write_str("No github found"),
            StarCount::RateLimited => f.write_str("Rate limiting"),
            StarCount::Error => f.write_str("Error"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SourceHostSummary {
    pub reference: SourceHostReference,
    pub origin: Option<DataOrigin>,
    pub stars: StarCount,
    pub forks: Option<u64>,
    pub open_issues: Option<u64>,
}

impl SourceHostSummary {
    pub fn new(reference: SourceHostReference, data: &SourceHostData) -> Self {
        let (forks, open_issues) = match data {
            SourceHostData::Api(metadata) => (Some(metadata.forks_count), Some(metadata.open_issues_count)),
            _ => (None, None),
        };

        Self {
            reference,
            origin: data.origin(),
            stars: data.star_count(),
            forks,
            open_issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::models::PackageInfo;
    use crate::core::sourcehost::{
        RepositoryMetadata, ScrapedPage, SourceHostData, SourceHostReference, StarCount, resolve,
    };
    use assertor::{BooleanAssertion, EqualityAssertion, OptionAssertion};
    use indexmap::IndexMap;

    fn package_info(home_page: Option<&str>, project_urls: &[(&str, &str)]) -> PackageInfo {
        let urls = project_urls
            .iter()
            .map(|(label, url)| (label.to_string(), url.to_string()))
            .collect::<IndexMap<_, _>>();

        PackageInfo {
            name: "pcap2map".to_string(),
            home_page: home_page.map(str::to_string),
            project_urls: Some(urls),
            ..Default::default()
        }
    }

    #[test]
    fn should_resolve_nothing_without_marker() {
        let info = package_info(
            Some("https://urllib3.readthedocs.io/"),
            &[("Documentation", "https://docs.example.org")],
        );

        assertor::assert_that!(resolve(&info).is_empty()).is_true()
    }

    #[test]
    fn should_resolve_nothing_without_any_fields() {
        let info = PackageInfo::default();
        assertor::assert_that!(resolve(&info)).is_equal_to(SourceHostReference::empty())
    }

    #[test]
    fn should_prefer_home_page_over_project_urls() {
        let info = package_info(
            Some("https://github.com/jspeed-meyers/pcap2map"),
            &[("Source", "https://github.com/someone/else")],
        );

        let reference = resolve(&info);

        assertor::assert_that!(reference.url()).is_equal_to(Some("https://github.com/jspeed-meyers/pcap2map"))
    }

    #[test]
    fn should_take_first_matching_project_url_in_declared_order() {
        let info = package_info(
            Some("https://requests.readthedocs.io"),
            &[
                ("Documentation", "https://requests.readthedocs.io"),
                ("Source", "https://github.com/psf/requests"),
                ("Issues", "https://github.com/psf/requests/issues"),
            ],
        );

        let reference = resolve(&info);

        assertor::assert_that!(reference.url()).is_equal_to(Some("https://github.com/psf/requests"))
    }

    #[test]
    fn should_accept_marker_anywhere_in_field() {
        let info = package_info(Some("https://mygithubmirror.example.org/project"), &[]);

        let reference = resolve(&info);

        assertor::assert_that!(reference.url()).is_equal_to(Some("https://mygithubmirror.example.org/project"))
    }

    #[test]
    fn should_extract_repository_slug() {
        let reference = SourceHostReference::new("https://github.com/psf/requests/");
        assertor::assert_that!(reference.repository_slug()).is_equal_to(Some("psf/requests".to_string()))
    }

    #[test]
    fn should_not_extract_slug_from_empty_reference() {
        assertor::assert_that!(SourceHostReference::empty().repository_slug()).is_none()
    }

    #[test]
    fn should_read_stars_from_api_data() {
        let data = SourceHostData::Api(RepositoryMetadata {
            full_name: Some("psf/requests".to_string()),
            stargazers_count: 0,
            forks_count: 10,
            open_issues_count: 2,
        });

        assertor::assert_that!(data.star_count()).is_equal_to(StarCount::Counted(0))
    }

    #[test]
    fn should_distinguish_missing_host_from_zero_stars() {
        let stars = SourceHostData::NotFound.star_count();

        assertor::assert_that!(stars.clone()).is_equal_to(StarCount::NoHostFound);
        assertor::assert_that!(stars.to_string()).is_equal_to("No github found".to_string())
    }

    #[test]
    fn should_read_stars_from_scraped_page() {
        let html = r#"
            <html><body>
              <span id="repo-stars-counter-star" title="51,234" class="Counter js-social-count">51.2k</span>
            </body></html>
        "#;

        let data = SourceHostData::Scrape(ScrapedPage { html: html.to_string() });

        assertor::assert_that!(data.star_count()).is_equal_to(StarCount::Displayed("51,234".to_string()))
    }

    #[test]
    fn should_read_stars_from_legacy_scraped_page() {
        let html = r#"
            <html><body>
              <a class="social-count js-social-count" href="/psf/requests/stargazers">
                 48.1k
              </a>
            </body></html>
        "#;

        let data = SourceHostData::Scrape(ScrapedPage { html: html.to_string() });

        assertor::assert_that!(data.star_count()).is_equal_to(StarCount::Displayed("48.1k".to_string()))
    }

    #[test]
    fn should_report_error_when_scraped_page_has_no_counter() {
        let data = SourceHostData::Scrape(ScrapedPage {
            html: "<html><body><p>Too many requests</p></body></html>".to_string(),
        });

        assertor::assert_that!(data.star_count()).is_equal_to(StarCount::Error)
    }

    #[test]
    fn should_surface_rate_limiting_when_no_fallback_worked() {
        let data = SourceHostData::Unavailable { rate_limited: true };
        assertor::assert_that!(data.star_count().to_string()).is_equal_to("Rate limiting".to_string())
    }
}
