// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use crate::core::maintainers::MaintainersSummary;
use crate::core::models::{
    DownloadStats, PackageReport, PythonPackage, RegistrySummary, ReleaseSummary, SecurityFindings,
    StaticAnalysisResult,
};
use crate::core::sourcehost::{SourceHostSummary, StarCount};
use comfy_table::Table;
use console::{StyledObject, style};
use std::fmt::Display;

static NOT_DECLARED: &str = "Not declared";
static NO_RELEASES_FOUND: &str = "No releases found";
static NO_ARTIFACTS: &str = "No artifacts";
static NONE_FOUND: &str = "None found";
static ERROR: &str = "Error";

#[derive(Default)]
pub struct ConsoleReporter {
    use_colors: bool,
}

impl ConsoleReporter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    pub fn report_scan_started(&self, package: &PythonPackage, verbose: bool) {
        println!();
        println!("Inspecting {} ...", self.cyan(package));

        if verbose {
            println!("Static analysis requested. This operation may take some time ...");
        }
    }

    pub fn report_package(&self, report: &PackageReport) {
        println!("{}", self.render(report));
    }

    pub fn render(&self, report: &PackageReport) -> String {
        let mut lines = vec![String::new(), format!("Trust profile for {}", self.cyan(&report.package))];

        self.render_registry(&mut lines, &report.registry);
        self.render_releases(&mut lines, &report.releases);
        self.render_source_host(&mut lines, &report.source_host);
        self.render_maintainers(&mut lines, report.maintainers.as_ref());
        self.render_downloads(&mut lines, report.downloads.as_ref());
        self.render_static_analysis(&mut lines, report.static_analysis.as_ref());

        lines.join("\n")
    }

    fn render_registry(&self, lines: &mut Vec<String>, registry: &RegistrySummary) {
        let declared = |field: &Option<String>| field.clone().unwrap_or_else(|| NOT_DECLARED.to_string());

        lines.push(String::new());
        lines.push("Registry metadata : ".to_string());
        lines.push(String::new());
        lines.push(format!("• name : {}", self.cyan(&registry.name)));
        lines.push(format!("• version : {}", self.cyan(declared(&registry.version))));
        lines.push(format!("• author : {}", self.cyan(declared(&registry.author))));
        lines.push(format!("• author email : {}", self.cyan(declared(&registry.author_email))));
        lines.push(format!("• home page : {}", self.cyan(declared(&registry.home_page))));
        lines.push(format!("• license : {}", self.cyan(declared(&registry.license))));
        lines.push(format!("• summary : {}", self.cyan(declared(&registry.summary))));
    }

    fn render_releases(&self, lines: &mut Vec<String>, releases: &ReleaseSummary) {
        let first_release = releases.first_release_date.as_deref().unwrap_or(NO_RELEASES_FOUND);

        let last_release = match (&releases.last_release_date, releases.version_count) {
            (Some(date), _) => date.as_str(),
            (None, 0) => NO_RELEASES_FOUND,
            (None, _) => NO_ARTIFACTS,
        };

        let latest_version = releases.latest_version.as_deref().unwrap_or(NO_RELEASES_FOUND);
        let signed = if releases.latest_signed { "yes" } else { "no" };

        lines.push(String::new());
        lines.push("Release history : ".to_string());
        lines.push(String::new());
        lines.push(format!("• first release : {}", self.cyan(first_release)));
        lines.push(format!("• last release : {}", self.cyan(last_release)));
        lines.push(format!("• latest version : {}", self.cyan(latest_version)));
        lines.push(format!("• versions published : {}", self.cyan(releases.version_count)));
        lines.push(format!("• latest release signed : {}", self.cyan(signed)));
        lines.push(format!(
            "• releases in the past year : {}",
            self.cyan(releases.releases_past_year)
        ));
    }

    fn render_source_host(&self, lines: &mut Vec<String>, source_host: &SourceHostSummary) {
        let repository = source_host
            .reference
            .url()
            .map(str::to_string)
            .unwrap_or_else(|| StarCount::NoHostFound.to_string());

        let origin = source_host
            .origin
            .map(|origin| origin.to_string())
            .unwrap_or_else(|| source_host.stars.to_string());

        let counter = |value: Option<u64>| match (value, &source_host.stars) {
            (Some(count), _) => count.to_string(),
            (None, StarCount::Counted(_) | StarCount::Displayed(_)) => NOT_DECLARED.to_string(),
            (None, sentinel) => sentinel.to_string(),
        };

        lines.push(String::new());
        lines.push("Source host : ".to_string());
        lines.push(String::new());
        lines.push(format!("• repository : {}", self.cyan(repository)));
        lines.push(format!("• retrieved via : {}", self.cyan(origin)));
        lines.push(format!("• stars : {}", self.stars(&source_host.stars)));
        lines.push(format!("• forks : {}", self.cyan(counter(source_host.forks))));
        lines.push(format!("• open issues : {}", self.cyan(counter(source_host.open_issues))));
    }

    fn render_maintainers(&self, lines: &mut Vec<String>, maintainers: Option<&MaintainersSummary>) {
        lines.push(String::new());
        lines.push("Maintainers : ".to_string());
        lines.push(String::new());

        let Some(maintainers) = maintainers else {
            lines.push(format!("• usernames : {}", self.red(ERROR)));
            lines.push(format!("• account creation dates : {}", self.red(ERROR)));
            lines.push(format!("• packages maintained : {}", self.red(ERROR)));
            return;
        };

        lines.push(format!("• usernames : {}", self.cyan(listing(&maintainers.usernames))));
        lines.push(format!(
            "• account creation dates : {}",
            self.cyan(listing(&maintainers.account_creation_dates))
        ));
        lines.push(format!(
            "• packages maintained : {}",
            self.cyan(listing(&maintainers.packages_maintained))
        ));

        if maintainers.profiles.is_empty() {
            return;
        }

        let mut table = Table::new();
        table.set_header(vec!["Maintainer", "Account created", "Packages maintained"]);

        maintainers.profiles.iter().for_each(|profile| {
            let packages_maintained = profile
                .packages_maintained_count()
                .map(|count| count.to_string())
                .or_else(|| profile.packages_maintained.clone())
                .unwrap_or_else(|| NONE_FOUND.to_string());

            table.add_row(vec![
                profile.username.clone(),
                profile.account_created.clone().unwrap_or_else(|| NONE_FOUND.to_string()),
                packages_maintained,
            ]);
        });

        lines.push(String::new());
        lines.push(table.to_string());
    }

    fn render_downloads(&self, lines: &mut Vec<String>, downloads: Option<&DownloadStats>) {
        let counter = |pick: fn(&DownloadStats) -> u64| match downloads {
            Some(stats) => self.cyan(pick(stats).to_string()),
            None => self.red(ERROR.to_string()),
        };

        lines.push(String::new());
        lines.push("Downloads : ".to_string());
        lines.push(String::new());
        lines.push(format!("• last day : {}", counter(|stats| stats.last_day)));
        lines.push(format!("• last week : {}", counter(|stats| stats.last_week)));
        lines.push(format!("• last month : {}", counter(|stats| stats.last_month)));
    }

    fn render_static_analysis(&self, lines: &mut Vec<String>, analysis: Option<&StaticAnalysisResult>) {
        lines.push(String::new());
        lines.push("Static analysis : ".to_string());
        lines.push(String::new());

        let Some(analysis) = analysis else {
            lines.push(format!("• {}", self.cyan("skipped (run with --verbose to enable)")));
            lines.push(String::new());
            return;
        };

        let security_issues = match &analysis.security {
            SecurityFindings::Counted(counts) => format!(
                "{} (low {}, medium {}, high {})",
                counts.all, counts.low, counts.medium, counts.high
            ),
            SecurityFindings::Error => ERROR.to_string(),
        };

        lines.push(format!("• security issues : {}", self.cyan(security_issues)));
        lines.push(format!("• lint score : {}", self.cyan(&analysis.lint)));
        lines.push(String::new());
    }

    fn stars(&self, stars: &StarCount) -> StyledObject<String> {
        match stars {
            StarCount::Counted(_) | StarCount::Displayed(_) | StarCount::NoHostFound => self.cyan(stars.to_string()),
            StarCount::RateLimited | StarCount::Error => self.red(stars.to_string()),
        }
    }

    fn cyan<T>(&self, what: T) -> StyledObject<T> {
        match self.use_colors {
            true => style(what).cyan(),
            false => style(what),
        }
    }

    fn red<T>(&self, what: T) -> StyledObject<T> {
        match self.use_colors {
            true => style(what).red(),
            false => style(what),
        }
    }
}

fn listing<T: Display>(values: &[T]) -> String {
    if values.is_empty() {
        return NONE_FOUND.to_string();
    }

    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use crate::core::maintainers::{MaintainersSummary, ProfilePage};
    use crate::core::models::{
        DownloadStats, LintScore, PackageReport, PythonPackage, RegistrySummary, ReleaseSummary, SecurityFindings,
        SeverityCounts, StaticAnalysisResult,
    };
    use crate::core::sourcehost::{RepositoryMetadata, SourceHostData, SourceHostReference, SourceHostSummary};
    use crate::infra::reporting::console::ConsoleReporter;
    use assertor::{BooleanAssertion, StringAssertion};

    fn registry() -> RegistrySummary {
        RegistrySummary {
            name: "pcap2map".to_string(),
            version: Some("0.0.1".to_string()),
            author: Some("John Speed Meyers".to_string()),
            author_email: None,
            home_page: None,
            license: Some("Apache-2.0".to_string()),
            summary: None,
        }
    }

    fn releases(last_release_date: Option<&str>) -> ReleaseSummary {
        ReleaseSummary {
            first_release_date: Some("2020-04-10".to_string()),
            last_release_date: last_release_date.map(str::to_string),
            latest_version: Some("0.0.2".to_string()),
            version_count: 2,
            latest_signed: false,
            releases_past_year: 0,
        }
    }

    fn degraded_report() -> PackageReport {
        PackageReport {
            package: PythonPackage::with("pcap2map"),
            registry: registry(),
            releases: releases(None),
            source_host: SourceHostSummary::new(SourceHostReference::empty(), &SourceHostData::NotFound),
            maintainers: None,
            downloads: None,
            static_analysis: None,
        }
    }

    fn complete_report() -> PackageReport {
        let reference = SourceHostReference::new("https://github.com/jspeed-meyers/pcap2map");
        let host_data = SourceHostData::Api(RepositoryMetadata {
            full_name: Some("jspeed-meyers/pcap2map".to_string()),
            stargazers_count: 0,
            forks_count: 1,
            open_issues_count: 0,
        });

        let profile_html = r#"
            <div class="author-profile__metadiv"><time>Nov 7, 2019</time></div>
            <div class="left-layout__main"><h2>2 projects</h2></div>
        "#;

        let profiles = vec![ProfilePage::new("jspeed-meyers", profile_html)];

        PackageReport {
            package: PythonPackage::with("pcap2map"),
            registry: registry(),
            releases: releases(Some("2020-04-11")),
            source_host: SourceHostSummary::new(reference, &host_data),
            maintainers: Some(MaintainersSummary::new(vec!["jspeed-meyers".to_string()], &profiles)),
            downloads: Some(DownloadStats {
                last_day: 3,
                last_week: 12,
                last_month: 40,
            }),
            static_analysis: Some(StaticAnalysisResult {
                security: SecurityFindings::Counted(SeverityCounts {
                    all: 3,
                    low: 1,
                    medium: 1,
                    high: 1,
                }),
                lint: LintScore::NoFilesFound,
            }),
        }
    }

    #[test]
    fn should_render_sentinels_for_degraded_sources() {
        let rendered = ConsoleReporter::new(false).render(&degraded_report());

        assertor::assert_that!(rendered).contains("Trust profile for pkg:pypi/pcap2map");
        assertor::assert_that!(rendered).contains("• repository : No github found");
        assertor::assert_that!(rendered).contains("• stars : No github found");
        assertor::assert_that!(rendered).contains("• last release : No artifacts");
        assertor::assert_that!(rendered).contains("• usernames : Error");
        assertor::assert_that!(rendered).contains("• last month : Error");
        assertor::assert_that!(rendered).contains("• author email : Not declared");
        assertor::assert_that!(rendered).contains("skipped");
    }

    #[test]
    fn should_render_zero_stars_as_a_number() {
        let rendered = ConsoleReporter::new(false).render(&complete_report());

        assertor::assert_that!(rendered).contains("• stars : 0");
        assertor::assert_that!(rendered).contains("• retrieved via : api");
        assertor::assert_that!(rendered).contains("• forks : 1");
    }

    #[test]
    fn should_render_maintainers_and_analysis() {
        let rendered = ConsoleReporter::new(false).render(&complete_report());

        assertor::assert_that!(rendered).contains("• account creation dates : Nov 7, 2019");
        assertor::assert_that!(rendered).contains("• packages maintained : 2");
        assertor::assert_that!(rendered).contains("• security issues : 3 (low 1, medium 1, high 1)");
        assertor::assert_that!(rendered).contains("• lint score : No files found");
        assertor::assert_that!(rendered).contains("Maintainer");
    }

    #[test]
    fn should_keep_report_shape_regardless_of_failures() {
        let degraded = ConsoleReporter::new(false).render(&degraded_report());
        let complete = ConsoleReporter::new(false).render(&complete_report());

        let headings = [
            "Registry metadata",
            "Release history",
            "Source host",
            "Maintainers",
            "Downloads",
            "Static analysis",
        ];

        let all_present = headings
            .iter()
            .all(|heading| degraded.contains(heading) && complete.contains(heading));

        assertor::assert_that!(all_present).is_true()
    }
}
