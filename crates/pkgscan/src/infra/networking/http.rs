// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::RetryTransientMiddleware;
use reqwest_retry::policies::ExponentialBackoff;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

pub type HTTPClient = ClientWithMiddleware;

pub static MAX_HTTP_RETRY_ATTEMPTS: u32 = 2;

pub static HTTP_TIMEOUT_SECONDS: u64 = 15;

pub static GITHUB_API_VERSION: &str = "2022-11-28";

pub static HTTP_CLIENT: LazyLock<Arc<HTTPClient>> = LazyLock::new(|| {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_str(&user_agent).expect("user agent must be a valid header"),
    );

    let base_http_client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECONDS))
        .build()
        .expect("cannot build HTTP client");

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(MAX_HTTP_RETRY_ATTEMPTS);

    let retrier_http_client = reqwest_middleware::ClientBuilder::new(base_http_client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();
    Arc::new(retrier_http_client)
});

/// Headers for GitHub REST calls, pinned to one API version and
/// authenticated when a token is available
pub fn github_api_headers(token: Option<&str>) -> anyhow::Result<header::HeaderMap> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(
        "x-github-api-version",
        header::HeaderValue::from_static(GITHUB_API_VERSION),
    );

    if let Some(token) = token {
        let mut authorization = header::HeaderValue::from_str(&format!("Bearer {}", token))?;
        authorization.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, authorization);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use crate::infra::networking::http::github_api_headers;
    use assertor::{BooleanAssertion, EqualityAssertion, OptionAssertion, ResultAssertion};
    use reqwest::header;

    #[test]
    fn should_pin_github_api_version_without_credentials() {
        let headers = github_api_headers(None).unwrap();

        assertor::assert_that!(headers.get(header::ACCEPT).map(|value| value.as_bytes().to_vec()))
            .is_equal_to(Some(b"application/vnd.github+json".to_vec()));
        assertor::assert_that!(headers.get("x-github-api-version")).is_some();
        assertor::assert_that!(headers.contains_key(header::AUTHORIZATION)).is_false()
    }

    #[test]
    fn should_mark_token_as_sensitive() {
        let headers = github_api_headers(Some("s3cr3t")).unwrap();

        let authorization = headers.get(header::AUTHORIZATION).unwrap();
        assertor::assert_that!(authorization.is_sensitive()).is_true();
        assertor::assert_that!(authorization.as_bytes().to_vec()).is_equal_to(b"Bearer s3cr3t".to_vec())
    }

    #[test]
    fn should_reject_token_that_cannot_travel_in_a_header() {
        assertor::assert_that!(github_api_headers(Some("s3cr3t\n"))).is_err()
    }
}
