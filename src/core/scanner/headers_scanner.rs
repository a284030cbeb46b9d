// src/core/scanner/headers_scanner.rs

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, STRICT_TRANSPORT_SECURITY};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::core::models::{HeaderState, SecurityHeader};
use crate::error::Result;

static RE_HSTS_MAX_AGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)^max-age\s*=\s*"?(\d+)"?$"#).unwrap());

/// Parsed `Strict-Transport-Security` directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HstsPolicy {
    pub max_age: u64,
    pub include_subdomains: bool,
}

/// Reads `max-age` (0 when absent or unparseable) and the `includeSubDomains` flag.
pub fn parse_hsts(value: &str) -> HstsPolicy {
    let mut policy = HstsPolicy::default();
    for directive in value.split(';').map(str::trim) {
        if let Some(captures) = RE_HSTS_MAX_AGE.captures(directive) {
            policy.max_age = captures[1].parse().unwrap_or(0);
        } else if directive.eq_ignore_ascii_case("includeSubDomains") {
            policy.include_subdomains = true;
        }
    }
    policy
}

/// Checks the response headers against the fixed catalog. Header names
/// in a `HeaderMap` are already case-insensitive.
pub fn inspect_headers(headers: &HeaderMap) -> HeaderState {
    let present: Vec<SecurityHeader> = SecurityHeader::iter()
        .filter(|header| {
            let found = headers.contains_key(header.name());
            debug!(header_name = header.name(), found, "Checked header.");
            found
        })
        .collect();

    let mut state = HeaderState::from_present(&present);
    if let Some(value) = headers.get(STRICT_TRANSPORT_SECURITY) {
        state.hsts_enabled = true;
        match value.to_str() {
            Ok(value) => {
                let policy = parse_hsts(value);
                state.hsts_max_age = policy.max_age;
                state.hsts_include_subdomains = policy.include_subdomains;
            }
            Err(_) => warn!("HSTS header contained invalid UTF-8."),
        }
    }
    state
}

/// Issues one HEAD request to `url` and grades its security headers.
/// Any failure counts as every header missing.
pub async fn run_headers_scan(url: &str, timeout: Duration, user_agent: &str) -> HeaderState {
    info!(url, "Starting headers scan.");

    let state = match fetch_headers(url, timeout, user_agent).await {
        Ok(headers) => inspect_headers(&headers),
        Err(e) => {
            warn!(url, error = %e, "Headers request failed, treating all headers as missing.");
            HeaderState::all_missing(Some(e.to_string()))
        }
    };

    info!(present = state.present_count(), score = state.headers_score, "Headers scan finished.");
    state
}

async fn fetch_headers(url: &str, timeout: Duration, user_agent: &str) -> Result<HeaderMap> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?;
    let response = client.head(url).send().await?;
    debug!(status = %response.status(), "Received HTTP response for headers scan.");
    Ok(response.headers().clone())
}
