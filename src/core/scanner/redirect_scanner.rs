// src/core/scanner/redirect_scanner.rs

use std::time::Duration;

use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::core::models::RedirectState;
use crate::error::Result;

const REDIRECT_STATUSES: [StatusCode; 5] = [
    StatusCode::MOVED_PERMANENTLY,
    StatusCode::FOUND,
    StatusCode::SEE_OTHER,
    StatusCode::TEMPORARY_REDIRECT,
    StatusCode::PERMANENT_REDIRECT,
];

/// Whether `status` plus `location` send a plain-HTTP visitor to HTTPS.
pub fn is_https_redirect(status: StatusCode, location: Option<&str>) -> bool {
    REDIRECT_STATUSES.contains(&status) && location.is_some_and(|l| l.starts_with("https://"))
}

/// Requests `http://<domain>` once, without following redirects.
/// Informational only: nothing here feeds the grade.
pub async fn run_redirect_scan(domain: &str, timeout: Duration, user_agent: &str) -> RedirectState {
    let url = format!("http://{domain}");
    info!(url = %url, "Checking for HTTP to HTTPS redirect.");

    match fetch_redirect(&url, timeout, user_agent).await {
        Ok(state) => {
            info!(redirects = state.http_redirect_to_https, "Redirect check finished.");
            state
        }
        Err(e) => {
            warn!(url = %url, error = %e, "Redirect check failed.");
            RedirectState { redirect_error: Some(e.to_string()), ..Default::default() }
        }
    }
}

async fn fetch_redirect(url: &str, timeout: Duration, user_agent: &str) -> Result<RedirectState> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .redirect(Policy::none())
        .build()?;
    let response = client.get(url).send().await?;
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    debug!(status = %response.status(), location = ?location, "Received redirect probe response.");

    let http_redirect_to_https = is_https_redirect(response.status(), location.as_deref());
    Ok(RedirectState {
        http_redirect_to_https,
        redirect_location: location.filter(|_| http_redirect_to_https),
        redirect_error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_redirects_to_https_count() {
        assert!(is_https_redirect(StatusCode::MOVED_PERMANENTLY, Some("https://example.com/")));
        assert!(is_https_redirect(StatusCode::PERMANENT_REDIRECT, Some("https://example.com/")));
        assert!(!is_https_redirect(StatusCode::FOUND, Some("http://example.com/")));
        assert!(!is_https_redirect(StatusCode::OK, Some("https://example.com/")));
        assert!(!is_https_redirect(StatusCode::MOVED_PERMANENTLY, None));
    }

    #[tokio::test]
    async fn unreachable_host_records_error() {
        let port = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let state = run_redirect_scan(&format!("127.0.0.1:{port}"), Duration::from_secs(2), "test").await;
        assert!(!state.http_redirect_to_https);
        assert!(state.redirect_location.is_none());
        assert!(state.redirect_error.is_some());
    }
}
