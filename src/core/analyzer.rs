// src/core/analyzer.rs

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use crate::config::ProbeSettings;
use crate::core::models::{AnalysisReport, ProbeResult};
use crate::core::scanner::{self, ProbeTarget};
use crate::core::store::{InMemoryReportStore, ReportStore};
use crate::core::{grading, impact, knowledge_base};
use crate::error::{Error, Result};

/// Turns a URL into a stored report card.
///
/// Each call is independent: probes share no state across requests, and
/// dropping the returned future closes every socket it had open.
pub struct Analyzer {
    settings: ProbeSettings,
    store: Arc<dyn ReportStore>,
}

impl Analyzer {
    pub fn new(settings: ProbeSettings, store: Arc<dyn ReportStore>) -> Self {
        Self { settings, store }
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// Validates `url`, probes its host and stores the resulting report.
    ///
    /// Fails only on invalid input; probe failures degrade the grade instead.
    pub async fn analyze(&self, url: &str) -> Result<AnalysisReport> {
        let target = validate_url(url)?;
        info!(url, domain = %target.domain, "Starting analysis.");

        let result = scanner::run_full_scan(&target, &self.settings).await;
        let report = build_report(url, result);
        self.store.save(&report);

        info!(
            id = %report.id,
            grade = %report.ssl_grade,
            score = report.security_score,
            issues = report.issues.len(),
            "Analysis completed."
        );
        Ok(report)
    }

    /// A previously produced report, if this analyzer's store has it.
    pub fn report(&self, id: &str) -> Option<AnalysisReport> {
        self.store.load(id)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(ProbeSettings::default(), Arc::new(InMemoryReportStore::new()))
    }
}

/// Accepts absolute `http`/`https` URLs with a host.
pub fn validate_url(url: &str) -> Result<ProbeTarget> {
    let parsed = Url::parse(url.trim()).map_err(|e| {
        warn!(url, error = %e, "Rejected malformed URL.");
        Error::InvalidUrl(format!("{url}: {e}"))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(format!("{url}: unsupported scheme '{}'", parsed.scheme())));
    }
    ProbeTarget::from_url(&parsed).ok_or_else(|| Error::InvalidUrl(format!("{url}: missing host")))
}

/// Derives every report section from one probe snapshot.
pub fn build_report(url: &str, result: ProbeResult) -> AnalysisReport {
    let ssl_grade = result.ssl_grade;
    AnalysisReport {
        id: Uuid::new_v4().to_string(),
        url: url.to_string(),
        ssl_grade,
        security_score: grading::score(&result),
        issues: knowledge_base::extract_issues(&result),
        business_impact: impact::estimate(ssl_grade),
        recommendations: knowledge_base::recommendations(&result, ssl_grade),
        created_at: Utc::now(),
        ssl_result: result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_input() {
        for url in ["", "not a url", "example.com", "ftp://example.com/", "mailto:a@example.com"] {
            assert!(matches!(validate_url(url), Err(Error::InvalidUrl(_))), "{url:?}");
        }
    }

    #[test]
    fn accepts_http_and_https() {
        assert_eq!(validate_url("https://example.com").unwrap().domain, "example.com");
        assert_eq!(validate_url(" http://127.0.0.1:8080/x ").unwrap().domain, "127.0.0.1");
    }

    #[tokio::test]
    async fn invalid_url_never_probes_or_stores() {
        let store = Arc::new(InMemoryReportStore::new());
        let analyzer = Analyzer::new(ProbeSettings::default(), store.clone());
        assert!(analyzer.analyze("nope").await.is_err());
        assert!(store.is_empty());
    }
}
