// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::core::grading;

// --- Closed Classifications ---

/// Severity of a single reported issue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Classification of the target's certificate posture.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SslStatus {
    Valid,
    Expired,
    SelfSigned,
    VerifyFailed,
    Invalid,
    NoSsl,
    ConnectionError,
    NotYetValid,
}

impl SslStatus {
    /// One-line, human-readable verdict stored alongside the status.
    pub fn summary(self) -> &'static str {
        match self {
            SslStatus::Valid => "Valid SSL certificate",
            SslStatus::Expired => "SSL certificate has expired",
            SslStatus::SelfSigned => "Self-signed certificate",
            SslStatus::VerifyFailed => "Certificate verification failed",
            SslStatus::Invalid => "Invalid SSL certificate",
            SslStatus::NoSsl => "No SSL certificate at all",
            SslStatus::ConnectionError => "SSL connection error",
            SslStatus::NotYetValid => "SSL certificate is not yet valid",
        }
    }
}

/// Letter grade, declared worst to best so that `Ord` ranks them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter)]
pub enum SslGrade {
    F,
    D,
    C,
    B,
    // "A-" is accepted on input and folded into A.
    #[strum(to_string = "A", serialize = "A-")]
    #[serde(alias = "A-")]
    A,
    #[strum(to_string = "A+")]
    #[serde(rename = "A+")]
    APlus,
}

/// The fixed catalog of inspected response headers, in reporting order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum SecurityHeader {
    #[strum(to_string = "Strict-Transport-Security")]
    #[serde(rename = "Strict-Transport-Security")]
    StrictTransportSecurity,
    #[strum(to_string = "Content-Security-Policy")]
    #[serde(rename = "Content-Security-Policy")]
    ContentSecurityPolicy,
    #[strum(to_string = "X-Frame-Options")]
    #[serde(rename = "X-Frame-Options")]
    XFrameOptions,
    #[strum(to_string = "X-Content-Type-Options")]
    #[serde(rename = "X-Content-Type-Options")]
    XContentTypeOptions,
    #[strum(to_string = "X-XSS-Protection")]
    #[serde(rename = "X-XSS-Protection")]
    XXssProtection,
    #[strum(to_string = "Referrer-Policy")]
    #[serde(rename = "Referrer-Policy")]
    ReferrerPolicy,
}

impl SecurityHeader {
    pub const COUNT: usize = 6;

    pub fn name(self) -> &'static str {
        self.into()
    }
}

// --- Port Probe ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PortOutcome {
    Success,
    Error,
    Timeout,
}

/// Reachability of the HTTPS port. This is the only gate for the later probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortStatus {
    #[serde(rename = "port_443_open")]
    pub open: bool,
    #[serde(rename = "port_test_result")]
    pub outcome: PortOutcome,
    #[serde(rename = "port_error")]
    pub error: Option<String>,
    #[serde(default)]
    pub resolved_addresses: Vec<IpAddr>,
    #[serde(default)]
    pub dns_error: Option<String>,
}

impl PortStatus {
    pub fn open(resolved_addresses: Vec<IpAddr>) -> Self {
        Self {
            open: true,
            outcome: PortOutcome::Success,
            error: None,
            resolved_addresses,
            dns_error: None,
        }
    }

    pub fn closed(outcome: PortOutcome, error: Option<String>) -> Self {
        Self {
            open: false,
            outcome,
            error,
            resolved_addresses: Vec::new(),
            dns_error: None,
        }
    }
}

// --- Certificate Probe ---

/// Everything learned about the leaf certificate, or why nothing was learned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateState {
    pub certificate_valid: bool,
    pub certificate_expired: bool,
    pub days_until_expiry: i64,
    pub not_before: Option<DateTime<Utc>>,
    pub not_after: Option<DateTime<Utc>>,
    pub subject_cn: String,
    pub issuer_cn: String,
    pub is_self_signed: bool,
    pub ssl_status: SslStatus,
    pub analysis_result: String,
    pub subject_dict: BTreeMap<String, String>,
    pub issuer_dict: BTreeMap<String, String>,
    pub serial_number: String,
    pub version: u32,
    pub certificate_error: Option<String>,
    /// True only when the verified handshake pass succeeded.
    #[serde(default)]
    pub trust_verified: bool,
}

impl CertificateState {
    /// Zero-filled state for when no certificate could be obtained.
    pub fn unavailable(ssl_status: SslStatus, certificate_error: Option<String>) -> Self {
        Self {
            certificate_valid: false,
            certificate_expired: false,
            days_until_expiry: 0,
            not_before: None,
            not_after: None,
            subject_cn: String::new(),
            issuer_cn: String::new(),
            is_self_signed: false,
            ssl_status,
            analysis_result: ssl_status.summary().to_string(),
            subject_dict: BTreeMap::new(),
            issuer_dict: BTreeMap::new(),
            serial_number: String::new(),
            version: 0,
            certificate_error,
            trust_verified: false,
        }
    }
}

// --- Header Probe ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderState {
    pub security_headers_present: Vec<SecurityHeader>,
    pub missing_security_headers: Vec<SecurityHeader>,
    pub hsts_enabled: bool,
    pub hsts_max_age: u64,
    pub hsts_include_subdomains: bool,
    /// Share of the catalog present, 0.0 to 100.0.
    pub headers_score: f64,
    pub security_headers_error: Option<String>,
}

impl HeaderState {
    /// Partitions the catalog into present and missing, both in catalog order.
    pub fn from_present(present: &[SecurityHeader]) -> Self {
        let (security_headers_present, missing_security_headers): (Vec<_>, Vec<_>) =
            SecurityHeader::iter().partition(|header| present.contains(header));
        let headers_score =
            security_headers_present.len() as f64 / SecurityHeader::COUNT as f64 * 100.0;
        Self {
            security_headers_present,
            missing_security_headers,
            hsts_enabled: false,
            hsts_max_age: 0,
            hsts_include_subdomains: false,
            headers_score,
            security_headers_error: None,
        }
    }

    /// Every catalog header counted as missing.
    pub fn all_missing(security_headers_error: Option<String>) -> Self {
        Self {
            security_headers_error,
            ..Self::from_present(&[])
        }
    }

    pub fn present_count(&self) -> usize {
        self.security_headers_present.len()
    }
}

// --- Redirect Probe ---

/// Whether plain HTTP bounces visitors to HTTPS. Recorded only for closed ports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedirectState {
    pub http_redirect_to_https: bool,
    pub redirect_location: Option<String>,
    pub redirect_error: Option<String>,
}

// --- Probe Result ---

/// Immutable snapshot of one probe run. Every grading function reads only this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub domain: String,
    pub port: u16,
    pub analyzed_at: DateTime<Utc>,
    pub url_scheme: String,
    #[serde(flatten)]
    pub port_status: PortStatus,
    #[serde(flatten)]
    pub certificate: CertificateState,
    #[serde(flatten)]
    pub headers: HeaderState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_redirect: Option<RedirectState>,
    pub ssl_grade: SslGrade,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checked_domains: Vec<String>,
}

impl ProbeResult {
    /// Assembles the snapshot and derives its grade.
    pub fn new(
        domain: &str,
        port: u16,
        url_scheme: &str,
        port_status: PortStatus,
        certificate: CertificateState,
        headers: HeaderState,
    ) -> Self {
        let mut result = Self {
            domain: domain.to_string(),
            port,
            analyzed_at: Utc::now(),
            url_scheme: url_scheme.to_string(),
            port_status,
            certificate,
            headers,
            http_redirect: None,
            ssl_grade: SslGrade::F,
            original_domain: None,
            checked_domains: Vec::new(),
        };
        result.ssl_grade = grading::grade(&result);
        result
    }

    /// Snapshot for a closed port: certificate and header sections are default-filled.
    pub fn unreachable(domain: &str, port: u16, url_scheme: &str, port_status: PortStatus) -> Self {
        Self::new(
            domain,
            port,
            url_scheme,
            port_status,
            CertificateState::unavailable(SslStatus::NoSsl, None),
            HeaderState::all_missing(None),
        )
    }

    pub fn port_open(&self) -> bool {
        self.port_status.open
    }

    pub fn ssl_status(&self) -> SslStatus {
        self.certificate.ssl_status
    }

    pub fn days_until_expiry(&self) -> i64 {
        self.certificate.days_until_expiry
    }

    pub fn missing_headers(&self) -> &[SecurityHeader] {
        &self.headers.missing_security_headers
    }
}

// --- Report ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IssueKind {
    SslService,
    DataEncryption,
    BrowserWarning,
    Certificate,
    SecurityHeader,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessImpact {
    pub revenue_loss_annual: u64,
    pub seo_impact: u32,
    pub user_trust_impact: u32,
}

/// The report card handed to storage, rendering and the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: String,
    pub url: String,
    pub ssl_grade: SslGrade,
    pub security_score: u8,
    pub issues: Vec<Issue>,
    pub business_impact: BusinessImpact,
    pub recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub ssl_result: ProbeResult,
}
