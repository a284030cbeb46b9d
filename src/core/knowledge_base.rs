//! Static catalog of every issue and remediation the engine can report.
//!
//! Issue extraction and recommendation generation are pure functions over a
//! [`ProbeResult`]; all wording lives in the tables below so it can be revised
//! without touching the rules.

use tracing::debug;

use crate::core::models::{Issue, IssueKind, ProbeResult, SecurityHeader, Severity, SslGrade, SslStatus};

/// A fixed issue whose wording does not depend on the probe data.
pub struct IssueTemplate {
    pub kind: IssueKind,
    pub severity: Severity,
    pub title: &'static str,
    pub description: &'static str,
}

impl IssueTemplate {
    fn to_issue(&self) -> Issue {
        Issue {
            kind: self.kind,
            severity: self.severity,
            title: self.title.to_string(),
            description: self.description.to_string(),
        }
    }
}

/// Emitted together whenever HTTPS is not served at all.
static NO_HTTPS_ISSUES: &[IssueTemplate] = &[
    IssueTemplate {
        kind: IssueKind::SslService,
        severity: Severity::Critical,
        title: "HTTPS service unavailable",
        description: "Port 443 is closed, so no HTTPS service is offered at all.",
    },
    IssueTemplate {
        kind: IssueKind::DataEncryption,
        severity: Severity::Critical,
        title: "All traffic transmitted unencrypted",
        description: "Without encryption every request and response travels in plain text and can be intercepted.",
    },
    IssueTemplate {
        kind: IssueKind::BrowserWarning,
        severity: Severity::High,
        title: "Browser security warning",
        description: "Every major browser flags the site as 'Not secure'.",
    },
];

static CERTIFICATE_EXPIRED: IssueTemplate = IssueTemplate {
    kind: IssueKind::Certificate,
    severity: Severity::Critical,
    title: "SSL certificate expired",
    description: "The SSL certificate has expired and browsers show a security warning to every visitor.",
};

static SELF_SIGNED_CERTIFICATE: IssueTemplate = IssueTemplate {
    kind: IssueKind::Certificate,
    severity: Severity::High,
    title: "Self-signed certificate",
    description: "The certificate was not issued by a trusted certificate authority, so browsers show a warning.",
};

static VERIFICATION_FAILED: IssueTemplate = IssueTemplate {
    kind: IssueKind::Certificate,
    severity: Severity::Critical,
    title: "SSL certificate verification failed",
    description: "Browsers cannot trust the certificate: the issuing authority is not trusted or the chain is incomplete.",
};

/// Certificates closer than this to expiry raise a warning.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

fn missing_header_issue(header: SecurityHeader) -> Issue {
    Issue {
        kind: IssueKind::SecurityHeader,
        severity: Severity::Medium,
        title: format!("{header} header missing"),
        description: format!("The {header} security header is not set."),
    }
}

fn expiry_issue(days: i64) -> Issue {
    Issue {
        kind: IssueKind::Certificate,
        severity: Severity::Medium,
        title: "SSL certificate expiring soon".to_string(),
        description: format!("The SSL certificate expires in {days} days."),
    }
}

fn expiring_soon(days: i64) -> bool {
    0 < days && days < EXPIRY_WARNING_DAYS
}

/// Lists every detected condition in detection order. Checks are independent,
/// so several may fire for the same snapshot.
pub fn extract_issues(result: &ProbeResult) -> Vec<Issue> {
    let status = result.ssl_status();
    let mut issues = Vec::new();

    if !result.port_open() || status == SslStatus::NoSsl {
        issues.extend(NO_HTTPS_ISSUES.iter().map(IssueTemplate::to_issue));
    }
    if status == SslStatus::Expired {
        issues.push(CERTIFICATE_EXPIRED.to_issue());
    }
    if status == SslStatus::SelfSigned {
        issues.push(SELF_SIGNED_CERTIFICATE.to_issue());
    }
    if status == SslStatus::VerifyFailed {
        issues.push(VERIFICATION_FAILED.to_issue());
    }

    // A closed port never fetched headers; the no-HTTPS issues already cover it.
    if result.port_open() {
        issues.extend(result.missing_headers().iter().copied().map(missing_header_issue));
    }

    if status == SslStatus::Valid && expiring_soon(result.days_until_expiry()) {
        issues.push(expiry_issue(result.days_until_expiry()));
    }

    debug!(count = issues.len(), %status, "Extracted issues.");
    issues
}

// --- Remediation ---

static NO_HTTPS_PLAN: &[&str] = &[
    "Urgent: install an SSL certificate and enable the HTTPS service (today)",
    "Required: use a free Let's Encrypt certificate (no cost)",
    "Recommended: redirect all HTTP traffic to HTTPS automatically (this week)",
    "Long term: set up continuous security monitoring (within a month)",
];

static EXPIRED_FIXES: &[&str] = &[
    "Issue a new SSL certificate immediately.",
    "Set up automatic renewal with Let's Encrypt.",
];

static SELF_SIGNED_FIXES: &[&str] = &[
    "Obtain an SSL certificate from a trusted certificate authority (CA).",
    "Let's Encrypt issues trusted certificates free of charge.",
];

const ADD_MISSING_HEADERS: &str = "Add the missing security headers to the web server configuration.";
const RAISE_GRADE: &str = "Enable TLS 1.3 and harden the server configuration to reach grade A or better.";
const RENEW_SOON: &str = "The certificate expires soon. Check that automatic renewal is working.";
const MAINTAIN_POSTURE: &str = "The current security configuration is excellent. Keep monitoring it regularly.";
const FIX_CONNECTIVITY: &str = "Resolve the server connection problem, then install an SSL certificate.";

/// Ordered remediation steps for the snapshot and its grade.
pub fn recommendations(result: &ProbeResult, grade: SslGrade) -> Vec<String> {
    let owned = |steps: &[&str]| steps.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    if !result.port_open() {
        return owned(NO_HTTPS_PLAN);
    }

    match result.ssl_status() {
        SslStatus::NoSsl => owned(NO_HTTPS_PLAN),
        SslStatus::Expired => owned(EXPIRED_FIXES),
        SslStatus::SelfSigned => owned(SELF_SIGNED_FIXES),
        SslStatus::Valid => {
            let mut steps = Vec::new();
            let headers_missing = !result.missing_headers().is_empty();
            if headers_missing {
                steps.push(ADD_MISSING_HEADERS.to_string());
            }
            if matches!(grade, SslGrade::B | SslGrade::C | SslGrade::D) {
                steps.push(RAISE_GRADE.to_string());
            }
            if expiring_soon(result.days_until_expiry()) {
                steps.push(RENEW_SOON.to_string());
            }
            // SslGrade::A also stands for "A-".
            if !headers_missing && matches!(grade, SslGrade::APlus | SslGrade::A) {
                steps.push(MAINTAIN_POSTURE.to_string());
            }
            steps
        }
        _ => vec![FIX_CONNECTIVITY.to_string()],
    }
}
