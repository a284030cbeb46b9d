// src/core/scanner/mod.rs

// Probes, leaf to root. Each one folds its own failures into its result.
pub mod headers_scanner;
pub mod port_scanner;
pub mod redirect_scanner;
pub mod ssl_scanner;

use tracing::{debug, info};
use url::{Host, Url};

use crate::config::ProbeSettings;
use crate::core::models::ProbeResult;
use self::headers_scanner::run_headers_scan;
use self::port_scanner::run_port_scan;
use self::redirect_scanner::run_redirect_scan;
use self::ssl_scanner::run_ssl_scan;

/// What a single probe run is aimed at: the host to connect to and the URL to fetch.
#[derive(Debug, Clone)]
pub struct ProbeTarget {
    pub domain: String,
    pub url: Url,
}

impl ProbeTarget {
    /// Builds a target from an already validated URL. Returns `None` without a host.
    pub fn from_url(url: &Url) -> Option<Self> {
        let domain = match url.host()? {
            Host::Domain(domain) => domain.to_string(),
            Host::Ipv4(ip) => ip.to_string(),
            Host::Ipv6(ip) => ip.to_string(),
        };
        Some(Self { domain, url: url.clone() })
    }

    /// The same target with `www.` dropped from the host, if it has one.
    fn apex_variant(&self) -> Option<Self> {
        let apex = self.domain.strip_prefix("www.")?;
        let mut url = self.url.clone();
        url.set_host(Some(apex)).ok()?;
        Some(Self { domain: apex.to_string(), url })
    }
}

/// Runs the probes for `target` and returns the graded snapshot.
///
/// With `compare_apex_domain` set, `www.host` and `host` are probed side by
/// side and the better-graded snapshot wins; ties keep the original host.
pub async fn run_full_scan(target: &ProbeTarget, settings: &ProbeSettings) -> ProbeResult {
    let apex = settings.compare_apex_domain.then(|| target.apex_variant()).flatten();
    let Some(apex) = apex else {
        return probe_target(target, settings).await;
    };

    info!(original = %target.domain, apex = %apex.domain, "Comparing www and apex hosts.");
    let (original, variant) = tokio::join!(probe_target(target, settings), probe_target(&apex, settings));
    let checked_domains = vec![original.domain.clone(), variant.domain.clone()];
    let mut best = if variant.ssl_grade > original.ssl_grade { variant } else { original };
    debug!(chosen = %best.domain, grade = %best.ssl_grade, "Selected best result.");
    best.original_domain = Some(target.domain.clone());
    best.checked_domains = checked_domains;
    best
}

/// Port first; certificate and headers only behind an open port, run side by side.
async fn probe_target(target: &ProbeTarget, settings: &ProbeSettings) -> ProbeResult {
    let domain = target.domain.as_str();
    let scheme = target.url.scheme();
    let port = settings.port;

    let port_status = run_port_scan(domain, port, settings.port_timeout()).await;
    if !port_status.open {
        debug!(target = domain, "Port closed, skipping certificate and header probes.");
        let redirect = run_redirect_scan(domain, settings.redirect_timeout(), &settings.user_agent).await;
        let mut result = ProbeResult::unreachable(domain, port, scheme, port_status);
        result.http_redirect = Some(redirect);
        return result;
    }

    let (certificate, headers) = tokio::join!(
        run_ssl_scan(domain, port, settings.handshake_timeout()),
        run_headers_scan(target.url.as_str(), settings.headers_timeout(), &settings.user_agent)
    );

    let result = ProbeResult::new(domain, port, scheme, port_status, certificate, headers);
    info!(target = domain, status = %result.ssl_status(), grade = %result.ssl_grade, "Probes finished.");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_host_forms() {
        let target = ProbeTarget::from_url(&Url::parse("https://www.example.com/path?q=1").unwrap()).unwrap();
        assert_eq!(target.domain, "www.example.com");

        let v6 = ProbeTarget::from_url(&Url::parse("https://[::1]:8443/").unwrap()).unwrap();
        assert_eq!(v6.domain, "::1");

        assert!(ProbeTarget::from_url(&Url::parse("data:text/plain,hi").unwrap()).is_none());
    }

    #[test]
    fn apex_variant_strips_www_only() {
        let target = ProbeTarget::from_url(&Url::parse("https://www.example.com/a").unwrap()).unwrap();
        let apex = target.apex_variant().unwrap();
        assert_eq!(apex.domain, "example.com");
        assert_eq!(apex.url.as_str(), "https://example.com/a");

        let bare = ProbeTarget::from_url(&Url::parse("https://example.com/").unwrap()).unwrap();
        assert!(bare.apex_variant().is_none());
    }
}
