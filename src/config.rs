// src/config.rs

//! Runtime settings for the probes.

use serde::Deserialize;
use std::time::Duration;

/// The HTTPS port every report is graded against.
pub const HTTPS_PORT: u16 = 443;

/// Timeouts and knobs shared by every probe of one analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    pub port: u16,
    pub port_timeout_secs: u64,
    pub handshake_timeout_secs: u64,
    pub headers_timeout_secs: u64,
    pub redirect_timeout_secs: u64,
    pub user_agent: String,
    /// Probe `www.host` and `host` side by side and keep the better result.
    pub compare_apex_domain: bool,
}

fn default_user_agent() -> String {
    format!("SecureCheck/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            port: HTTPS_PORT,
            port_timeout_secs: 5,
            handshake_timeout_secs: 10,
            headers_timeout_secs: 10,
            redirect_timeout_secs: 10,
            user_agent: default_user_agent(),
            compare_apex_domain: false,
        }
    }
}

impl ProbeSettings {
    pub fn port_timeout(&self) -> Duration {
        Duration::from_secs(self.port_timeout_secs)
    }

    /// Applies to each of the two handshake passes separately.
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }

    pub fn headers_timeout(&self) -> Duration {
        Duration::from_secs(self.headers_timeout_secs)
    }

    pub fn redirect_timeout(&self) -> Duration {
        Duration::from_secs(self.redirect_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_probe_budgets() {
        let settings = ProbeSettings::default();
        assert_eq!(settings.port, 443);
        assert_eq!(settings.port_timeout(), Duration::from_secs(5));
        assert_eq!(settings.handshake_timeout(), Duration::from_secs(10));
        assert_eq!(settings.headers_timeout(), Duration::from_secs(10));
        assert!(!settings.compare_apex_domain);
        assert!(settings.user_agent.starts_with("SecureCheck/"));
    }

    #[test]
    fn deserializes_with_optional_fields_missing() {
        let settings: ProbeSettings = serde_json::from_str(
            r#"{"port_timeout_secs":1,"handshake_timeout_secs":2,"headers_timeout_secs":3,"redirect_timeout_secs":4}"#,
        )
        .unwrap();
        assert_eq!(settings.port, HTTPS_PORT);
        assert_eq!(settings.handshake_timeout(), Duration::from_secs(2));
        assert!(!settings.compare_apex_domain);
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let settings: ProbeSettings = serde_json::from_str(r#"{"headers_timeout_secs":3}"#).unwrap();
        assert_eq!(settings.headers_timeout(), Duration::from_secs(3));
        assert_eq!(settings.port_timeout(), Duration::from_secs(5));
        assert_eq!(settings.handshake_timeout(), Duration::from_secs(10));
        assert_eq!(settings.redirect_timeout(), Duration::from_secs(10));
        assert_eq!(settings.port, HTTPS_PORT);
        assert!(settings.user_agent.starts_with("SecureCheck/"));

        let empty: ProbeSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.port_timeout_secs, ProbeSettings::default().port_timeout_secs);
    }
}
