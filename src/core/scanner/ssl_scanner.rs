// src/core/scanner/ssl_scanner.rs

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use native_tls::TlsConnector;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};
use x509_parser::oid_registry::{
    Oid, OID_X509_COMMON_NAME, OID_X509_COUNTRY_NAME, OID_X509_LOCALITY_NAME, OID_X509_ORGANIZATIONAL_UNIT,
    OID_X509_ORGANIZATION_NAME, OID_X509_STATE_OR_PROVINCE_NAME,
};
use x509_parser::prelude::*;

use crate::core::models::{CertificateState, SslStatus};
use crate::error::{Error, Result};

const SECONDS_PER_DAY: i64 = 86_400;

/// Obtains and classifies the leaf certificate of `host:port`.
///
/// The first handshake verifies chain and hostname. If it fails for any
/// reason a second, unverified handshake still fetches the certificate for
/// diagnosis. Every failure ends up in the returned state.
pub async fn run_ssl_scan(host: &str, port: u16, timeout: Duration) -> CertificateState {
    info!(target = host, port, "Starting certificate probe.");

    let (der, verify_error) = match fetch_leaf_certificate(host, port, timeout, true).await {
        Ok(der) => (Ok(der), None),
        Err(first) => {
            warn!(target = host, error = %first, "Verified handshake failed, retrying without verification.");
            let second = fetch_leaf_certificate(host, port, timeout, false).await;
            if let Err(e) = &second {
                warn!(target = host, error = %e, "Unverified handshake failed too.");
            }
            (second, Some(first))
        }
    };

    let state = match der.and_then(|der| inspect_certificate(&der, Utc::now())) {
        Ok(mut state) => {
            state.trust_verified = verify_error.is_none();
            state.certificate_error = verify_error.map(|e| e.detail());
            state
        }
        Err(e) => {
            // Classification looks at the verified pass when there was one.
            let failure = verify_error.unwrap_or(e);
            let status = classify_failure(&failure.detail());
            debug!(%status, "No usable certificate, classified from failure text.");
            CertificateState::unavailable(status, Some(failure.detail()))
        }
    };

    info!(target = host, status = %state.ssl_status, days = state.days_until_expiry, "Certificate probe finished.");
    state
}

/// One bounded handshake returning the peer's leaf certificate as DER.
/// The connection is closed before this returns.
async fn fetch_leaf_certificate(host: &str, port: u16, timeout: Duration, verify: bool) -> Result<Vec<u8>> {
    debug!(target = host, verify, "Performing TLS handshake.");
    let connector = TlsConnector::builder()
        .danger_accept_invalid_certs(!verify)
        .danger_accept_invalid_hostnames(!verify)
        .build()
        .map_err(|e| Error::TlsHandshake { verified: verify, message: e.to_string() })?;
    let connector = tokio_native_tls::TlsConnector::from(connector);

    let handshake = async {
        let stream = TcpStream::connect((host, port)).await?;
        let tls = connector
            .connect(host, stream)
            .await
            .map_err(|e| Error::TlsHandshake { verified: verify, message: e.to_string() })?;
        let certificate = tls
            .get_ref()
            .peer_certificate()
            .map_err(|e| Error::CertificateParse(e.to_string()))?
            .ok_or_else(|| Error::CertificateParse("server presented no certificate".to_string()))?;
        let der = certificate.to_der().map_err(|e| Error::CertificateParse(e.to_string()))?;
        Ok::<_, Error>(der)
    };

    tokio::time::timeout(timeout, handshake)
        .await
        .map_err(|_| Error::NetworkTimeout { operation: "TLS handshake", after: timeout })?
}

/// Reads validity, names and identity fields out of a DER certificate.
pub fn inspect_certificate(der: &[u8], now: DateTime<Utc>) -> Result<CertificateState> {
    let (_, x509) = parse_x509_certificate(der)?;
    debug!(subject = %x509.subject(), issuer = %x509.issuer(), "Parsed leaf certificate.");

    let validity = x509.validity();
    let not_before = asn1_time_to_chrono_utc(&validity.not_before)?;
    let not_after = asn1_time_to_chrono_utc(&validity.not_after)?;

    // Whole encoded names, so repeated or non-string attributes still count.
    let is_self_signed = x509.subject().as_raw() == x509.issuer().as_raw();
    let subject_dict = name_attributes(x509.subject());
    let issuer_dict = name_attributes(x509.issuer());
    let is_valid = not_before <= now && now <= not_after;
    let ssl_status = classify_validity(not_before, not_after, now, is_self_signed);

    Ok(CertificateState {
        certificate_valid: is_valid,
        certificate_expired: now > not_after,
        days_until_expiry: days_until(not_after, now),
        not_before: Some(not_before),
        not_after: Some(not_after),
        subject_cn: subject_dict.get("CN").cloned().unwrap_or_default(),
        issuer_cn: issuer_dict.get("CN").cloned().unwrap_or_default(),
        is_self_signed,
        ssl_status,
        analysis_result: ssl_status.summary().to_string(),
        subject_dict,
        issuer_dict,
        serial_number: x509.raw_serial_as_string(),
        version: x509.version().0 + 1,
        certificate_error: None,
        trust_verified: false,
    })
}

/// Status of a certificate that was actually obtained, in priority order.
pub fn classify_validity(
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
    now: DateTime<Utc>,
    is_self_signed: bool,
) -> SslStatus {
    let is_valid = not_before <= now && now <= not_after;
    if !is_valid && now > not_after {
        SslStatus::Expired
    } else if !is_valid {
        SslStatus::NotYetValid
    } else if is_self_signed {
        SslStatus::SelfSigned
    } else {
        SslStatus::Valid
    }
}

/// Status when no certificate could be read, judged by the failure text.
pub fn classify_failure(message: &str) -> SslStatus {
    let message = message.to_lowercase();
    if message.contains("certificate verify failed") {
        SslStatus::VerifyFailed
    } else if message.contains("certificate has expired") {
        SslStatus::Expired
    } else if message.contains("self signed certificate") {
        SslStatus::SelfSigned
    } else {
        SslStatus::ConnectionError
    }
}

/// Whole days left, rounded down; negative once expired.
pub fn days_until(not_after: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    not_after.signed_duration_since(now).num_seconds().div_euclid(SECONDS_PER_DAY)
}

fn asn1_time_to_chrono_utc(time: &ASN1Time) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(time.timestamp(), 0)
        .ok_or_else(|| Error::CertificateParse(format!("validity timestamp out of range: {time}")))
}

fn attribute_label(oid: &Oid) -> String {
    let label = if *oid == OID_X509_COMMON_NAME {
        "CN"
    } else if *oid == OID_X509_ORGANIZATION_NAME {
        "O"
    } else if *oid == OID_X509_ORGANIZATIONAL_UNIT {
        "OU"
    } else if *oid == OID_X509_COUNTRY_NAME {
        "C"
    } else if *oid == OID_X509_STATE_OR_PROVINCE_NAME {
        "ST"
    } else if *oid == OID_X509_LOCALITY_NAME {
        "L"
    } else {
        return oid.to_id_string();
    };
    label.to_string()
}

/// String attributes keyed by short label. Repeated types are joined in order.
fn name_attributes(name: &X509Name) -> BTreeMap<String, String> {
    let mut attributes: BTreeMap<String, String> = BTreeMap::new();
    for attr in name.iter_attributes() {
        let Ok(value) = attr.as_str() else { continue };
        attributes
            .entry(attribute_label(attr.attr_type()))
            .and_modify(|joined| {
                joined.push_str(", ");
                joined.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    attributes
}
