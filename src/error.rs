// src/error.rs

//! Error taxonomy for the probe and grading engine.
//!
//! Probes never let these escape: each failure is folded into a field of
//! [`ProbeResult`](crate::core::models::ProbeResult). Only [`Error::InvalidUrl`]
//! reaches the caller of [`Analyzer::analyze`](crate::core::analyzer::Analyzer::analyze).

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Timed out after {}s: {operation}", .after.as_secs())]
    NetworkTimeout { operation: &'static str, after: Duration },

    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    #[error("DNS resolution failed: {0}")]
    Dns(String),

    #[error("TLS handshake failed ({}): {message}", pass_label(.verified))]
    TlsHandshake { verified: bool, message: String },

    #[error("Certificate parse error: {0}")]
    CertificateParse(String),

    #[error("Header fetch failed: {0}")]
    HeaderFetch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn pass_label(verified: &bool) -> &'static str {
    if *verified { "verified" } else { "unverified" }
}

impl Error {
    /// Raw failure text, without the variant prefix.
    ///
    /// Handshake failures are classified by substring match on this text.
    pub fn detail(&self) -> String {
        match self {
            Error::TlsHandshake { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::HeaderFetch(err.to_string())
    }
}

impl From<x509_parser::nom::Err<x509_parser::error::X509Error>> for Error {
    fn from(err: x509_parser::nom::Err<x509_parser::error::X509Error>) -> Self {
        Error::CertificateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
