// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod logging;

pub use crate::config::ProbeSettings;
pub use crate::core::analyzer::Analyzer;
pub use crate::core::models::{AnalysisReport, BusinessImpact, Issue, ProbeResult, SslGrade, SslStatus};
pub use crate::core::store::{InMemoryReportStore, ReportStore};
pub use crate::error::{Error, Result};
