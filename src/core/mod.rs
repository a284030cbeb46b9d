// src/core/mod.rs

// The `core` module holds everything between a validated URL and a finished
// report card. Nothing in here touches the terminal.

/// Data structures shared across the probes and the report: `ProbeResult`,
/// `AnalysisReport`, the status and grade enums.
pub mod models;

/// The network probes (port, certificate, headers, redirect) and the
/// function that sequences them.
pub mod scanner;

/// Score and letter grade, derived from one probe snapshot.
pub mod grading;

/// Issue and recommendation catalog.
pub mod knowledge_base;

/// Illustrative revenue, SEO and trust estimates per grade.
pub mod impact;

/// Where finished reports are kept for later lookup by id.
pub mod store;

/// Ties validation, probing, derivation and storage together.
pub mod analyzer;
