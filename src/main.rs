// src/main.rs

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::error;

use securecheck::config::HTTPS_PORT;
use securecheck::{Analyzer, Error, InMemoryReportStore, ProbeSettings};

/// Grade the TLS setup and security headers of a website.
#[derive(Parser, Debug)]
#[command(name = "securecheck", version, about)]
struct Cli {
    /// URL to analyze, e.g. https://example.com
    url: String,

    /// Print the report as single-line JSON
    #[arg(long)]
    compact: bool,

    /// Also probe the host without `www.` and keep the better result
    #[arg(long)]
    apex: bool,

    /// Mirror log output to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Port to probe for TLS
    #[arg(long, default_value_t = HTTPS_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    securecheck::logging::initialize_logging(cli.verbose)?;

    let settings = ProbeSettings {
        port: cli.port,
        compare_apex_domain: cli.apex,
        ..ProbeSettings::default()
    };
    let analyzer = Analyzer::new(settings, std::sync::Arc::new(InMemoryReportStore::new()));

    let report = match analyzer.analyze(&cli.url).await {
        Ok(report) => report,
        Err(e @ Error::InvalidUrl(_)) => {
            error!(error = %e, "Refusing to analyze.");
            eprintln!("{e}");
            return Ok(ExitCode::from(2));
        }
        Err(e) => return Err(e.into()),
    };

    let json = if cli.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}
