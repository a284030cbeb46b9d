// src/core/scanner/port_scanner.rs

use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::core::models::{PortOutcome, PortStatus};
use crate::error::{Error, Result};

/// Single TCP connection attempt to `host:port`. No retries: the outcome is authoritative.
pub async fn run_port_scan(host: &str, port: u16, timeout: Duration) -> PortStatus {
    info!(target = host, port, "Starting port probe.");

    let addresses = match resolve(host, timeout).await {
        Ok(addresses) => addresses,
        Err(e) => {
            warn!(target = host, error = %e, "Could not resolve target.");
            let outcome = match e {
                Error::NetworkTimeout { .. } => PortOutcome::Timeout,
                _ => PortOutcome::Error,
            };
            let mut status = PortStatus::closed(outcome, Some(e.to_string()));
            status.dns_error = Some(e.to_string());
            return status;
        }
    };

    let status = match connect(&addresses, port, timeout).await {
        Ok(()) => PortStatus::open(addresses),
        Err(e @ Error::NetworkTimeout { .. }) => {
            PortStatus { resolved_addresses: addresses, ..PortStatus::closed(PortOutcome::Timeout, Some(e.to_string())) }
        }
        Err(e) => {
            PortStatus { resolved_addresses: addresses, ..PortStatus::closed(PortOutcome::Error, Some(e.to_string())) }
        }
    };

    info!(target = host, port, open = status.open, outcome = %status.outcome, "Port probe finished.");
    status
}

async fn resolve(host: &str, timeout: Duration) -> Result<Vec<IpAddr>> {
    if let Ok(ip) = host.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>() {
        return Ok(vec![ip]);
    }

    debug!(target = host, "Resolving host.");
    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());
    let lookup = tokio::time::timeout(timeout, resolver.lookup_ip(host))
        .await
        .map_err(|_| Error::NetworkTimeout { operation: "DNS lookup", after: timeout })?
        .map_err(|e| Error::Dns(e.to_string()))?;

    let addresses: Vec<IpAddr> = lookup.iter().collect();
    if addresses.is_empty() {
        return Err(Error::Dns(format!("no addresses found for {host}")));
    }
    debug!(target = host, count = addresses.len(), "Host resolved.");
    Ok(addresses)
}

async fn connect(addresses: &[IpAddr], port: u16, timeout: Duration) -> Result<()> {
    let targets: Vec<SocketAddr> = addresses.iter().map(|ip| SocketAddr::new(*ip, port)).collect();
    match tokio::time::timeout(timeout, TcpStream::connect(&targets[..])).await {
        // Dropping the stream closes the probe connection.
        Ok(Ok(_stream)) => Ok(()),
        Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => {
            Err(Error::ConnectionRefused(format!("port {port}: {e}")))
        }
        Ok(Err(e)) => Err(Error::Io(e)),
        Err(_) => Err(Error::NetworkTimeout { operation: "TCP connect", after: timeout }),
    }
}
