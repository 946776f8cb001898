//! # Contract Probe Utility
//!
//! Runs the adversarial request catalog against a live API and prints a
//! per-boundary report. Exits non-zero when any case finds a violation.
//!
//! ## Usage
//!
//! ```bash
//! API_BASE_URL=http://localhost:3000/api/v1 cargo run --package contract-probe
//!
//! # Only some boundaries
//! cargo run --package contract-probe -- authentication sanitization
//! ```
//!
//! Configuration is read from the environment (and `.env`), see
//! [`lib_core::ClientConfig`]. `RUST_LOG` overrides the default `info` filter.

use lib_core::config::{core_config, init_config};
use lib_core::Boundary;
use lib_web::probe::{catalog, ContractProbe};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    init_config().map_err(|e| anyhow::anyhow!(e))?;
    let config = core_config();

    let boundaries = selected_boundaries(std::env::args().skip(1))?;
    let cases: Vec<_> = catalog()
        .into_iter()
        .filter(|case| boundaries.contains(&case.boundary))
        .collect();

    info!(base_url = %config.api_base_url, cases = cases.len(), "starting contract probe");
    let probe = ContractProbe::from_config(config)?;
    let report = probe.run_cases(&cases).await;

    println!("{report}");

    if !report.is_clean() {
        anyhow::bail!(
            "{} violation(s) across {} case(s)",
            report.violation_count(),
            report.failures().count()
        );
    }
    info!("no contract violations found");
    Ok(())
}

/// Boundaries named on the command line, or all of them.
fn selected_boundaries(args: impl Iterator<Item = String>) -> anyhow::Result<Vec<Boundary>> {
    let mut selected = Vec::new();
    for arg in args {
        let boundary = Boundary::ALL
            .into_iter()
            .find(|b| b.as_str() == arg)
            .ok_or_else(|| {
                let names: Vec<_> = Boundary::ALL.iter().map(Boundary::as_str).collect();
                anyhow::anyhow!("unknown boundary `{arg}`, expected one of: {}", names.join(", "))
            })?;
        selected.push(boundary);
    }
    if selected.is_empty() {
        selected.extend(Boundary::ALL);
    }
    Ok(selected)
}
