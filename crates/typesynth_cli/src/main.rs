//! typesynth - command-line front end
//!
//! Loads a primary library document and its dependencies, runs the
//! two-pass synthesis and prints TypeScript declarations.
//!
//! ```text
//! typesynth --library sap.m.api.json --deps-dir deps/ --out sap.m.d.ts
//! ```
//!
//! Log output is controlled with `TYPESYNTH_LOG` (default `info`).

mod args;
mod run;

use anyhow::Result;
use args::CliArgs;
use clap::Parser;

fn main() -> Result<()> {
    use tracing_subscriber::EnvFilter;
    let filter =
        EnvFilter::try_from_env("TYPESYNTH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let args = CliArgs::parse();
    let report = run::run(&args)?;

    // Anomalies are informational; they never change the exit status
    eprintln!(
        "typesynth: {} settings interface(s), {} event parameter interface(s), {} rewrite(s); {}",
        report.settings_interfaces,
        report.parameter_interfaces,
        report.rewrites_applied,
        report.anomalies.summary()
    );
    Ok(())
}
