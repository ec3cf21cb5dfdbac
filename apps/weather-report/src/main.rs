//! Demo CLI applying a changeset to a weather report.
//!
//! Builds a report, prints it, applies the changeset with a modifier stamp,
//! and prints it again.

mod report;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use changeset_core::{Applier, ApplyConfig, Changeset};
use report::WeatherReport;

/// Command-line arguments for the weather report demo.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// City the report is for
    #[arg(long, default_value = "Clearwater")]
    city: String,

    /// Initial weather description
    #[arg(long, default_value = "Hot and sunny")]
    weather: String,

    /// Reporter who created the report
    #[arg(long, default_value = "Dylan")]
    created_by: String,

    /// Reporter making the change
    #[arg(long, default_value = "Mr. Weatherdude")]
    modifier: String,

    /// Changeset as a JSON object keyed by field tag
    #[arg(long, default_value = r#"{"weather":"Thunderstorms"}"#)]
    changes: String,

    /// Ignore unknown fields instead of rejecting the changeset
    #[arg(long)]
    allow_unknown: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = ApplyConfig {
        reject_unknown_fields: !args.allow_unknown,
        ..Default::default()
    };
    let applier = Applier::new(config);

    let mut report = WeatherReport::new(args.city, args.weather, args.created_by);
    println!("{}", report);

    let mut changes = Changeset::from_json_str(&args.changes)
        .with_context(|| format!("Failed to parse changeset '{}'", args.changes))?;

    println!();
    println!("Making changes...");
    println!();

    applier
        .apply_with_modifier(&mut changes, &args.modifier, &mut report)
        .context("Failed to apply changeset to weather report")?;
    tracing::info!("Applied {} change(s) as {}", changes.len(), args.modifier);

    println!("{}", report);
    Ok(())
}
