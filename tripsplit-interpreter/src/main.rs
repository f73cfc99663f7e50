#![warn(clippy::uninlined_format_args)]

mod bootstrap;
mod presenter;

use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
    process,
};

use bootstrap::{AppConfig, init_logging};
use clap::Parser;
use presenter::{render_draft, render_summary};
use tripsplit_application::{DraftBuilder, Trip, TripLedger};
use tripsplit_domain::FuzzyNameMatcher;

type CliResult<T> = Result<T, Cow<'static, str>>;

/// Settles a trip file, or previews the expense parsed from a sentence.
#[derive(Debug, Parser)]
#[command(name = "tripsplit-interpreter", version)]
struct CliArgs {
    /// Trip JSON file to summarize
    #[arg(required_unless_present = "draft", conflicts_with = "draft")]
    trip: Option<PathBuf>,
    /// Parse a free-text expense instead of reading a trip
    #[arg(long, value_name = "TEXT")]
    draft: Option<String>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() {
    init_logging();
    let args = CliArgs::try_parse().unwrap_or_else(|err| {
        // --help and --version still exit 0; usage errors share status 1.
        if err.use_stderr() {
            let _ = err.print();
            process::exit(1);
        }
        err.exit()
    });

    if let Err(err) = run(&args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: &CliArgs) -> CliResult<()> {
    let config = AppConfig::from_env().map_err(|err| err.to_string())?;

    let output = match (&args.draft, &args.trip) {
        (Some(text), _) => draft_expense(text, &config, args.json)?,
        (None, Some(path)) => summarize_trip(path, &config, args.json)?,
        (None, None) => return Err("expected a trip file or --draft".into()),
    };
    println!("{output}");
    Ok(())
}

fn summarize_trip(path: &Path, config: &AppConfig, json: bool) -> CliResult<String> {
    let shown = path.display();
    let source =
        fs::read_to_string(path).map_err(|err| format!("Failed to read '{shown}': {err}"))?;
    let trip: Trip = serde_json::from_str(&source)
        .map_err(|err| format!("Invalid trip file '{shown}': {err}"))?;

    let ledger = TripLedger::new(
        &trip.participants,
        trip.currency,
        &FuzzyNameMatcher,
        config.ledger,
    )
    .map_err(|err| err.to_string())?;
    let summary = ledger
        .summarize(&trip.expenses)
        .map_err(|err| format!("Settlement failed: {err}"))?;

    if json {
        serde_json::to_string_pretty(&summary).map_err(|err| err.to_string().into())
    } else {
        Ok(render_summary(&trip, &summary))
    }
}

fn draft_expense(text: &str, config: &AppConfig, json: bool) -> CliResult<String> {
    let draft = DraftBuilder::new(&config.ledger).build(text);
    if json {
        serde_json::to_string_pretty(&draft).map_err(|err| err.to_string().into())
    } else {
        Ok(render_draft(&draft))
    }
}
