use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};

use almanac::codec::read_record;
use almanac::config::parse_instant;
use almanac::report::{OutputFormat, TableReport, create_formatter};
use almanac::search::{EventSequence, Timestamp};
use almanac::table::EventTable;
use anyhow::{Context, Result};

#[derive(Parser, Debug)]
#[command(name = "inspect_table")]
#[command(about = "Decode binary event tables and summarize them", long_about = None)]
struct Args {
    /// Binary record files to inspect
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also report where this instant falls within its period
    #[arg(long, value_parser = parse_instant)]
    at: Option<Timestamp>,

    /// Number of bins per period for --at
    #[arg(long, default_value = "4096")]
    resolution: u32,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Serialize)]
struct FractionReport {
    name: String,
    at: Timestamp,
    resolution: u32,
    bin: u32,
    bin_octal: u64,
    normalized: f64,
    progress: f64,
    period_start: Timestamp,
    period_end: Timestamp,
}

fn table_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn fraction_report(
    name: &str,
    timestamps: &[Timestamp],
    at: Timestamp,
    resolution: u32,
) -> Option<FractionReport> {
    let table = EventTable::new(timestamps);
    let fraction = table.fraction_at(at, resolution)?;
    Some(FractionReport {
        name: name.to_string(),
        at,
        resolution,
        bin: fraction.bin,
        bin_octal: fraction.bin_octal,
        normalized: fraction.normalized,
        progress: fraction.progress,
        period_start: table.get(fraction.past_index)?,
        period_end: table.get(fraction.future_index)?,
    })
}

fn print_fraction(fraction: &FractionReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(fraction)?),
        OutputFormat::Csv => println!(
            "{},{},{},{},{},{:.6},{:.6}",
            fraction.name,
            fraction.at,
            fraction.resolution,
            fraction.bin,
            fraction.bin_octal,
            fraction.normalized,
            fraction.progress
        ),
        OutputFormat::Text => println!(
            "  at {}: bin {}/{} (octal {}), {:.4} through period [{}, {}], {:.0}% into bin",
            fraction.at,
            fraction.bin,
            fraction.resolution,
            fraction.bin_octal,
            fraction.normalized,
            fraction.period_start,
            fraction.period_end,
            fraction.progress * 100.0
        ),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    anyhow::ensure!(args.resolution > 0, "resolution must be at least 1");

    let formatter = create_formatter(args.format, args.verbose > 0);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }

    for path in &args.files {
        let timestamps =
            read_record(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let name = table_name(path);
        log::info!("{}: {} entries", path.display(), timestamps.len());

        if timestamps.windows(2).any(|pair| pair[1] <= pair[0]) {
            log::warn!("{}: timestamps are not strictly ascending", path.display());
        }

        let sequence = EventSequence::new(name.clone(), timestamps);
        println!("{}", formatter.format(&TableReport::from_sequence(&sequence)));

        if let Some(at) = args.at {
            match fraction_report(&name, &sequence.timestamps, at, args.resolution) {
                Some(fraction) => print_fraction(&fraction, args.format)?,
                None => log::warn!("{}: {} lies outside the table", name, at),
            }
        }
    }

    Ok(())
}
