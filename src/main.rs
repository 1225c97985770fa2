use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use almanac::codec::{HeaderOptions, encode_with, write_atomic};
use almanac::config::{ConfigFile, SearchBudget, Seconds, StorageClass, parse_instant};
use almanac::constants::DEFAULT_EVENT_COUNT;
use almanac::ephemeris::MeanElementEphemeris;
use almanac::events::EventKind;
use almanac::report::{OutputFormat, TableReport, create_formatter};
use almanac::search::{LogProgress, ScanDriver, Timestamp};

#[derive(Parser, Debug)]
#[command(name = "almanac")]
#[command(about = "Generate compact tables of recurring astronomical events", long_about = None)]
struct Args {
    /// Event kinds to generate, or "all"
    #[arg(required = true, value_parser = parse_target)]
    targets: Vec<Target>,

    /// Number of events per kind
    #[arg(short = 'n', long, default_value_t = DEFAULT_EVENT_COUNT)]
    count: usize,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// First instant to search from (Unix seconds, RFC 3339 or YYYY-MM-DD)
    #[arg(long, default_value = "0", value_parser = parse_instant)]
    start: Timestamp,

    /// Write only the binary records
    #[arg(long, conflicts_with = "header_only")]
    binary_only: bool,

    /// Write only the C headers
    #[arg(long)]
    header_only: bool,

    /// Storage qualifier for C headers
    #[arg(long, value_enum, default_value = "progmem")]
    storage: StorageClass,

    /// Prefix for C header macros and symbols
    #[arg(long, default_value = "fractonica")]
    prefix: String,

    /// TOML file with search budget and per-kind scan overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scan step for every selected kind (e.g. "3h")
    #[arg(long)]
    step: Option<Seconds>,

    /// Give up after this many scan windows per kind
    #[arg(long)]
    max_windows: Option<usize>,

    /// Give up on a kind after this long (e.g. "10m")
    #[arg(long)]
    timeout: Option<Seconds>,

    /// Report format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy)]
enum Target {
    All,
    Kind(EventKind),
}

fn parse_target(s: &str) -> std::result::Result<Target, String> {
    if s == "all" {
        return Ok(Target::All);
    }
    <EventKind as clap::ValueEnum>::from_str(s, false)
        .map(Target::Kind)
        .map_err(|_| format!("unknown event kind '{}' (expected one of: all, {})", s, EventKind::slugs().join(", ")))
}

fn selected_kinds(targets: &[Target]) -> Vec<EventKind> {
    let mut kinds = Vec::new();
    for target in targets {
        let add: &[EventKind] = match target {
            Target::All => &EventKind::ALL,
            Target::Kind(kind) => std::slice::from_ref(kind),
        };
        for kind in add {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
    }
    kinds
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

    anyhow::ensure!(args.count > 0, "count must be at least 1");

    let config_file = match &args.config {
        Some(path) => ConfigFile::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ConfigFile::default(),
    };

    let mut budget = SearchBudget::default();
    config_file.apply_budget(&mut budget);
    if let Some(max_windows) = args.max_windows {
        budget.max_windows = max_windows;
    }
    if let Some(timeout) = args.timeout {
        budget.timeout = Some(timeout.as_duration());
    }

    let header_options = HeaderOptions {
        prefix: args.prefix.clone(),
        storage: args.storage,
    };

    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let ephemeris = MeanElementEphemeris;
    let known = EventKind::slugs();
    let formatter = create_formatter(args.format, args.verbose > 0);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }

    for kind in selected_kinds(&args.targets) {
        let mut scan = kind.default_scan();
        if let Some(overrides) = config_file.overrides_for(kind.slug(), &known)? {
            overrides.apply(&mut scan);
        }
        if let Some(step) = args.step {
            scan.step = step.get();
        }

        log::info!("Generating {} ({} events from {})", kind.label(), args.count, args.start);
        let event = kind.descriptor(&ephemeris, scan);
        let started = Instant::now();
        let sequence = ScanDriver::new(&event)
            .with_budget(budget)
            .run(args.start, args.count, &mut LogProgress::default())
            .with_context(|| format!("Failed to generate {}", kind.label()))?;

        let encoded = encode_with(&sequence, &header_options)?;
        let mut report = TableReport::from_sequence(&sequence);
        report.elapsed_secs = Some(started.elapsed().as_secs_f64());

        if !args.header_only {
            let path = args.output.join(format!("{}.bin", kind.slug()));
            write_atomic(&path, &encoded.binary)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            report.artifacts.push(path.display().to_string());
        }
        if !args.binary_only {
            let path = args.output.join(format!("{}.h", kind.slug()));
            write_atomic(&path, encoded.source.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            report.artifacts.push(path.display().to_string());
        }

        println!("{}", formatter.format(&report));
    }

    Ok(())
}
