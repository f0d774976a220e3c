//! Merchant Ledger CLI
//!
//! Loads transactions (a CSV file or the built-in sample), applies the view
//! filters and writes the visible rows as a CSV report.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --input transactions.csv --store "Main Branch" --range this_month
//! cargo run -- --status on_hold --save
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity

use chrono::{DateTime, Utc};
use clap::Parser;
use log::{info, warn};
use merchant_ledger::{
    export, parse_timestamp, Clock, Config, Ledger, Result, Selection, SettlementStatus,
    TimeRange, ViewParams, ViewTotals,
};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "merchant-ledger")]
#[command(version)]
#[command(about = "Filter merchant transactions and export them as a CSV report", long_about = None)]
struct Args {
    /// Configuration file path (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Transactions CSV; the built-in sample is used when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Case-insensitive text matched against id, customer and store
    #[arg(short, long, default_value = "")]
    search: String,

    /// settled_consumer, on_hold, settled_merchant or all
    #[arg(long, default_value = "all")]
    status: Selection<SettlementStatus>,

    /// Store label or all
    #[arg(long, default_value = "all")]
    store: Selection<String>,

    /// all, today, this_week or this_month
    #[arg(short, long, default_value = "all")]
    range: TimeRange,

    /// Evaluate time ranges at this moment instead of the current time
    #[arg(long, value_parser = parse_timestamp)]
    now: Option<DateTime<Utc>>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, conflicts_with = "save")]
    output: Option<PathBuf>,

    /// Write the report to the configured file name
    #[arg(long)]
    save: bool,

    /// Print the distinct store labels and exit
    #[arg(long)]
    list_stores: bool,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let ledger = match &args.input {
        Some(path) => {
            let file = File::open(path)?;
            let mut ledger = Ledger::new(config.fees);
            ledger.load_csv(BufReader::new(file))?;
            ledger
        }
        None => Ledger::with_sample(config.fees),
    };

    if args.list_stores {
        for store in ledger.store_options() {
            println!("{}", store);
        }
        return Ok(());
    }

    let clock = Clock::at(args.now.unwrap_or_else(Utc::now))
        .with_week_start(config.calendar.week_starts_on);
    let params = ViewParams {
        search: args.search,
        status: args.status,
        store: args.store,
        range: args.range,
    };

    let visible = ledger.view(&params, &clock)?;

    match ViewTotals::from_records(visible.iter().copied()) {
        Some(totals) => info!(
            "{} transactions, gross {}, fees {}, net {}",
            totals.count,
            totals.gross,
            totals.fees.total(),
            totals.net
        ),
        None => warn!("{} transactions, totals exceed the amount range", visible.len()),
    }

    let destination = if args.save {
        Some(PathBuf::from(&config.export.file_name))
    } else {
        args.output
    };

    match destination {
        Some(path) => {
            let file = File::create(&path)?;
            export::write_csv(BufWriter::new(file), visible)?;
            info!("Report written to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            export::write_csv(stdout.lock(), visible)?;
        }
    }

    Ok(())
}
