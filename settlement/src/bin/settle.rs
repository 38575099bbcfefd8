//! Trip settlement CLI
//!
//! Reads a trip snapshot and prints balances, the suggested payment plan and
//! the payments nobody has started yet.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use settlement::{Config, SettlementEngine, SettlementPolicy, TripSummary};
use std::{
    fmt::Display,
    fs::File,
    io::{stdout, BufReader, Write},
    path::PathBuf,
};
use trip_ledger::TripSnapshot;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Trip snapshot JSON file
    snapshot: PathBuf,

    /// Which settlements count towards balances (overrides the config file)
    #[arg(short, long)]
    policy: Option<SettlementPolicy>,

    /// TOML config file (defaults to TRIPSPLIT_* environment variables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        (match self {
            Self::Json => "json",
            Self::Text => "text",
        })
        .fmt(f)
    }
}

impl Args {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => Config::from_env().context("loading config from environment")?,
        };
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        Ok(config)
    }

    fn read(&self) -> anyhow::Result<TripSnapshot> {
        let reader = BufReader::new(
            File::open(&self.snapshot)
                .with_context(|| format!("opening {}", self.snapshot.display()))?,
        );
        serde_json::from_reader(reader)
            .with_context(|| format!("parsing trip snapshot {}", self.snapshot.display()))
    }
}

fn write_text(summary: &TripSummary, out: &mut impl Write) -> std::io::Result<()> {
    let currency = summary.currency;

    writeln!(out, "Trip {} ({} policy)", summary.trip_id, summary.policy)?;
    writeln!(out)?;
    writeln!(out, "Balances:")?;
    for (member, balance) in &summary.balances {
        writeln!(out, "  {:<16} {}", member, currency.format(*balance))?;
    }

    writeln!(out)?;
    if summary.plan.is_empty() {
        writeln!(out, "Everyone is settled up.")?;
    } else {
        writeln!(out, "Suggested payments:")?;
        for transfer in &summary.plan {
            let marker = if summary.outstanding.contains(transfer) {
                ""
            } else {
                "  (initiated)"
            };
            writeln!(
                out,
                "  {} pays {} {}{}",
                transfer.from,
                transfer.to,
                currency.format(transfer.amount),
                marker
            )?;
        }
    }

    if !summary.imbalance.is_zero() {
        writeln!(out)?;
        writeln!(
            out,
            "Warning: balances are off by {}",
            currency.format(summary.imbalance)
        )?;
    }
    Ok(())
}

pub fn main() -> anyhow::Result<()> {
    // Logs on stderr, summary on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.config()?;
    let snapshot = args.read()?;

    tracing::info!(
        trip_id = %snapshot.trip_id,
        expenses = snapshot.expenses.len(),
        settlements = snapshot.settlements.len(),
        "Loaded trip snapshot"
    );

    let engine = SettlementEngine::new(config)?;
    let summary = engine.summarize(&snapshot)?;

    let mut out = stdout().lock();
    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &summary)?;
            writeln!(out)?;
        }
        OutputFormat::Text => write_text(&summary, &mut out)?,
    }
    Ok(())
}
