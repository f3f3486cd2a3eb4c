use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;

use tapebook::{run, PipelineConfig, SideFilter};

#[derive(Parser, Debug)]
#[command(about = "Reconstruct ITCH 5.0 order books and hourly cumulative VWAP from a capture")]
struct Args {
    /// Path to the ITCH 5.0 capture file (optionally .gz compressed)
    #[arg(long)]
    input: PathBuf,

    /// Directory for CSV outputs
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Which sides to track: buy, sell, or both
    #[arg(long, default_value = "buy")]
    sides: String,

    /// Stop after N messages (for quick checks)
    #[arg(long)]
    limit: Option<u64>,

    /// Also export raw_trades.csv and open_orders.csv
    #[arg(long)]
    raw: bool,

    /// Write a JSON run summary to this path on completion
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = PipelineConfig::new(args.input, args.out_dir);
    config.side_filter = parse_sides(&args.sides)?;
    config.limit = args.limit;
    config.export_raw = args.raw;
    config.summary = args.summary;

    let summary = run(&config)?;
    let stats = &summary.stats;
    let rate = if summary.elapsed_ms > 0 {
        stats.messages as f64 * 1_000.0 / summary.elapsed_ms as f64
    } else {
        stats.messages as f64
    };
    println!(
        "messages={} applied={} skipped={} filtered={} securities={} trades={} open_orders={} vwap_samples={} rate={rate:.2} msg/s",
        stats.messages,
        stats.applied,
        stats.skipped,
        stats.filtered,
        summary.securities,
        summary.trades,
        summary.open_orders,
        summary.vwap_samples,
    );
    let anomalies = stats.duplicate_adds
        + stats.unknown_orders
        + stats.duplicate_matches
        + stats.unknown_matches
        + stats.overfills;
    if anomalies > 0 {
        println!(
            "anomalies: duplicate_adds={} unknown_orders={} duplicate_matches={} unknown_matches={} overfills={}",
            stats.duplicate_adds,
            stats.unknown_orders,
            stats.duplicate_matches,
            stats.unknown_matches,
            stats.overfills,
        );
    }
    Ok(())
}

fn parse_sides(raw: &str) -> Result<SideFilter> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "buy" => Ok(SideFilter::Buy),
        "sell" => Ok(SideFilter::Sell),
        "both" => Ok(SideFilter::Both),
        other => Err(anyhow!("invalid --sides value: {other} (expected buy, sell, or both)")),
    }
}
