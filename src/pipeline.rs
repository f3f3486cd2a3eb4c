//! End-to-end run orchestration: map the capture, drive the decoder through
//! the engine in one linear pass, derive per-security VWAP, export.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::info;
use memmap2::Mmap;
use serde::Serialize;

use crate::engine::{ReconEngine, ReconStats, SideFilter};
use crate::export;
use crate::itch::Decoder;
use crate::vwap::{hourly_vwap, VwapSample};

pub const VWAP_FILE: &str = "itch_vwap.csv";
pub const TRADES_FILE: &str = "raw_trades.csv";
pub const OPEN_ORDERS_FILE: &str = "open_orders.csv";

/// Explicit run configuration; all paths and policies are passed in, there
/// is no process-global state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// ITCH 5.0 capture, plain or `.gz` compressed.
    pub input: PathBuf,
    /// Directory receiving the CSV outputs; created if missing.
    pub out_dir: PathBuf,
    pub side_filter: SideFilter,
    /// Stop after N messages (for quick checks).
    pub limit: Option<u64>,
    /// Also export the surviving trade ledger and open-order set.
    pub export_raw: bool,
    /// Write a pretty-printed JSON run summary here on completion.
    pub summary: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn new(input: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            out_dir: out_dir.into(),
            side_filter: SideFilter::default(),
            limit: None,
            export_raw: false,
            summary: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input: String,
    pub stats: ReconStats,
    pub securities: usize,
    pub trades: usize,
    pub open_orders: usize,
    pub vwap_samples: usize,
    pub elapsed_ms: u64,
}

/// Either a memory map of the raw capture or a decompressed buffer for
/// gzipped ones; both decode from a flat byte slice.
enum Capture {
    Mapped(Mmap),
    Buffered(Vec<u8>),
}

impl Capture {
    fn bytes(&self) -> &[u8] {
        match self {
            Capture::Mapped(map) => map,
            Capture::Buffered(buf) => buf,
        }
    }
}

fn open_capture(path: &Path) -> Result<Capture> {
    let file = File::open(path).with_context(|| format!("open input {}", path.display()))?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        let mut buf = Vec::new();
        GzDecoder::new(file)
            .read_to_end(&mut buf)
            .with_context(|| format!("decompress input {}", path.display()))?;
        return Ok(Capture::Buffered(buf));
    }
    let map = unsafe { Mmap::map(&file) }
        .with_context(|| format!("map input {}", path.display()))?;
    Ok(Capture::Mapped(map))
}

pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    let start = Instant::now();
    let capture = open_capture(&config.input)?;
    let bytes = capture.bytes();
    info!(
        "reconstructing {} ({} bytes)",
        config.input.display(),
        bytes.len()
    );

    let mut engine = ReconEngine::new(config.side_filter);
    let mut decoder = Decoder::new(bytes);
    loop {
        if config
            .limit
            .is_some_and(|limit| engine.stats().messages >= limit)
        {
            break;
        }
        let Some(msg) = decoder
            .next()
            .with_context(|| format!("decode failed at byte {}", decoder.position()))?
        else {
            break;
        };
        engine.apply(&msg);
    }

    let mut series: BTreeMap<u16, Vec<VwapSample>> = BTreeMap::new();
    for (locate, ledger) in engine.ledgers() {
        let samples = hourly_vwap(ledger);
        if !samples.is_empty() {
            series.insert(*locate, samples);
        }
    }

    std::fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("create output dir {}", config.out_dir.display()))?;
    export::write_vwap_csv(&config.out_dir.join(VWAP_FILE), engine.directory(), &series)?;
    if config.export_raw {
        export::write_trades_csv(
            &config.out_dir.join(TRADES_FILE),
            engine.directory(),
            engine.ledgers(),
        )?;
        export::write_open_orders_csv(
            &config.out_dir.join(OPEN_ORDERS_FILE),
            engine.directory(),
            engine.books(),
        )?;
    }

    let summary = RunSummary {
        input: config.input.display().to_string(),
        stats: engine.stats().clone(),
        securities: engine.directory().len(),
        trades: engine.ledgers().values().map(|l| l.len()).sum(),
        open_orders: engine.books().values().map(|b| b.len()).sum(),
        vwap_samples: series.values().map(|s| s.len()).sum(),
        elapsed_ms: start.elapsed().as_millis() as u64,
    };
    if let Some(path) = config.summary.as_ref() {
        write_summary_json(path, &summary)?;
    }
    info!(
        "done: {} messages, {} trades, {} open orders in {} ms",
        summary.stats.messages, summary.trades, summary.open_orders, summary.elapsed_ms
    );
    Ok(summary)
}

pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let data = serde_json::to_vec_pretty(summary)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, data)?;
    std::fs::rename(tmp, path)?;
    Ok(())
}
