//! CSV export of the reconstructed state: the cumulative VWAP series plus
//! optional diagnostic dumps of the surviving trade ledger and open orders.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use crate::book::OrderBook;
use crate::directory::SymbolDirectory;
use crate::ledger::TradeLedger;
use crate::vwap::VwapSample;

fn csv_writer(path: &Path) -> Result<csv::Writer<File>> {
    let file =
        File::create(path).with_context(|| format!("create output {}", path.display()))?;
    Ok(csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file))
}

/// `name,hour,vwap` — one row per (security, bucket) sample, securities in
/// locate order.
pub fn write_vwap_csv(
    path: &Path,
    directory: &SymbolDirectory,
    series: &BTreeMap<u16, Vec<VwapSample>>,
) -> Result<()> {
    let mut writer = csv_writer(path)?;
    writer.write_record(["name", "hour", "vwap"])?;
    for (locate, samples) in series {
        let name = directory.display(*locate);
        for sample in samples {
            writer.write_record(&[
                name.clone(),
                sample.bucket.to_string(),
                sample.vwap.to_string(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// `name,ts,vol,price` — the trade ledger as it survived broken-trade
/// removal, in (locate, match number) order.
pub fn write_trades_csv(
    path: &Path,
    directory: &SymbolDirectory,
    ledgers: &BTreeMap<u16, TradeLedger>,
) -> Result<()> {
    let mut writer = csv_writer(path)?;
    writer.write_record(["name", "ts", "vol", "price"])?;
    for (locate, ledger) in ledgers {
        let name = directory.display(*locate);
        for (_match_no, trade) in ledger.iter() {
            writer.write_record(&[
                name.clone(),
                trade.timestamp_ns.to_string(),
                trade.shares.to_string(),
                trade.price.to_string(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// `name,ts,vol,price` — orders still resting when the capture ended.
pub fn write_open_orders_csv(
    path: &Path,
    directory: &SymbolDirectory,
    books: &BTreeMap<u16, OrderBook>,
) -> Result<()> {
    let mut writer = csv_writer(path)?;
    writer.write_record(["name", "ts", "vol", "price"])?;
    for (locate, book) in books {
        let name = directory.display(*locate);
        for (_order_ref, order) in book.iter() {
            writer.write_record(&[
                name.clone(),
                order.timestamp_ns.to_string(),
                order.shares.to_string(),
                order.price.to_string(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}
