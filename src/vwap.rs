//! Hour-bucketed cumulative VWAP over a security's final trade ledger.
//!
//! The accumulators never reset between buckets: each emitted sample is the
//! running volume-weighted average of every trade from the start of the
//! ledger through the end of that bucket, sampled at hour boundaries. A true
//! per-hour VWAP would be a separate metric with its own accumulators.

use std::collections::BTreeMap;

use crate::ledger::TradeLedger;

pub const NANOS_PER_HOUR: u64 = 3_600_000_000_000;

/// 1-based ceiling hour bucket of a nanosecond-of-day timestamp.
pub fn hour_bucket(timestamp_ns: u64) -> u32 {
    (timestamp_ns.div_ceil(NANOS_PER_HOUR)) as u32
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VwapSample {
    pub bucket: u32,
    pub vwap: f64,
}

/// One pass over the ledger groups trades into hour buckets; a second walk
/// in ascending bucket order folds them into the running accumulators and
/// emits one sample per non-empty bucket. Empty buckets produce no sample;
/// gaps are not filled.
pub fn hourly_vwap(ledger: &TradeLedger) -> Vec<VwapSample> {
    let mut buckets: BTreeMap<u32, (f64, u64)> = BTreeMap::new();
    for (_match_no, trade) in ledger.iter() {
        let slot = buckets.entry(hour_bucket(trade.timestamp_ns)).or_default();
        slot.0 += trade.price * trade.shares as f64;
        slot.1 += trade.shares;
    }

    let mut out = Vec::with_capacity(buckets.len());
    let mut cum_pv = 0.0;
    let mut cum_vol: u64 = 0;
    for (bucket, (pv, vol)) in buckets {
        cum_pv += pv;
        cum_vol += vol;
        let vwap = if cum_vol == 0 {
            0.0
        } else {
            cum_pv / cum_vol as f64
        };
        out.push(VwapSample { bucket, vwap });
    }
    out
}
