use std::collections::BTreeMap;

use log::{debug, warn};
use serde::Serialize;

use crate::book::{OrderBook, Reduce, RestingOrder};
use crate::directory::SymbolDirectory;
use crate::itch::{Body, Message, Side};
use crate::ledger::{TradeLedger, TradeRecord};

/// Which sides of Add / non-cross trade events are tracked. The original
/// feed handler followed buy-side interest only; keep that the default but
/// configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SideFilter {
    #[default]
    Buy,
    Sell,
    Both,
}

impl SideFilter {
    pub fn tracks(self, side: Side) -> bool {
        match self {
            SideFilter::Buy => side == Side::Buy,
            SideFilter::Sell => side == Side::Sell,
            SideFilter::Both => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ApplyStatus {
    Applied,
    Skipped,
}

/// Counters for the run. State anomalies are tallied here and logged; none
/// of them abort the stream.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ReconStats {
    pub messages: u64,
    pub applied: u64,
    pub skipped: u64,
    /// Add / non-cross events dropped by the side filter.
    pub filtered: u64,
    pub duplicate_adds: u64,
    pub unknown_orders: u64,
    pub duplicate_matches: u64,
    pub unknown_matches: u64,
    /// Executions or cancels exceeding the remaining resting quantity;
    /// clamped to zero rather than wrapped.
    pub overfills: u64,
}

/// Stateful reconstruction engine: routes each decoded message to the
/// per-security order books, trade ledgers, and the symbol directory.
///
/// Strictly sequential; events are applied in input order with no lookahead.
/// Securities are fully independent of one another.
#[derive(Debug, Default)]
pub struct ReconEngine {
    filter: SideFilter,
    books: BTreeMap<u16, OrderBook>,
    ledgers: BTreeMap<u16, TradeLedger>,
    directory: SymbolDirectory,
    stats: ReconStats,
}

impl ReconEngine {
    pub fn new(filter: SideFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn books(&self) -> &BTreeMap<u16, OrderBook> {
        &self.books
    }

    pub fn ledgers(&self) -> &BTreeMap<u16, TradeLedger> {
        &self.ledgers
    }

    pub fn directory(&self) -> &SymbolDirectory {
        &self.directory
    }

    pub fn stats(&self) -> &ReconStats {
        &self.stats
    }

    pub fn apply(&mut self, msg: &Message) -> ApplyStatus {
        self.stats.messages += 1;
        let status = self.route(msg);
        match status {
            ApplyStatus::Applied => self.stats.applied += 1,
            ApplyStatus::Skipped => self.stats.skipped += 1,
        }
        status
    }

    fn route(&mut self, msg: &Message) -> ApplyStatus {
        let locate = msg.locate;
        let ts = msg.timestamp_ns;
        match msg.body {
            Body::StockDirectory { ref stock } => {
                self.directory.insert(locate, stock.clone());
                ApplyStatus::Applied
            }
            Body::AddOrder {
                order_ref,
                side,
                shares,
                price,
                ..
            } => {
                if !self.filter.tracks(side) {
                    self.stats.filtered += 1;
                    return ApplyStatus::Skipped;
                }
                let order = RestingOrder {
                    timestamp_ns: ts,
                    shares,
                    price,
                };
                if !self.book(locate).insert(order_ref, order) {
                    self.stats.duplicate_adds += 1;
                    warn!("[{locate}] add: order ref {order_ref} already on the book");
                    return ApplyStatus::Skipped;
                }
                ApplyStatus::Applied
            }
            Body::OrderExecuted {
                order_ref,
                shares,
                match_no,
            } => match self.take_down(locate, order_ref, shares) {
                Some(price) => {
                    self.record_trade(
                        locate,
                        match_no,
                        TradeRecord {
                            timestamp_ns: ts,
                            shares: shares.into(),
                            price,
                        },
                    );
                    ApplyStatus::Applied
                }
                None => ApplyStatus::Skipped,
            },
            Body::OrderExecutedWithPrice {
                order_ref,
                shares,
                match_no,
                printable,
                price,
            } => match self.take_down(locate, order_ref, shares) {
                Some(_resting_price) => {
                    // Non-printable executions fold into a later bulk print;
                    // recording them would double count volume.
                    if printable {
                        self.record_trade(
                            locate,
                            match_no,
                            TradeRecord {
                                timestamp_ns: ts,
                                shares: shares.into(),
                                price,
                            },
                        );
                    }
                    ApplyStatus::Applied
                }
                None => ApplyStatus::Skipped,
            },
            Body::OrderCancel { order_ref, shares } => {
                match self.take_down(locate, order_ref, shares) {
                    Some(_) => ApplyStatus::Applied,
                    None => ApplyStatus::Skipped,
                }
            }
            Body::OrderDelete { order_ref } => {
                if self.book(locate).remove(order_ref).is_none() {
                    self.stats.unknown_orders += 1;
                    debug!("[{locate}] delete: order ref {order_ref} not on the book");
                    return ApplyStatus::Skipped;
                }
                ApplyStatus::Applied
            }
            Body::OrderReplace {
                orig_ref,
                new_ref,
                shares,
                price,
            } => {
                let order = RestingOrder {
                    timestamp_ns: ts,
                    shares,
                    price,
                };
                if !self.book(locate).replace(orig_ref, new_ref, order) {
                    self.stats.unknown_orders += 1;
                    debug!("[{locate}] replace: order ref {orig_ref} not on the book");
                    return ApplyStatus::Skipped;
                }
                ApplyStatus::Applied
            }
            Body::NonCrossTrade {
                side,
                shares,
                price,
                match_no,
                ..
            } => {
                if self.ledger(locate).contains(match_no) {
                    self.stats.duplicate_matches += 1;
                    warn!("[{locate}] non-cross trade: match {match_no} already recorded");
                    return ApplyStatus::Skipped;
                }
                if !self.filter.tracks(side) {
                    self.stats.filtered += 1;
                    return ApplyStatus::Skipped;
                }
                self.record_trade(
                    locate,
                    match_no,
                    TradeRecord {
                        timestamp_ns: ts,
                        shares: shares.into(),
                        price,
                    },
                );
                ApplyStatus::Applied
            }
            Body::CrossTrade {
                shares,
                price,
                match_no,
                ..
            } => {
                if self.ledger(locate).contains(match_no) {
                    self.stats.duplicate_matches += 1;
                    warn!("[{locate}] cross trade: match {match_no} already recorded");
                    return ApplyStatus::Skipped;
                }
                self.record_trade(
                    locate,
                    match_no,
                    TradeRecord {
                        timestamp_ns: ts,
                        shares,
                        price,
                    },
                );
                ApplyStatus::Applied
            }
            Body::BrokenTrade { match_no } => {
                if self.ledger(locate).remove(match_no).is_none() {
                    self.stats.unknown_matches += 1;
                    debug!("[{locate}] broken trade: match {match_no} not in ledger");
                    return ApplyStatus::Skipped;
                }
                ApplyStatus::Applied
            }
            Body::Ignored => ApplyStatus::Skipped,
        }
    }

    /// Shared quantity bookkeeping for execute / execute-with-price / cancel.
    /// Returns the resting price when the order was found, None (counted,
    /// stream continues) when it was not — indistinguishable from a
    /// reference the side filter never tracked.
    fn take_down(&mut self, locate: u16, order_ref: u64, qty: u32) -> Option<f64> {
        match self.book(locate).reduce(order_ref, qty) {
            Some(Reduce::Overfill { price }) => {
                self.stats.overfills += 1;
                warn!(
                    "[{locate}] order ref {order_ref}: decrement {qty} exceeds remaining shares, clamped to zero"
                );
                Some(price)
            }
            Some(outcome) => Some(outcome.price()),
            None => {
                self.stats.unknown_orders += 1;
                debug!("[{locate}] order ref {order_ref} not on the book");
                None
            }
        }
    }

    fn record_trade(&mut self, locate: u16, match_no: u64, trade: TradeRecord) {
        if !self.ledger(locate).insert(match_no, trade) {
            self.stats.duplicate_matches += 1;
            warn!("[{locate}] match {match_no} already recorded, print dropped");
        }
    }

    fn book(&mut self, locate: u16) -> &mut OrderBook {
        self.books.entry(locate).or_default()
    }

    fn ledger(&mut self, locate: u16) -> &mut TradeLedger {
        self.ledgers.entry(locate).or_default()
    }
}
