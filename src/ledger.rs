use std::collections::BTreeMap;

/// A realized trade print.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeRecord {
    pub timestamp_ns: u64,
    pub shares: u64,
    pub price: f64,
}

/// Realized trades for one security, keyed by match number. Match numbers
/// are unique within a security for the life of the ledger; a duplicate
/// insert is rejected, never merged.
#[derive(Debug, Default, Clone)]
pub struct TradeLedger {
    trades: BTreeMap<u64, TradeRecord>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false, leaving the existing record untouched, if the match
    /// number is already present.
    pub fn insert(&mut self, match_no: u64, trade: TradeRecord) -> bool {
        if self.trades.contains_key(&match_no) {
            return false;
        }
        self.trades.insert(match_no, trade);
        true
    }

    pub fn contains(&self, match_no: u64) -> bool {
        self.trades.contains_key(&match_no)
    }

    pub fn get(&self, match_no: u64) -> Option<&TradeRecord> {
        self.trades.get(&match_no)
    }

    /// Broken trade: the print is voided and removed outright.
    pub fn remove(&mut self, match_no: u64) -> Option<TradeRecord> {
        self.trades.remove(&match_no)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u64, &TradeRecord)> {
        self.trades.iter()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}
