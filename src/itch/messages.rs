/// One variant per ITCH 5.0 tag byte. Every kind has a fixed body length;
/// kinds the reconstruction engine does not act on are still framed so the
/// stream stays aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    SystemEvent,
    StockDirectory,
    StockTradingAction,
    RegShoRestriction,
    MarketParticipantPosition,
    MwcbDeclineLevel,
    MwcbStatus,
    IpoQuotingPeriodUpdate,
    LuldAuctionCollar,
    OperationalHalt,
    AddOrder,
    AddOrderMpid,
    OrderExecuted,
    OrderExecutedWithPrice,
    OrderCancel,
    OrderDelete,
    OrderReplace,
    NonCrossTrade,
    CrossTrade,
    BrokenTrade,
    Noii,
    DirectListingCapitalRaise,
    RetailPriceImprovement,
}

impl MessageKind {
    pub const fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            b'S' => Self::SystemEvent,
            b'R' => Self::StockDirectory,
            b'H' => Self::StockTradingAction,
            b'Y' => Self::RegShoRestriction,
            b'L' => Self::MarketParticipantPosition,
            b'V' => Self::MwcbDeclineLevel,
            b'W' => Self::MwcbStatus,
            b'K' => Self::IpoQuotingPeriodUpdate,
            b'J' => Self::LuldAuctionCollar,
            b'h' => Self::OperationalHalt,
            b'A' => Self::AddOrder,
            b'F' => Self::AddOrderMpid,
            b'E' => Self::OrderExecuted,
            b'C' => Self::OrderExecutedWithPrice,
            b'X' => Self::OrderCancel,
            b'D' => Self::OrderDelete,
            b'U' => Self::OrderReplace,
            b'P' => Self::NonCrossTrade,
            b'Q' => Self::CrossTrade,
            b'B' => Self::BrokenTrade,
            b'I' => Self::Noii,
            b'O' => Self::DirectListingCapitalRaise,
            b'N' => Self::RetailPriceImprovement,
            _ => return None,
        })
    }

    pub const fn tag(self) -> u8 {
        match self {
            Self::SystemEvent => b'S',
            Self::StockDirectory => b'R',
            Self::StockTradingAction => b'H',
            Self::RegShoRestriction => b'Y',
            Self::MarketParticipantPosition => b'L',
            Self::MwcbDeclineLevel => b'V',
            Self::MwcbStatus => b'W',
            Self::IpoQuotingPeriodUpdate => b'K',
            Self::LuldAuctionCollar => b'J',
            Self::OperationalHalt => b'h',
            Self::AddOrder => b'A',
            Self::AddOrderMpid => b'F',
            Self::OrderExecuted => b'E',
            Self::OrderExecutedWithPrice => b'C',
            Self::OrderCancel => b'X',
            Self::OrderDelete => b'D',
            Self::OrderReplace => b'U',
            Self::NonCrossTrade => b'P',
            Self::CrossTrade => b'Q',
            Self::BrokenTrade => b'B',
            Self::Noii => b'I',
            Self::DirectListingCapitalRaise => b'O',
            Self::RetailPriceImprovement => b'N',
        }
    }

    /// Fixed body length in bytes, excluding the one-byte tag.
    pub const fn body_len(self) -> usize {
        match self {
            Self::SystemEvent => 11,
            Self::StockDirectory => 38,
            Self::StockTradingAction => 24,
            Self::RegShoRestriction => 19,
            Self::MarketParticipantPosition => 25,
            Self::MwcbDeclineLevel => 34,
            Self::MwcbStatus => 11,
            Self::IpoQuotingPeriodUpdate => 27,
            Self::LuldAuctionCollar => 34,
            Self::OperationalHalt => 20,
            Self::AddOrder => 35,
            Self::AddOrderMpid => 39,
            Self::OrderExecuted => 30,
            Self::OrderExecutedWithPrice => 35,
            Self::OrderCancel => 22,
            Self::OrderDelete => 18,
            Self::OrderReplace => 34,
            Self::NonCrossTrade => 43,
            Self::CrossTrade => 39,
            Self::BrokenTrade => 18,
            Self::Noii => 49,
            Self::DirectListingCapitalRaise => 47,
            Self::RetailPriceImprovement => 19,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub const fn from_indicator(byte: u8) -> Option<Self> {
        match byte {
            b'B' => Some(Self::Buy),
            b'S' => Some(Self::Sell),
            _ => None,
        }
    }
}

/// A decoded capture record. Every ITCH message carries the same 10-byte
/// header: stock locate, tracking number, and a 48-bit nanosecond-of-day
/// timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub kind: MessageKind,
    pub locate: u16,
    pub tracking: u16,
    pub timestamp_ns: u64,
    pub body: Body,
}

/// Decoded, unit-converted fields for the kinds the engine acts on. Prices
/// are already scaled from the 4-implied-decimal wire representation and
/// symbols trimmed of trailing pad spaces.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    StockDirectory {
        stock: String,
    },
    /// `A` and `F`; an attributed add carries `Some(mpid)`.
    AddOrder {
        order_ref: u64,
        side: Side,
        shares: u32,
        stock: String,
        price: f64,
        mpid: Option<String>,
    },
    OrderExecuted {
        order_ref: u64,
        shares: u32,
        match_no: u64,
    },
    OrderExecutedWithPrice {
        order_ref: u64,
        shares: u32,
        match_no: u64,
        printable: bool,
        price: f64,
    },
    OrderCancel {
        order_ref: u64,
        shares: u32,
    },
    OrderDelete {
        order_ref: u64,
    },
    OrderReplace {
        orig_ref: u64,
        new_ref: u64,
        shares: u32,
        price: f64,
    },
    NonCrossTrade {
        order_ref: u64,
        side: Side,
        shares: u32,
        stock: String,
        price: f64,
        match_no: u64,
    },
    CrossTrade {
        shares: u64,
        stock: String,
        price: f64,
        match_no: u64,
        cross_type: u8,
    },
    BrokenTrade {
        match_no: u64,
    },
    /// Administrative kinds consumed for framing only.
    Ignored,
}
