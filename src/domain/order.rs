//! Order intents and the identifiers handed out with them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ORDER_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_STRATEGY_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque order identity. Unique for the lifetime of the process and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(u64);

impl OrderId {
    fn next() -> Self {
        Self(NEXT_ORDER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ord-{}", self.0)
    }
}

/// Identity of a strategy instance, used as the owner of cancellation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrategyId(u64);

impl StrategyId {
    pub fn next() -> Self {
        Self(NEXT_STRATEGY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "strat-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// `+1` is a buy, `-1` a sell; anything else (including 0) is not a side.
    pub fn from_sign(sign: i64) -> Option<Side> {
        match sign {
            1 => Some(Side::Buy),
            -1 => Some(Side::Sell),
            _ => None,
        }
    }

    pub fn sign(self) -> i64 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// A unit-size order intent. A `limit_price` of 0 means a market order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    instrument: String,
    side: Side,
    limit_price: f64,
}

impl Order {
    pub fn new(instrument: impl Into<String>, side: Side, limit_price: f64) -> Self {
        Self {
            id: OrderId::next(),
            instrument: instrument.into(),
            side,
            limit_price,
        }
    }

    pub fn market(instrument: impl Into<String>, side: Side) -> Self {
        Self::new(instrument, side, 0.0)
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn limit_price(&self) -> f64 {
        self.limit_price
    }

    pub fn is_market(&self) -> bool {
        self.limit_price == 0.0
    }

    /// Signed unit quantity: +1 for a buy, -1 for a sell.
    pub fn quantity(&self) -> i64 {
        self.side.sign()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_market() {
            write!(f, "{} {} {} @ MKT", self.id, self.side, self.instrument)
        } else {
            write!(
                f,
                "{} {} {} @ {:.4}",
                self.id, self.side, self.instrument, self.limit_price
            )
        }
    }
}
