//! Market tick delivered to strategies.

/// An immutable price tick for one instrument.
///
/// `price` is `[open, high, low, close]`. Ordering between events is implied
/// by arrival order; the event carries no timestamp of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    instrument: String,
    price: [f64; 4],
}

impl Event {
    pub fn new(instrument: impl Into<String>, price: [f64; 4]) -> Self {
        Self {
            instrument: instrument.into(),
            price,
        }
    }

    /// Tick whose open, high, low and close are all `close`.
    pub fn from_close(instrument: impl Into<String>, close: f64) -> Self {
        Self::new(instrument, [close; 4])
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn price(&self) -> &[f64; 4] {
        &self.price
    }

    pub fn close(&self) -> f64 {
        self.price[3]
    }
}
