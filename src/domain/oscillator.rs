//! RSI-style momentum reversal strategy.
//!
//! The relative strength here is not Wilder's RSI. Over the trailing window
//! each close is compared with its predecessor inside the window (the first
//! element with itself); the raw close, not the change, is added to the gain
//! sum when it is >= its predecessor and to the loss sum otherwise. Both sums
//! are averaged over the window length.
//!
//! `rs = avg_gain / avg_loss` (0 when there are no losses), and the
//! oscillator is `100 - 100 / (1 + rs)`.

use tracing::{debug, trace};

use crate::domain::error::TickstratError;
use crate::domain::event::Event;
use crate::domain::order::{Order, StrategyId};
use crate::domain::position::Position;
use crate::domain::price_window::PriceWindow;
use crate::domain::strategy::{CancelBook, Strategy};

const NAME: &str = "oscillator";

#[derive(Debug, Clone, PartialEq)]
pub struct OscillatorParams {
    pub period: usize,
    pub overbought_limit: f64,
    pub oversold_limit: f64,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            period: 14,
            overbought_limit: 70.0,
            oversold_limit: 30.0,
        }
    }
}

impl OscillatorParams {
    pub fn validate(&self) -> Result<(), TickstratError> {
        if self.period == 0 {
            return Err(TickstratError::InvalidParameter {
                strategy: NAME,
                name: "period",
                reason: "period must be at least 1".into(),
            });
        }
        for (name, value) in [
            ("overbought_limit", self.overbought_limit),
            ("oversold_limit", self.oversold_limit),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(TickstratError::InvalidParameter {
                    strategy: NAME,
                    name,
                    reason: format!("{value} is outside [0, 100]"),
                });
            }
        }
        if self.oversold_limit >= self.overbought_limit {
            return Err(TickstratError::InvalidParameter {
                strategy: NAME,
                name: "oversold_limit",
                reason: "oversold_limit must be below overbought_limit".into(),
            });
        }
        Ok(())
    }
}

/// Relative strength over `prices` (oldest first).
pub fn relative_strength(prices: &[f64]) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }
    let mut gains = 0.0;
    let mut losses = 0.0;
    for (i, &price) in prices.iter().enumerate() {
        let previous = if i == 0 { price } else { prices[i - 1] };
        if price >= previous {
            gains += price;
        } else {
            losses += price;
        }
    }
    let n = prices.len() as f64;
    let avg_gain = gains / n;
    let avg_loss = losses / n;
    if avg_loss == 0.0 {
        0.0
    } else {
        avg_gain / avg_loss
    }
}

/// Oscillator value in `[0, 100]` for non-negative prices.
pub fn oscillator_value(prices: &[f64]) -> f64 {
    100.0 - 100.0 / (1.0 + relative_strength(prices))
}

#[derive(Debug)]
pub struct OscillatorStrategy {
    params: OscillatorParams,
    prices: PriceWindow,
    next_position: Position,
    book: CancelBook,
}

impl OscillatorStrategy {
    pub fn new(params: OscillatorParams) -> Result<Self, TickstratError> {
        params.validate()?;
        Ok(Self {
            prices: PriceWindow::new(params.period),
            params,
            next_position: Position::Neutral,
            book: CancelBook::new(StrategyId::next()),
        })
    }

    pub fn params(&self) -> &OscillatorParams {
        &self.params
    }

    pub fn next_position(&self) -> Position {
        self.next_position
    }

    /// Oscillator over the current window.
    pub fn value(&self) -> f64 {
        let window: Vec<f64> = self.prices.iter().collect();
        oscillator_value(&window)
    }

    fn move_to(&mut self, target: Position, instrument: &str) -> Vec<Order> {
        let count = self.next_position.orders_to(target);
        let orders = match target.entry_side() {
            Some(side) => (0..count).map(|_| Order::market(instrument, side)).collect(),
            None => Vec::new(),
        };
        if !orders.is_empty() {
            debug!(
                instrument,
                from = ?self.next_position,
                to = ?target,
                orders = orders.len(),
                "oscillator position change"
            );
        }
        self.next_position = target;
        orders
    }
}

impl Strategy for OscillatorStrategy {
    fn name(&self) -> &str {
        NAME
    }

    fn cancel_book(&self) -> &CancelBook {
        &self.book
    }

    fn cancel_book_mut(&mut self) -> &mut CancelBook {
        &mut self.book
    }

    fn push(&mut self, event: &Event) -> Vec<Order> {
        self.prices.push(event.close());

        if !self.prices.is_full() {
            trace!(have = self.prices.len(), need = self.params.period, "oscillator warming up");
            return Vec::new();
        }

        let value = self.value();
        if value >= self.params.overbought_limit {
            self.move_to(Position::Long, event.instrument())
        } else if value <= self.params.oversold_limit {
            self.move_to(Position::Short, event.instrument())
        } else {
            Vec::new()
        }
    }
}
