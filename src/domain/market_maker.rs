//! Cross-listed market maker.
//!
//! Quotes a synthetic instrument around a fair value derived from two
//! underlying legs, replacing both quotes on every usable tick, and hedges
//! each fill of the synthetic with one unit in each leg.
//!
//! `fair = (leg_a * factor / leg_b) * slope + intercept`

use tracing::{debug, trace};

use crate::domain::error::TickstratError;
use crate::domain::event::Event;
use crate::domain::order::{Order, OrderId, Side, StrategyId};
use crate::domain::strategy::{CancelBook, Fill, Strategy};

const NAME: &str = "market_maker";

/// Linear calibration from the two legs to the synthetic's price.
#[derive(Debug, Clone, PartialEq)]
pub struct FairValueModel {
    pub factor: f64,
    pub slope: f64,
    pub intercept: f64,
}

impl Default for FairValueModel {
    fn default() -> Self {
        Self {
            factor: 2.0,
            slope: 1.02,
            intercept: -0.3,
        }
    }
}

impl FairValueModel {
    /// `None` when `leg_b` is zero or the result is not finite.
    pub fn fair_value(&self, leg_a: f64, leg_b: f64) -> Option<f64> {
        if leg_b == 0.0 {
            return None;
        }
        let fair = (leg_a * self.factor / leg_b) * self.slope + self.intercept;
        fair.is_finite().then_some(fair)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketMakerParams {
    pub spread: f64,
    pub model: FairValueModel,
    pub leg_a: String,
    pub leg_b: String,
    pub synthetic: String,
}

impl Default for MarketMakerParams {
    fn default() -> Self {
        Self {
            spread: 50.0,
            model: FairValueModel::default(),
            leg_a: "PETR3".into(),
            leg_b: "USDBRL".into(),
            synthetic: "PBR".into(),
        }
    }
}

impl MarketMakerParams {
    pub fn validate(&self) -> Result<(), TickstratError> {
        if !self.spread.is_finite() || self.spread < 0.0 {
            return Err(TickstratError::InvalidParameter {
                strategy: NAME,
                name: "spread",
                reason: format!("{} is not a non-negative number", self.spread),
            });
        }
        for (name, value) in [
            ("factor", self.model.factor),
            ("slope", self.model.slope),
            ("intercept", self.model.intercept),
        ] {
            if !value.is_finite() {
                return Err(TickstratError::InvalidParameter {
                    strategy: NAME,
                    name,
                    reason: format!("{value} is not finite"),
                });
            }
        }
        let names = [&self.leg_a, &self.leg_b, &self.synthetic];
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(TickstratError::InvalidParameter {
                strategy: NAME,
                name: "instruments",
                reason: "instrument names must not be empty".into(),
            });
        }
        if self.leg_a == self.leg_b || self.leg_a == self.synthetic || self.leg_b == self.synthetic {
            return Err(TickstratError::InvalidParameter {
                strategy: NAME,
                name: "instruments",
                reason: "legs and synthetic must be distinct instruments".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct MarketMakerStrategy {
    params: MarketMakerParams,
    leg_a_price: Option<f64>,
    leg_b_price: Option<f64>,
    last_buy_order: Option<OrderId>,
    last_sell_order: Option<OrderId>,
    book: CancelBook,
}

impl MarketMakerStrategy {
    pub fn new(params: MarketMakerParams) -> Result<Self, TickstratError> {
        params.validate()?;
        Ok(Self {
            params,
            leg_a_price: None,
            leg_b_price: None,
            last_buy_order: None,
            last_sell_order: None,
            book: CancelBook::new(StrategyId::next()),
        })
    }

    pub fn params(&self) -> &MarketMakerParams {
        &self.params
    }

    /// Ids of the currently resting (buy, sell) quotes.
    pub fn resting_quotes(&self) -> (Option<OrderId>, Option<OrderId>) {
        (self.last_buy_order, self.last_sell_order)
    }

    /// Fair value from the latest leg prices. A zero price counts as unknown.
    pub fn fair_value(&self) -> Option<f64> {
        let a = self.leg_a_price.filter(|p| *p != 0.0)?;
        let b = self.leg_b_price.filter(|p| *p != 0.0)?;
        self.params.model.fair_value(a, b)
    }

    fn requote(&mut self, fair: f64) -> Vec<Order> {
        let owner = self.id();
        if let Some(id) = self.last_buy_order.take() {
            self.cancel(owner, id);
        }
        if let Some(id) = self.last_sell_order.take() {
            self.cancel(owner, id);
        }

        let synthetic = self.params.synthetic.as_str();
        let buy = Order::new(synthetic, Side::Buy, fair - self.params.spread);
        let sell = Order::new(synthetic, Side::Sell, fair + self.params.spread);
        debug!(
            instrument = synthetic,
            fair,
            bid = buy.limit_price(),
            ask = sell.limit_price(),
            "requoting"
        );
        self.last_buy_order = Some(buy.id());
        self.last_sell_order = Some(sell.id());
        vec![buy, sell]
    }
}

impl Strategy for MarketMakerStrategy {
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
        let instrument = event.instrument();
        if instrument == self.params.leg_a {
            self.leg_a_price = Some(event.close());
        } else if instrument == self.params.leg_b {
            self.leg_b_price = Some(event.close());
        }

        match self.fair_value() {
            Some(fair) => self.requote(fair),
            None => {
                trace!(instrument, "fair value unavailable, not quoting");
                Vec::new()
            }
        }
    }

    /// Buying the synthetic sells leg A and buys leg B; selling it does the
    /// reverse. Only fills of the synthetic are hedged.
    fn fill(&mut self, fill: &Fill) -> Vec<Order> {
        if fill.instrument != self.params.synthetic {
            return Vec::new();
        }
        let leg_a_side = if fill.quantity > 0.0 { Side::Sell } else { Side::Buy };
        debug!(
            instrument = %fill.instrument,
            quantity = fill.quantity,
            status = ?fill.status,
            "hedging synthetic fill"
        );
        vec![
            Order::market(self.params.leg_a.as_str(), leg_a_side),
            Order::market(self.params.leg_b.as_str(), leg_a_side.opposite()),
        ]
    }
}
