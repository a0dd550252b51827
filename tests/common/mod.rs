#![allow(dead_code)]

use std::collections::HashMap;

use chrono::NaiveDate;
use tickstrat::domain::error::TickstratError;
use tickstrat::domain::event::Event;
pub use tickstrat::domain::order::{Order, OrderId};
use tickstrat::domain::price_bar::PriceBar;
use tickstrat::domain::return_category::ReturnCategory;
use tickstrat::domain::strategy::Strategy;
use tickstrat::ports::classifier_port::ClassifierPort;
use tickstrat::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, instrument: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(instrument.to_string(), bars);
        self
    }

    pub fn with_error(mut self, instrument: &str, reason: &str) -> Self {
        self.errors.insert(instrument.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self, instrument: &str) -> Result<Vec<PriceBar>, TickstratError> {
        if let Some(reason) = self.errors.get(instrument) {
            return Err(TickstratError::Data {
                source_name: instrument.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(instrument).cloned().unwrap_or_default())
    }

    fn instruments(&self) -> Vec<String> {
        let mut names: Vec<String> = self.data.keys().chain(self.errors.keys()).cloned().collect();
        names.sort();
        names.dedup();
        names
    }
}

/// Classifier that always predicts the same category.
pub struct FixedClassifier(pub ReturnCategory);

impl ClassifierPort for FixedClassifier {
    fn predict(&self, _window: &[f64; 3]) -> ReturnCategory {
        self.0
    }
}

/// Classifier that predicts the category of the return between the last two
/// closes of the window.
pub struct MomentumClassifier;

impl ClassifierPort for MomentumClassifier {
    fn predict(&self, window: &[f64; 3]) -> ReturnCategory {
        ReturnCategory::between(Some(window[1]), window[2])
    }
}

/// What a runner observed, in the order it observed it.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Cancel(OrderId),
    Submit(Order),
}

/// Minimal sequential runner: pushes an event and records cancellations
/// before the orders the push returned.
pub fn push_and_record(strategy: &mut dyn Strategy, event: &Event) -> Vec<Action> {
    let orders = strategy.push(event);
    let mut actions: Vec<Action> = strategy
        .take_cancellations()
        .into_iter()
        .map(|c| Action::Cancel(c.order_id))
        .collect();
    actions.extend(orders.into_iter().map(Action::Submit));
    actions
}

pub fn closes(instrument: &str, prices: &[f64]) -> Vec<Event> {
    prices.iter().map(|p| Event::from_close(instrument, *p)).collect()
}

/// Rises +2, +2, -1 repeatedly for 20 ticks from 100, then falls by 2 for 20 ticks.
pub fn zigzag_up_then_down() -> Vec<f64> {
    let mut prices = vec![100.0];
    for i in 1..20 {
        let last = *prices.last().unwrap();
        prices.push(if i % 3 == 0 { last - 1.0 } else { last + 2.0 });
    }
    let peak = *prices.last().unwrap();
    prices.extend((0..20).map(|k| peak - 2.0 * (k as f64 + 1.0)));
    prices
}

pub fn make_bar(date: &str, close: f64) -> PriceBar {
    PriceBar {
        timestamp: NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
    }
}
