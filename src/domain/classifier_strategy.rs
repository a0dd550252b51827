//! Lagged-return category prediction strategy.
//!
//! Once four closes have been seen, the classifier predicts a return category
//! from the last three and compares it with the category of the return just
//! realized. The strategy toggles between a buying and a selling regime:
//!
//! | regime  | predicted > realized | otherwise                   |
//! |---------|----------------------|-----------------------------|
//! | buying  | 1 buy                | 2 sells, switch to selling  |
//! | selling | 1 sell               | 2 buys, switch to buying    |

use std::sync::Arc;

use tracing::{debug, trace};

use crate::domain::event::Event;
use crate::domain::order::{Order, Side, StrategyId};
use crate::domain::price_window::PriceWindow;
use crate::domain::return_category::ReturnCategory;
use crate::domain::strategy::{CancelBook, Strategy};
use crate::ports::classifier_port::ClassifierPort;

const WARMUP: usize = 4;

pub struct ClassifierStrategy {
    classifier: Arc<dyn ClassifierPort>,
    prices: PriceWindow,
    last_event_price: Option<f64>,
    buying: bool,
    book: CancelBook,
}

impl ClassifierStrategy {
    pub fn new(classifier: Arc<dyn ClassifierPort>) -> Self {
        Self {
            classifier,
            prices: PriceWindow::new(WARMUP),
            last_event_price: None,
            buying: true,
            book: CancelBook::new(StrategyId::next()),
        }
    }

    pub fn is_buying(&self) -> bool {
        self.buying
    }

    fn decide(&mut self, instrument: &str, predicted: ReturnCategory, realized: ReturnCategory) -> Vec<Order> {
        let continue_side = if self.buying { Side::Buy } else { Side::Sell };
        if predicted > realized {
            return vec![Order::market(instrument, continue_side)];
        }

        let reverse_side = continue_side.opposite();
        self.buying = !self.buying;
        debug!(
            instrument,
            %predicted,
            %realized,
            buying = self.buying,
            "classifier regime flipped"
        );
        vec![
            Order::market(instrument, reverse_side),
            Order::market(instrument, reverse_side),
        ]
    }
}

impl Strategy for ClassifierStrategy {
    fn name(&self) -> &str {
        "classifier"
    }

    fn cancel_book(&self) -> &CancelBook {
        &self.book
    }

    fn cancel_book_mut(&mut self) -> &mut CancelBook {
        &mut self.book
    }

    fn push(&mut self, event: &Event) -> Vec<Order> {
        let close = event.close();
        self.prices.push(close);
        let previous = self.last_event_price.replace(close);

        if !self.prices.is_full() {
            trace!(have = self.prices.len(), need = WARMUP, "classifier warming up");
            return Vec::new();
        }
        let Some(window) = self.prices.tail::<3>() else {
            return Vec::new();
        };

        let predicted = self.classifier.predict(&window);
        let realized = ReturnCategory::between(previous, close);
        self.decide(event.instrument(), predicted, realized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(ReturnCategory);

    impl ClassifierPort for Fixed {
        fn predict(&self, _window: &[f64; 3]) -> ReturnCategory {
            self.0
        }
    }

    fn strategy(category: ReturnCategory) -> ClassifierStrategy {
        ClassifierStrategy::new(Arc::new(Fixed(category)))
    }

    fn warm_up(s: &mut ClassifierStrategy) {
        for p in [100.0, 101.0, 102.0] {
            assert!(s.push(&Event::from_close("IBOV", p)).is_empty());
        }
    }

    #[test]
    fn needs_four_prices() {
        let mut s = strategy(ReturnCategory::StrongGain);
        warm_up(&mut s);
        assert_eq!(s.push(&Event::from_close("IBOV", 103.0)).len(), 1);
    }

    #[test]
    fn buying_continue_emits_single_buy() {
        // realized 102 -> 103 is Gain; StrongGain > Gain
        let mut s = strategy(ReturnCategory::StrongGain);
        warm_up(&mut s);
        let orders = s.push(&Event::from_close("IBOV", 103.0));
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].side(), Side::Buy);
        assert!(s.is_buying());
    }

    #[test]
    fn buying_reverse_emits_two_sells() {
        let mut s = strategy(ReturnCategory::Gain);
        warm_up(&mut s);
        let orders = s.push(&Event::from_close("IBOV", 103.0));
        assert_eq!(orders.len(), 2);
        assert!(orders.iter().all(|o| o.side() == Side::Sell && o.is_market()));
        assert!(!s.is_buying());
    }

    #[test]
    fn selling_regime_mirrors() {
        let mut s = strategy(ReturnCategory::Gain);
        warm_up(&mut s);
        s.push(&Event::from_close("IBOV", 103.0));
        assert!(!s.is_buying());

        // 103 -> 104 is Gain again: not greater, so reverse back to buying
        let orders = s.push(&Event::from_close("IBOV", 104.0));
        assert_eq!(orders.len(), 2);
        assert!(orders.iter().all(|o| o.side() == Side::Buy));
        assert!(s.is_buying());
    }

    #[test]
    fn selling_continue_emits_single_sell() {
        let mut s = strategy(ReturnCategory::Gain);
        warm_up(&mut s);
        s.push(&Event::from_close("IBOV", 103.0));
        // 103 -> 102 is a loss of ~0.97%: Gain > Loss
        let orders = s.push(&Event::from_close("IBOV", 102.0));
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].side(), Side::Sell);
        assert!(!s.is_buying());
    }

    struct Recording(std::sync::Mutex<Vec<[f64; 3]>>);

    impl ClassifierPort for Recording {
        fn predict(&self, window: &[f64; 3]) -> ReturnCategory {
            self.0.lock().unwrap().push(*window);
            ReturnCategory::SmallLoss
        }
    }

    #[test]
    fn predicts_from_last_three_closes() {
        let model = Arc::new(Recording(std::sync::Mutex::new(Vec::new())));
        let mut s = ClassifierStrategy::new(model.clone());
        for p in [1.0, 2.0, 3.0, 4.0, 5.0] {
            s.push(&Event::from_close("IBOV", p));
        }
        let seen = model.0.lock().unwrap().clone();
        assert_eq!(seen, vec![[2.0, 3.0, 4.0], [3.0, 4.0, 5.0]]);
    }
}
