//! Fixed-capacity ring buffer of closing prices.

use std::collections::VecDeque;

/// Keeps the most recent `capacity` prices; older ones are evicted on push.
/// Storage grows with the prices pushed, not with `capacity`.
#[derive(Debug, Clone)]
pub struct PriceWindow {
    prices: VecDeque<f64>,
    capacity: usize,
}

impl PriceWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            prices: VecDeque::new(),
            capacity,
        }
    }

    pub fn push(&mut self, price: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.prices.len() == self.capacity {
            self.prices.pop_front();
        }
        self.prices.push_back(price);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.prices.len() == self.capacity
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.prices.iter().copied()
    }

    /// The newest `N` prices, oldest first, or `None` if fewer are held.
    pub fn tail<const N: usize>(&self) -> Option<[f64; N]> {
        if self.prices.len() < N {
            return None;
        }
        let mut out = [0.0; N];
        let skip = self.prices.len() - N;
        for (slot, price) in out.iter_mut().zip(self.prices.iter().skip(skip)) {
            *slot = *price;
        }
        Some(out)
    }
}
