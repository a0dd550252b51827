//! The strategy contract shared by every variant.
//!
//! A runner drives a strategy strictly sequentially:
//! - `push` once per market event, in arrival order
//! - `fill` whenever a submitted order is executed or rejected
//! - `take_cancellations` after each hook, applying the returned requests
//!   before submitting the orders that hook returned
//!
//! Hooks never fail: arithmetic edge cases and missing history resolve to
//! "no orders".

use std::collections::HashSet;

use tracing::debug;

use crate::domain::event::Event;
use crate::domain::order::{Order, OrderId, StrategyId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStatus {
    Filled,
    PartiallyFilled,
    Rejected,
}

/// Execution report from the runner. `quantity` is signed: positive when the
/// strategy bought.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub instrument: String,
    pub price: f64,
    pub quantity: f64,
    pub status: FillStatus,
}

impl Fill {
    pub fn new(instrument: impl Into<String>, price: f64, quantity: f64, status: FillStatus) -> Self {
        Self {
            instrument: instrument.into(),
            price,
            quantity,
            status,
        }
    }
}

/// A request to withdraw a resting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelRequest {
    pub owner: StrategyId,
    pub order_id: OrderId,
}

/// Best-effort local bookkeeping of cancellation requests.
///
/// Each order id is requested at most once. Requests for orders owned by
/// another strategy are dropped. Whether the order still exists is for the
/// runner to decide; cancelling a settled order is not an error.
#[derive(Debug)]
pub struct CancelBook {
    owner: StrategyId,
    requested: HashSet<OrderId>,
    pending: Vec<CancelRequest>,
}

impl CancelBook {
    pub fn new(owner: StrategyId) -> Self {
        Self {
            owner,
            requested: HashSet::new(),
            pending: Vec::new(),
        }
    }

    pub fn owner(&self) -> StrategyId {
        self.owner
    }

    pub fn request(&mut self, owner: StrategyId, order_id: OrderId) {
        if owner != self.owner {
            debug!(%owner, %order_id, expected = %self.owner, "ignoring cancel for foreign owner");
            return;
        }
        if !self.requested.insert(order_id) {
            debug!(%order_id, "cancel already requested");
            return;
        }
        self.pending.push(CancelRequest { owner, order_id });
    }

    pub fn drain(&mut self) -> Vec<CancelRequest> {
        std::mem::take(&mut self.pending)
    }
}

pub trait Strategy {
    /// Short human-readable name of the variant.
    fn name(&self) -> &str;

    fn cancel_book(&self) -> &CancelBook;

    fn cancel_book_mut(&mut self) -> &mut CancelBook;

    /// React to one market event.
    fn push(&mut self, event: &Event) -> Vec<Order>;

    /// React to an execution report. No orders by default.
    fn fill(&mut self, _fill: &Fill) -> Vec<Order> {
        Vec::new()
    }

    fn id(&self) -> StrategyId {
        self.cancel_book().owner()
    }

    /// Ask the runner to withdraw `order_id`. Idempotent and silent.
    fn cancel(&mut self, owner_id: StrategyId, order_id: OrderId) {
        self.cancel_book_mut().request(owner_id, order_id);
    }

    /// Cancellation requests raised since the last call, oldest first.
    fn take_cancellations(&mut self) -> Vec<CancelRequest> {
        self.cancel_book_mut().drain()
    }
}
