//! Core domain types and strategy logic.

pub mod classifier_strategy;
pub mod config_validation;
pub mod error;
pub mod event;
pub mod market_maker;
pub mod order;
pub mod oscillator;
pub mod position;
pub mod price_bar;
pub mod price_window;
pub mod return_category;
pub mod strategy;
