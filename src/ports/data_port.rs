//! Price history access port.

use crate::domain::error::TickstratError;
use crate::domain::price_bar::PriceBar;

pub trait DataPort {
    /// Cleaned bars for `instrument`, oldest first.
    fn fetch_bars(&self, instrument: &str) -> Result<Vec<PriceBar>, TickstratError>;

    fn instruments(&self) -> Vec<String>;
}
