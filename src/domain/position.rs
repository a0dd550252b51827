//! Target position sign used by the oscillator strategy.

use crate::domain::order::Side;

/// Position the strategy has moved into.
///
/// Sign convention: `Long = -1`, `Neutral = 0`, `Short = 1`. Orders emitted
/// when entering a position carry the position's sign as their side, so
/// entering `Long` sells and entering `Short` buys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    Long,
    #[default]
    Neutral,
    Short,
}

impl Position {
    pub fn sign(self) -> i64 {
        match self {
            Position::Long => -1,
            Position::Neutral => 0,
            Position::Short => 1,
        }
    }

    /// Side of the orders sent when moving into this position. `None` for neutral.
    pub fn entry_side(self) -> Option<Side> {
        Side::from_sign(self.sign())
    }

    /// Unit orders needed to move from `self` to `target`: 0 if already
    /// there, 1 from neutral, 2 to flatten and reverse.
    pub fn orders_to(self, target: Position) -> usize {
        (target.sign() - self.sign()).unsigned_abs() as usize
    }
}
