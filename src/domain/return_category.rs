//! Six-bucket discretisation of percent returns.
//!
//! Bucket edges (fractions, upper bound inclusive):
//! `(-inf, -0.01] (-0.01, -0.005] (-0.005, 0] (0, 0.005] (0.005, 0.01] (0.01, inf)`

use std::fmt;

/// Return bucket, ordered from the most negative to the most positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReturnCategory {
    StrongLoss,
    Loss,
    SmallLoss,
    SmallGain,
    Gain,
    StrongGain,
}

impl ReturnCategory {
    pub const ALL: [ReturnCategory; 6] = [
        ReturnCategory::StrongLoss,
        ReturnCategory::Loss,
        ReturnCategory::SmallLoss,
        ReturnCategory::SmallGain,
        ReturnCategory::Gain,
        ReturnCategory::StrongGain,
    ];

    /// Bucket a fractional return. NaN is treated as a zero return.
    pub fn from_return(ret: f64) -> Self {
        let ret = if ret.is_nan() { 0.0 } else { ret };
        if ret <= -0.01 {
            ReturnCategory::StrongLoss
        } else if ret <= -0.005 {
            ReturnCategory::Loss
        } else if ret <= 0.0 {
            ReturnCategory::SmallLoss
        } else if ret <= 0.005 {
            ReturnCategory::SmallGain
        } else if ret <= 0.01 {
            ReturnCategory::Gain
        } else {
            ReturnCategory::StrongGain
        }
    }

    /// Realized return from `previous` to `current`, bucketed. A missing or
    /// zero previous price counts as a zero return.
    pub fn between(previous: Option<f64>, current: f64) -> Self {
        let ret = match previous {
            Some(prev) if prev != 0.0 => (current - prev) / prev,
            _ => 0.0,
        };
        Self::from_return(ret)
    }

    pub fn from_label(label: u8) -> Option<Self> {
        Self::ALL.get(label as usize).copied()
    }

    pub fn label(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ReturnCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
