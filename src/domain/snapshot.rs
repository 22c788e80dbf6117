//! Market snapshot consumed by one check cycle.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Number of closes averaged for the dip comparison.
pub const SMA_PERIOD: usize = 20;

/// A single daily close from a price history.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

/// Ephemeral view of the market for one cycle. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub index_close: f64,
    /// NaN when the history is shorter than [`SMA_PERIOD`].
    pub sma_20: f64,
    pub volatility_close: Option<f64>,
    pub timestamp: String,
}

impl MarketSnapshot {
    /// Percent distance of the close from its moving average, or `None`
    /// when the average is not a finite positive number.
    pub fn dip_pct(&self) -> Option<f64> {
        if !self.sma_20.is_finite() || self.sma_20 <= 0.0 || !self.index_close.is_finite() {
            return None;
        }
        Some((self.index_close - self.sma_20) / self.sma_20 * 100.0)
    }
}

impl fmt::Display for MarketSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "close {:.2}, SMA(20) ", self.index_close)?;
        if self.sma_20.is_finite() {
            write!(f, "{:.2}", self.sma_20)?;
        } else {
            write!(f, "n/a")?;
        }
        match self.volatility_close {
            Some(v) => write!(f, ", volatility {:.2}", v)?,
            None => write!(f, ", volatility n/a")?,
        }
        write!(f, " at {}", self.timestamp)
    }
}

/// Mean of the last `period` closes, or NaN when fewer are available.
pub fn simple_moving_average(closes: &[DailyClose], period: usize) -> f64 {
    if period == 0 || closes.len() < period {
        return f64::NAN;
    }
    let window = &closes[closes.len() - period..];
    window.iter().map(|c| c.close).sum::<f64>() / period as f64
}
