//! Investment trigger evaluation.
//!
//! Three independent checks run in fixed priority order:
//! 1. `PRICE_DIP`: close at or below the 20-day SMA by `dip_pct` percent.
//! 2. `VOLATILITY_SPIKE`: volatility index close strictly above its threshold.
//! 3. `TIME_BASED`: `max_trading_days` trading days since the last investment.
//!
//! Every check runs on every cycle; all matches are returned in priority order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::snapshot::MarketSnapshot;
use crate::domain::state::AgentState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerKind {
    PriceDip,
    VolatilitySpike,
    TimeBased,
}

impl TriggerKind {
    /// Evaluation and recording priority, highest first.
    pub const ALL: [TriggerKind; 3] = [
        TriggerKind::PriceDip,
        TriggerKind::VolatilitySpike,
        TriggerKind::TimeBased,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::PriceDip => "PRICE_DIP",
            TriggerKind::VolatilitySpike => "VOLATILITY_SPIKE",
            TriggerKind::TimeBased => "TIME_BASED",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A fired trigger with its human-readable explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trigger {
    pub kind: TriggerKind,
    pub message: String,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Thresholds and display names used to evaluate and describe triggers.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerRules {
    /// Percent below the SMA at which the dip trigger fires (positive).
    pub dip_pct: f64,
    /// Volatility close must be strictly above this.
    pub volatility_threshold: f64,
    pub max_trading_days: u32,
    pub index_name: String,
    pub volatility_name: String,
}

impl Default for TriggerRules {
    fn default() -> Self {
        Self {
            dip_pct: 2.5,
            volatility_threshold: 22.0,
            max_trading_days: 20,
            index_name: "Nifty 50".into(),
            volatility_name: "India VIX".into(),
        }
    }
}

impl TriggerRules {
    pub fn evaluate(&self, snapshot: &MarketSnapshot, state: &AgentState) -> Vec<Trigger> {
        let mut fired = Vec::with_capacity(TriggerKind::ALL.len());

        match snapshot.dip_pct() {
            Some(dip) if dip <= -self.dip_pct => fired.push(Trigger {
                kind: TriggerKind::PriceDip,
                message: format!(
                    "{} closed {:.2}% below 20-Day SMA",
                    self.index_name,
                    dip.abs()
                ),
            }),
            Some(dip) => tracing::debug!(dip, "price dip not reached"),
            None => tracing::debug!(
                sma_20 = snapshot.sma_20,
                "moving average unusable, skipping price dip"
            ),
        }

        if let Some(vol) = snapshot.volatility_close {
            if vol > self.volatility_threshold {
                fired.push(Trigger {
                    kind: TriggerKind::VolatilitySpike,
                    message: format!(
                        "{} closed at {:.2} (above {})",
                        self.volatility_name, vol, self.volatility_threshold
                    ),
                });
            }
        }

        if state.trading_days_since_last_investment >= self.max_trading_days {
            fired.push(Trigger {
                kind: TriggerKind::TimeBased,
                message: format!(
                    "{} trading days have passed since last investment",
                    self.max_trading_days
                ),
            });
        }

        fired
    }
}

/// Evaluate with the default thresholds.
pub fn evaluate(snapshot: &MarketSnapshot, state: &AgentState) -> Vec<Trigger> {
    TriggerRules::default().evaluate(snapshot, state)
}
