//! Persisted agent state: last investment, day counter, history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::trigger::TriggerKind;

/// One recorded investment. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    #[serde(rename = "trigger")]
    pub trigger_type: TriggerKind,
    pub message: String,
}

/// The single durable record. Threaded explicitly through
/// load -> evaluate/record -> save; there is no process-wide instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub last_investment_date: Option<NaiveDate>,
    pub trading_days_since_last_investment: u32,
    pub investment_history: Vec<HistoryEntry>,
}

impl AgentState {
    /// Advance the trading-day counter for a new cycle. Only counts once an
    /// investment has been recorded.
    pub fn begin_trading_day(&mut self) {
        if self.last_investment_date.is_some() {
            self.trading_days_since_last_investment =
                self.trading_days_since_last_investment.saturating_add(1);
        }
    }

    /// Append an entry and reset the counter. The counter only ever returns
    /// to zero here.
    pub fn push_investment(&mut self, entry: HistoryEntry) {
        self.last_investment_date = Some(entry.date);
        self.trading_days_since_last_investment = 0;
        self.investment_history.push(entry);
    }

    pub fn last_entry(&self) -> Option<&HistoryEntry> {
        self.investment_history.last()
    }
}
