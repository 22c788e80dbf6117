#![allow(dead_code)]

use chrono::NaiveDate;
use dipwatch::domain::error::{AgentError, NotificationError};
use dipwatch::domain::snapshot::MarketSnapshot;
use dipwatch::domain::state::AgentState;
use dipwatch::ports::clock_port::Clock;
use dipwatch::ports::market_port::MarketDataPort;
use dipwatch::ports::notifier_port::{Delivery, NotifierPort};
use dipwatch::ports::state_port::StatePort;
use std::cell::{Cell, RefCell};

/// In-memory state store that records every save.
#[derive(Default)]
pub struct MemoryStatePort {
    pub record: RefCell<Option<AgentState>>,
    pub saves: Cell<usize>,
    pub fail_saves: bool,
}

impl MemoryStatePort {
    pub fn with_state(state: AgentState) -> Self {
        Self {
            record: RefCell::new(Some(state)),
            ..Default::default()
        }
    }

    pub fn persisted(&self) -> Option<AgentState> {
        self.record.borrow().clone()
    }
}

impl StatePort for MemoryStatePort {
    fn load(&self) -> Result<AgentState, AgentError> {
        let existing = self.record.borrow().clone();
        match existing {
            Some(state) => Ok(state),
            None => {
                let state = AgentState::default();
                self.save(&state)?;
                Ok(state)
            }
        }
    }

    fn peek(&self) -> Result<AgentState, AgentError> {
        Ok(self.record.borrow().clone().unwrap_or_default())
    }

    fn save(&self, state: &AgentState) -> Result<(), AgentError> {
        if self.fail_saves {
            return Err(AgentError::storage("memory", "read-only"));
        }
        *self.record.borrow_mut() = Some(state.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

pub struct MockMarketPort {
    pub snapshot: Option<MarketSnapshot>,
}

impl MockMarketPort {
    pub fn returning(snapshot: MarketSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
        }
    }

    pub fn unavailable() -> Self {
        Self { snapshot: None }
    }
}

impl MarketDataPort for MockMarketPort {
    fn fetch(&self) -> Result<MarketSnapshot, AgentError> {
        self.snapshot
            .clone()
            .ok_or_else(|| AgentError::data_unavailable("provider offline"))
    }
}

#[derive(Default)]
pub struct CapturingNotifier {
    pub sent: RefCell<Vec<String>>,
    pub fail: bool,
}

impl NotifierPort for CapturingNotifier {
    fn send(&self, message: &str) -> Result<Delivery, NotificationError> {
        self.sent.borrow_mut().push(message.to_string());
        if self.fail {
            Err(NotificationError::new("gateway down"))
        } else {
            Ok(Delivery::Sent)
        }
    }
}

pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn snapshot(index_close: f64, sma_20: f64, volatility_close: Option<f64>) -> MarketSnapshot {
    MarketSnapshot {
        index_close,
        sma_20,
        volatility_close,
        timestamp: "2024-03-01T15:00:00+05:30".into(),
    }
}

/// A snapshot that fires nothing.
pub fn calm_snapshot() -> MarketSnapshot {
    snapshot(17500.0, 17400.0, Some(14.0))
}

pub fn invested_state(last: &str, days: u32) -> AgentState {
    AgentState {
        last_investment_date: Some(date(last)),
        trading_days_since_last_investment: days,
        investment_history: vec![],
    }
}
