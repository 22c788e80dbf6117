//! Daily check cycle.
//!
//! One invocation: lock, load, advance the day counter, fetch a snapshot,
//! evaluate, then either record the highest-priority trigger or persist the
//! advanced counter. Nothing is persisted when the snapshot fetch fails, so a
//! transient outage never moves the counter on its own.

use crate::domain::error::AgentError;
use crate::domain::recorder::Recorder;
use crate::domain::snapshot::MarketSnapshot;
use crate::domain::state::{AgentState, HistoryEntry};
use crate::domain::trigger::{Trigger, TriggerKind, TriggerRules};
use crate::ports::clock_port::Clock;
use crate::ports::market_port::MarketDataPort;
use crate::ports::notifier_port::NotifierPort;
use crate::ports::state_port::StatePort;

pub const NO_TRIGGERS_MESSAGE: &str = "No triggers activated";

#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Invested {
        trigger: Trigger,
        entry: HistoryEntry,
        message: String,
    },
    NoAction {
        triggers_checked: Vec<TriggerKind>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub outcome: CheckOutcome,
    pub snapshot: MarketSnapshot,
    /// Recovered problems, such as a failed alert delivery.
    pub warnings: Vec<String>,
}

impl CheckResult {
    pub fn action_taken(&self) -> bool {
        matches!(self.outcome, CheckOutcome::Invested { .. })
    }

    pub fn message(&self) -> &str {
        match &self.outcome {
            CheckOutcome::Invested { message, .. } => message,
            CheckOutcome::NoAction { .. } => NO_TRIGGERS_MESSAGE,
        }
    }

    pub fn trigger(&self) -> Option<&Trigger> {
        match &self.outcome {
            CheckOutcome::Invested { trigger, .. } => Some(trigger),
            CheckOutcome::NoAction { .. } => None,
        }
    }
}

pub struct DailyCheck<'a> {
    pub store: &'a dyn StatePort,
    pub market: &'a dyn MarketDataPort,
    pub notifier: &'a dyn NotifierPort,
    pub clock: &'a dyn Clock,
    pub rules: TriggerRules,
}

impl DailyCheck<'_> {
    pub fn run_once(&self) -> Result<CheckResult, AgentError> {
        let _lock = self.store.lock()?;
        let mut state = self.store.load()?;
        state.begin_trading_day();

        tracing::info!(
            trading_days = state.trading_days_since_last_investment,
            "checking market conditions"
        );

        let snapshot = self.market.fetch()?;
        let fired = self.rules.evaluate(&snapshot, &state);

        match fired.into_iter().next() {
            Some(trigger) => self.invest(&mut state, trigger, snapshot),
            None => {
                self.store.save(&state)?;
                tracing::info!("no triggers activated");
                Ok(CheckResult {
                    outcome: CheckOutcome::NoAction {
                        triggers_checked: TriggerKind::ALL.to_vec(),
                    },
                    snapshot,
                    warnings: Vec::new(),
                })
            }
        }
    }

    /// Evaluate what the next `run_once` would see, counter advance included,
    /// without locking, creating or persisting the record.
    pub fn preview(&self) -> Result<(AgentState, MarketSnapshot, Vec<Trigger>), AgentError> {
        let mut state = self.store.peek()?;
        state.begin_trading_day();
        let snapshot = self.market.fetch()?;
        let fired = self.rules.evaluate(&snapshot, &state);
        Ok((state, snapshot, fired))
    }

    fn invest(
        &self,
        state: &mut AgentState,
        trigger: Trigger,
        snapshot: MarketSnapshot,
    ) -> Result<CheckResult, AgentError> {
        let recording =
            Recorder::new(self.store, self.notifier).record(state, &trigger, self.clock.today())?;

        let warnings = match recording.delivery {
            Ok(_) => Vec::new(),
            Err(e) => vec![e.to_string()],
        };

        Ok(CheckResult {
            outcome: CheckOutcome::Invested {
                trigger,
                entry: recording.entry,
                message: recording.alert,
            },
            snapshot,
            warnings,
        })
    }
}
