//! Records a fired trigger as an investment and requests an alert.

use chrono::NaiveDate;

use crate::domain::error::{AgentError, NotificationError};
use crate::domain::state::{AgentState, HistoryEntry};
use crate::domain::trigger::Trigger;
use crate::ports::notifier_port::{Delivery, NotifierPort};
use crate::ports::state_port::StatePort;

/// Alert text sent for a recorded investment.
pub fn compose_alert(trigger: &Trigger) -> String {
    format!(
        "Investment triggered: {}. Executed 100% of month's allocation.",
        trigger.message
    )
}

/// Outcome of recording one investment.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub entry: HistoryEntry,
    pub alert: String,
    pub delivery: Result<Delivery, NotificationError>,
}

pub struct Recorder<'a> {
    store: &'a dyn StatePort,
    notifier: &'a dyn NotifierPort,
}

impl<'a> Recorder<'a> {
    pub fn new(store: &'a dyn StatePort, notifier: &'a dyn NotifierPort) -> Self {
        Self { store, notifier }
    }

    /// Append the investment, persist, then notify. The alert is only sent
    /// once the record is durable; a failed alert does not undo it.
    pub fn record(
        &self,
        state: &mut AgentState,
        trigger: &Trigger,
        today: NaiveDate,
    ) -> Result<Recording, AgentError> {
        let entry = HistoryEntry {
            date: today,
            trigger_type: trigger.kind,
            message: trigger.message.clone(),
        };
        state.push_investment(entry.clone());
        self.store.save(state)?;

        tracing::info!(trigger = %trigger.kind, date = %today, "investment recorded");

        let alert = compose_alert(trigger);
        let delivery = self.notifier.send(&alert);
        if let Err(e) = &delivery {
            tracing::warn!(error = %e, "alert delivery failed; investment remains recorded");
        }

        Ok(Recording {
            entry,
            alert,
            delivery,
        })
    }
}
