//! Alert delivery adapters.

use chrono::Local;
use std::fs::OpenOptions;
use std::path::PathBuf;

use crate::domain::config::DeliveryMode;
use crate::domain::error::NotificationError;
use crate::ports::notifier_port::{Delivery, NotifierPort};

/// Appends `timestamp,message` rows to an outbox CSV consumed by an external
/// delivery gateway. The header is written when the file is first created.
pub struct OutboxNotifier {
    path: PathBuf,
}

impl OutboxNotifier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl NotifierPort for OutboxNotifier {
    fn send(&self, message: &str) -> Result<Delivery, NotificationError> {
        let fail = |e: &dyn std::fmt::Display| {
            NotificationError::new(format!("outbox {}: {}", self.path.display(), e))
        };

        let is_new = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| fail(&e))?;

        let mut wtr = csv::Writer::from_writer(file);
        if is_new {
            wtr.write_record(["timestamp", "message"])
                .map_err(|e| fail(&e))?;
        }
        wtr.write_record([Local::now().to_rfc3339().as_str(), message])
            .map_err(|e| fail(&e))?;
        wtr.flush().map_err(|e| fail(&e))?;

        tracing::info!(outbox = %self.path.display(), "alert queued");
        Ok(Delivery::Sent)
    }
}

/// Used when no delivery channel is configured: the alert is logged and the
/// send still completes.
pub struct LogNotifier;

impl NotifierPort for LogNotifier {
    fn send(&self, message: &str) -> Result<Delivery, NotificationError> {
        tracing::info!(%message, "notifications not configured; alert logged only");
        Ok(Delivery::LoggedOnly)
    }
}

pub fn notifier_for(mode: &DeliveryMode) -> Box<dyn NotifierPort> {
    match mode {
        DeliveryMode::Configured { outbox } => Box::new(OutboxNotifier::new(outbox.clone())),
        DeliveryMode::Disabled => Box::new(LogNotifier),
    }
}
