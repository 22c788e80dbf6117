//! Alert delivery port.

use crate::domain::error::NotificationError;

/// How an alert left the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the configured delivery channel.
    Sent,
    /// No channel configured; the alert was only logged.
    LoggedOnly,
}

pub trait NotifierPort {
    fn send(&self, message: &str) -> Result<Delivery, NotificationError>;
}
