//! Port traits the domain depends on.

pub mod clock_port;
pub mod config_port;
pub mod market_port;
pub mod notifier_port;
pub mod state_port;
