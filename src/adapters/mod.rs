//! Concrete adapter implementations for ports.

pub mod csv_market_adapter;
pub mod file_config_adapter;
pub mod json_state_adapter;
pub mod notifiers;
pub mod system_clock;
