//! Core domain types and logic.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod recorder;
pub mod snapshot;
pub mod state;
pub mod trigger;
