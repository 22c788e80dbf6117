//! Market data access port.

use crate::domain::error::AgentError;
use crate::domain::snapshot::MarketSnapshot;

pub trait MarketDataPort {
    /// Current index close, its 20-day SMA, the latest volatility close and
    /// a capture timestamp. Failures surface as `AgentError::DataUnavailable`.
    fn fetch(&self) -> Result<MarketSnapshot, AgentError>;
}
