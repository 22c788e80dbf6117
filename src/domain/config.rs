//! Agent configuration built from a [`ConfigPort`].
//!
//! Every key has a default, so an empty config yields a working agent that
//! keeps its state in the current directory and only logs alerts.

use std::path::PathBuf;

use crate::domain::error::AgentError;
use crate::domain::trigger::TriggerRules;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_STATE_PATH: &str = "investment_state.json";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_INDEX_SYMBOL: &str = "NSEI";
pub const DEFAULT_VOLATILITY_SYMBOL: &str = "INDIAVIX";

/// Where alerts go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Append alerts to an outbox file picked up by a delivery gateway.
    Configured { outbox: PathBuf },
    /// No delivery channel; alerts are logged and treated as delivered.
    Disabled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketConfig {
    pub data_dir: PathBuf,
    pub index_symbol: String,
    pub volatility_symbol: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub state_path: PathBuf,
    pub market: MarketConfig,
    pub rules: TriggerRules,
    pub delivery: DeliveryMode,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            market: MarketConfig {
                data_dir: PathBuf::from(DEFAULT_DATA_DIR),
                index_symbol: DEFAULT_INDEX_SYMBOL.into(),
                volatility_symbol: DEFAULT_VOLATILITY_SYMBOL.into(),
            },
            rules: TriggerRules::default(),
            delivery: DeliveryMode::Disabled,
        }
    }
}

fn non_blank(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn invalid(section: &str, key: &str, reason: &str) -> AgentError {
    AgentError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn positive_double(
    config: &dyn ConfigPort,
    key: &str,
    default: f64,
) -> Result<f64, AgentError> {
    let value = config.get_double("triggers", key, default);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "triggers",
            key,
            &format!("{} must be a positive number", key),
        ));
    }
    Ok(value)
}

pub fn build_agent_config(config: &dyn ConfigPort) -> Result<AgentConfig, AgentError> {
    let defaults = AgentConfig::default();
    let default_rules = defaults.rules;

    let dip_pct = positive_double(config, "dip_pct", default_rules.dip_pct)?;
    let volatility_threshold = positive_double(
        config,
        "volatility_threshold",
        default_rules.volatility_threshold,
    )?;

    let max_days = config.get_int(
        "triggers",
        "max_trading_days",
        i64::from(default_rules.max_trading_days),
    );
    let max_trading_days = u32::try_from(max_days)
        .ok()
        .filter(|d| *d >= 1)
        .ok_or_else(|| {
            invalid(
                "triggers",
                "max_trading_days",
                "max_trading_days must be at least 1",
            )
        })?;

    let delivery = match non_blank(config, "notify", "outbox") {
        Some(outbox) => DeliveryMode::Configured {
            outbox: PathBuf::from(outbox),
        },
        None => DeliveryMode::Disabled,
    };

    Ok(AgentConfig {
        state_path: non_blank(config, "state", "path")
            .map(PathBuf::from)
            .unwrap_or(defaults.state_path),
        market: MarketConfig {
            data_dir: non_blank(config, "market", "data_dir")
                .map(PathBuf::from)
                .unwrap_or(defaults.market.data_dir),
            index_symbol: non_blank(config, "market", "index_symbol")
                .unwrap_or(defaults.market.index_symbol),
            volatility_symbol: non_blank(config, "market", "volatility_symbol")
                .unwrap_or(defaults.market.volatility_symbol),
        },
        rules: TriggerRules {
            dip_pct,
            volatility_threshold,
            max_trading_days,
            index_name: non_blank(config, "market", "index_name")
                .unwrap_or(default_rules.index_name),
            volatility_name: non_blank(config, "market", "volatility_name")
                .unwrap_or(default_rules.volatility_name),
        },
        delivery,
    })
}
