//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_market_adapter::CsvMarketAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_state_adapter::JsonStateAdapter;
use crate::adapters::notifiers::notifier_for;
use crate::adapters::system_clock::SystemClock;
use crate::domain::config::{build_agent_config, AgentConfig};
use crate::domain::error::AgentError;
use crate::domain::orchestrator::{CheckOutcome, CheckResult, DailyCheck};
use crate::domain::snapshot::MarketSnapshot;
use crate::domain::state::AgentState;
use crate::domain::trigger::Trigger;
use crate::ports::notifier_port::NotifierPort;
use crate::ports::state_port::StatePort;

#[derive(Parser, Debug)]
#[command(name = "dipwatch", about = "Rule-driven index investment timing agent")]
pub struct Cli {
    /// INI config file; defaults apply when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one daily check and record an investment if a trigger fires
    Check,
    /// Show the investment state and history
    Status,
    /// Show which triggers the next check would fire, without recording anything
    Preview,
}

/// Install the stderr log subscriber. Safe to call more than once.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Concrete adapters wired from an [`AgentConfig`].
pub struct Agent {
    pub config: AgentConfig,
    pub store: JsonStateAdapter,
    pub market: CsvMarketAdapter,
    pub notifier: Box<dyn NotifierPort>,
    pub clock: SystemClock,
}

impl Agent {
    pub fn from_config(config: AgentConfig) -> Self {
        Self {
            store: JsonStateAdapter::new(config.state_path.clone()),
            market: CsvMarketAdapter::from_config(&config.market),
            notifier: notifier_for(&config.delivery),
            clock: SystemClock,
            config,
        }
    }

    pub fn daily_check(&self) -> DailyCheck<'_> {
        DailyCheck {
            store: &self.store,
            market: &self.market,
            notifier: self.notifier.as_ref(),
            clock: &self.clock,
            rules: self.config.rules.clone(),
        }
    }
}

pub fn load_agent_config(path: Option<&PathBuf>) -> Result<AgentConfig, AgentError> {
    let adapter = match path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading config");
            FileConfigAdapter::from_file(p)?
        }
        None => FileConfigAdapter::empty(),
    };
    build_agent_config(&adapter)
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(&cli.log_level);

    let agent = match load_agent_config(cli.config.as_ref()) {
        Ok(config) => Agent::from_config(config),
        Err(e) => return report(&e),
    };

    let output = match cli.command {
        Command::Check => agent.daily_check().run_once().map(|r| format_check_result(&r)),
        Command::Status => agent.store.peek().map(|s| format_status(&s)),
        Command::Preview => agent
            .daily_check()
            .preview()
            .map(|(state, snapshot, fired)| format_preview(&state, &snapshot, &fired)),
    };

    match output {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => report(&e),
    }
}

fn report(err: &AgentError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err)
}

pub fn format_check_result(result: &CheckResult) -> String {
    let mut out = String::new();
    match &result.outcome {
        CheckOutcome::Invested { trigger, entry, message } => {
            let _ = writeln!(out, "Investment executed ({})", trigger.kind);
            let _ = writeln!(out, "  {}", message);
            let _ = writeln!(out, "  Recorded on {}", entry.date);
        }
        CheckOutcome::NoAction { triggers_checked } => {
            let _ = writeln!(out, "{}", result.message());
            let checked: Vec<&str> = triggers_checked.iter().map(|k| k.as_str()).collect();
            let _ = writeln!(out, "  Checked: {}", checked.join(", "));
        }
    }
    let _ = writeln!(out, "  Market: {}", result.snapshot);
    for warning in &result.warnings {
        let _ = writeln!(out, "  warning: {}", warning);
    }
    out
}

pub fn format_status(state: &AgentState) -> String {
    let mut out = String::new();
    match state.last_investment_date {
        Some(date) => {
            let _ = writeln!(out, "Last investment:              {}", date);
            let _ = writeln!(
                out,
                "Trading days since investment: {}",
                state.trading_days_since_last_investment
            );
        }
        None => {
            let _ = writeln!(out, "No investments recorded yet");
        }
    }

    if !state.investment_history.is_empty() {
        let _ = writeln!(out, "\n=== Investment History ===");
        for entry in &state.investment_history {
            let _ = writeln!(
                out,
                "  {}  {:<16}  {}",
                entry.date, entry.trigger_type, entry.message
            );
        }
    }
    out
}

pub fn format_preview(state: &AgentState, snapshot: &MarketSnapshot, fired: &[Trigger]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Market: {}", snapshot);
    let _ = writeln!(
        out,
        "Trading days at next check: {}",
        state.trading_days_since_last_investment
    );
    if fired.is_empty() {
        let _ = writeln!(out, "No active triggers");
    } else {
        let _ = writeln!(out, "Active triggers:");
        for trigger in fired {
            let _ = writeln!(out, "  {}", trigger);
        }
    }
    out
}
