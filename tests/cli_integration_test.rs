//! End-to-end tests wiring the real file adapters from an INI config.

mod common;

use common::*;
use dipwatch::cli::{self, Agent};
use dipwatch::domain::config::DeliveryMode;
use dipwatch::domain::error::AgentError;
use dipwatch::domain::trigger::TriggerKind;
use dipwatch::ports::state_port::StatePort;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_closes(dir: &Path, symbol: &str, closes: &[f64]) {
    let start = date("2024-01-01");
    let mut content = String::from("date,close\n");
    for (i, close) in closes.iter().enumerate() {
        let day = start + chrono::Duration::days(i as i64);
        content.push_str(&format!("{},{}\n", day, close));
    }
    fs::write(dir.join(format!("{}.csv", symbol)), content).unwrap();
}

/// Config file, data directory and state path inside one temp dir.
fn setup(outbox: bool) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();

    let mut ini = format!(
        "[state]\npath = {}\n\n[market]\ndata_dir = {}\n\n[triggers]\nmax_trading_days = 5\n",
        dir.path().join("state.json").display(),
        data.display(),
    );
    if outbox {
        ini.push_str(&format!(
            "\n[notify]\noutbox = {}\n",
            dir.path().join("alerts.csv").display()
        ));
    }
    let config_path = dir.path().join("dipwatch.ini");
    fs::write(&config_path, ini).unwrap();
    (dir, config_path)
}

fn agent(config_path: &PathBuf) -> Agent {
    Agent::from_config(cli::load_agent_config(Some(config_path)).unwrap())
}

#[test]
fn config_file_selects_adapters() {
    let (dir, config_path) = setup(true);
    let config = cli::load_agent_config(Some(&config_path)).unwrap();

    assert_eq!(config.state_path, dir.path().join("state.json"));
    assert_eq!(config.market.data_dir, dir.path().join("data"));
    assert_eq!(config.rules.max_trading_days, 5);
    assert_eq!(
        config.delivery,
        DeliveryMode::Configured {
            outbox: dir.path().join("alerts.csv")
        }
    );
}

#[test]
fn missing_config_file_is_config_error() {
    let err = cli::load_agent_config(Some(&PathBuf::from("/nonexistent/dipwatch.ini")))
        .unwrap_err();
    assert!(matches!(err, AgentError::ConfigParse { .. }));
}

#[test]
fn calm_market_persists_incremented_counter() {
    let (dir, config_path) = setup(false);
    let data = dir.path().join("data");
    write_closes(&data, "NSEI", &[17500.0; 25]);
    write_closes(&data, "INDIAVIX", &[13.5]);
    fs::write(
        dir.path().join("state.json"),
        r#"{"last_investment_date": "2024-01-02", "trading_days_since_last_investment": 2, "investment_history": []}"#,
    )
    .unwrap();

    let agent = agent(&config_path);
    let result = agent.daily_check().run_once().unwrap();

    assert!(!result.action_taken());
    let state = agent.store.load().unwrap();
    assert_eq!(state.trading_days_since_last_investment, 3);
    assert!(!agent.store.lock_path().exists());
}

#[test]
fn dip_is_recorded_and_queued_in_outbox() {
    let (dir, config_path) = setup(true);
    let data = dir.path().join("data");
    let mut closes = vec![17500.0; 24];
    closes.push(16000.0);
    write_closes(&data, "NSEI", &closes);

    let agent = agent(&config_path);
    let result = agent.daily_check().run_once().unwrap();

    assert!(result.action_taken());
    assert_eq!(result.trigger().unwrap().kind, TriggerKind::PriceDip);
    assert_eq!(result.snapshot.volatility_close, None);

    let state = agent.store.load().unwrap();
    assert_eq!(state.investment_history.len(), 1);
    assert_eq!(state.trading_days_since_last_investment, 0);
    assert!(state.last_investment_date.is_some());

    let outbox = fs::read_to_string(dir.path().join("alerts.csv")).unwrap();
    assert!(outbox.contains("Investment triggered: Nifty 50 closed"));
    assert!(outbox.contains("Executed 100% of month's allocation."));
}

#[test]
fn missing_market_data_leaves_state_untouched() {
    let (dir, config_path) = setup(false);
    let original = r#"{"last_investment_date": "2024-01-02", "trading_days_since_last_investment": 2, "investment_history": []}"#;
    fs::write(dir.path().join("state.json"), original).unwrap();

    let agent = agent(&config_path);
    let err = agent.daily_check().run_once().unwrap_err();

    assert!(matches!(err, AgentError::DataUnavailable { .. }));
    assert_eq!(
        fs::read_to_string(dir.path().join("state.json")).unwrap(),
        original
    );
    assert!(!agent.store.lock_path().exists());
}

#[test]
fn malformed_state_is_not_reset() {
    let (dir, config_path) = setup(false);
    write_closes(&dir.path().join("data"), "NSEI", &[17500.0; 25]);
    fs::write(dir.path().join("state.json"), "[]").unwrap();

    let agent = agent(&config_path);
    let err = agent.daily_check().run_once().unwrap_err();

    assert!(matches!(err, AgentError::Storage { .. }));
    assert_eq!(
        fs::read_to_string(dir.path().join("state.json")).unwrap(),
        "[]"
    );
}

#[test]
fn overlapping_run_is_refused() {
    let (dir, config_path) = setup(false);
    write_closes(&dir.path().join("data"), "NSEI", &[17500.0; 25]);

    let agent = agent(&config_path);
    let _held = agent.store.lock().unwrap();

    let err = agent.daily_check().run_once().unwrap_err();
    assert!(matches!(err, AgentError::Storage { .. }));
    assert!(!dir.path().join("state.json").exists());
}

#[test]
fn status_and_preview_leave_no_state_file() {
    let (dir, config_path) = setup(false);
    write_closes(&dir.path().join("data"), "NSEI", &[17500.0; 25]);
    let agent = agent(&config_path);

    let status = agent.store.peek().map(|s| cli::format_status(&s)).unwrap();
    assert_eq!(status, "No investments recorded yet\n");

    let (state, _snapshot, fired) = agent.daily_check().preview().unwrap();
    assert!(fired.is_empty());
    assert_eq!(state.trading_days_since_last_investment, 0);

    assert!(!dir.path().join("state.json").exists());
    assert!(!agent.store.lock_path().exists());
}
