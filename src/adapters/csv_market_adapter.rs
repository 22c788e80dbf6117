//! CSV daily-close market data adapter.
//!
//! Reads `<data_dir>/<symbol>.csv` exports. The `date` and `close` columns
//! are found by header name, so exports carrying open/high/low/volume
//! columns load as-is.

use chrono::{Local, NaiveDate};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::domain::config::MarketConfig;
use crate::domain::error::AgentError;
use crate::domain::snapshot::{simple_moving_average, DailyClose, MarketSnapshot, SMA_PERIOD};
use crate::ports::market_port::MarketDataPort;

pub struct CsvMarketAdapter {
    base_path: PathBuf,
    index_symbol: String,
    volatility_symbol: String,
}

impl CsvMarketAdapter {
    pub fn new(
        base_path: PathBuf,
        index_symbol: impl Into<String>,
        volatility_symbol: impl Into<String>,
    ) -> Self {
        Self {
            base_path,
            index_symbol: index_symbol.into(),
            volatility_symbol: volatility_symbol.into(),
        }
    }

    pub fn from_config(config: &MarketConfig) -> Self {
        Self::new(
            config.data_dir.clone(),
            config.index_symbol.clone(),
            config.volatility_symbol.clone(),
        )
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    /// Closes for `symbol` sorted by date, or `None` when no file exists.
    pub fn read_closes(&self, symbol: &str) -> Result<Option<Vec<DailyClose>>, AgentError> {
        let path = self.csv_path(symbol);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AgentError::data_unavailable(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| AgentError::data_unavailable(format!("{}: {}", path.display(), e)))?
            .clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    AgentError::data_unavailable(format!(
                        "{}: missing {} column",
                        path.display(),
                        name
                    ))
                })
        };
        let date_col = column("date")?;
        let close_col = column("close")?;

        let mut closes = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| {
                AgentError::data_unavailable(format!("{}: CSV parse error: {}", path.display(), e))
            })?;

            let date_str = record.get(date_col).unwrap_or_default().trim();
            // Exports sometimes carry a time or zone after the date.
            let date_str = date_str.get(..10).unwrap_or(date_str);
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                AgentError::data_unavailable(format!(
                    "{}: invalid date {:?}: {}",
                    path.display(),
                    date_str,
                    e
                ))
            })?;

            let close_str = record.get(close_col).unwrap_or_default().trim();
            let close: f64 = close_str.parse().map_err(|e| {
                AgentError::data_unavailable(format!(
                    "{}: invalid close {:?}: {}",
                    path.display(),
                    close_str,
                    e
                ))
            })?;
            if !close.is_finite() {
                return Err(AgentError::data_unavailable(format!(
                    "{}: non-finite close {:?} on {}",
                    path.display(),
                    close_str,
                    date
                )));
            }

            closes.push(DailyClose { date, close });
        }

        closes.sort_by_key(|c| c.date);
        Ok(Some(closes))
    }
}

impl MarketDataPort for CsvMarketAdapter {
    fn fetch(&self) -> Result<MarketSnapshot, AgentError> {
        let index = self
            .read_closes(&self.index_symbol)?
            .filter(|closes| !closes.is_empty())
            .ok_or_else(|| {
                AgentError::data_unavailable(format!(
                    "no price history for {} in {}",
                    self.index_symbol,
                    self.base_path.display()
                ))
            })?;

        if index.len() < SMA_PERIOD {
            tracing::warn!(
                symbol = %self.index_symbol,
                bars = index.len(),
                needed = SMA_PERIOD,
                "price history too short for SMA(20)"
            );
        }
        let sma_20 = simple_moving_average(&index, SMA_PERIOD);
        let index_close = index.last().map(|c| c.close).unwrap_or(f64::NAN);

        let volatility_close = match self.read_closes(&self.volatility_symbol)? {
            Some(closes) => closes.last().map(|c| c.close),
            None => None,
        };
        if volatility_close.is_none() {
            tracing::warn!(symbol = %self.volatility_symbol, "no volatility close available");
        }

        Ok(MarketSnapshot {
            index_close,
            sma_20,
            volatility_close,
            timestamp: Local::now().to_rfc3339(),
        })
    }
}
