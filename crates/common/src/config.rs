use std::path::PathBuf;

use crate::{Error, Result, Timeframe};

/// Process configuration loaded from environment variables at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Instrument the candle window belongs to, e.g. "BTC/USDC".
    pub pair: String,
    pub timeframe: Timeframe,
    /// Number of trailing candles requested from the candle source.
    pub data_limit: usize,

    /// Default `tracing` filter directive when `RUST_LOG` is not set.
    pub log_level: String,

    pub indicator_config_path: PathBuf,
    pub candle_file: PathBuf,
}

impl Config {
    /// Load configuration from environment variables, reading `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeframe = lookup("SENTINEL_TIMEFRAME")
            .unwrap_or_else(|| "2h".to_string())
            .parse::<Timeframe>()?;

        let data_limit = match lookup("SENTINEL_DATA_LIMIT") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                Error::Config(format!(
                    "SENTINEL_DATA_LIMIT must be a positive integer, got '{raw}'"
                ))
            })?,
            None => 200,
        };
        if data_limit == 0 {
            return Err(Error::Config("SENTINEL_DATA_LIMIT must be greater than zero".into()));
        }

        let candle_file = lookup("SENTINEL_CANDLE_FILE").ok_or_else(|| {
            Error::Config(
                "Required environment variable 'SENTINEL_CANDLE_FILE' is not set. \
                 Check your .env file."
                    .into(),
            )
        })?;

        Ok(Config {
            pair: lookup("SENTINEL_PAIR").unwrap_or_else(|| "BTC/USDC".to_string()),
            timeframe,
            data_limit,
            log_level: lookup("SENTINEL_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            indicator_config_path: lookup("SENTINEL_INDICATOR_CONFIG")
                .unwrap_or_else(|| "config/indicators.toml".to_string())
                .into(),
            candle_file: candle_file.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_candle_file_is_set() {
        let cfg =
            Config::from_lookup(lookup(&[("SENTINEL_CANDLE_FILE", "data/btc.json")])).unwrap();
        assert_eq!(cfg.pair, "BTC/USDC");
        assert_eq!(cfg.timeframe, Timeframe::Hour2);
        assert_eq!(cfg.data_limit, 200);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.indicator_config_path, PathBuf::from("config/indicators.toml"));
    }

    #[test]
    fn missing_candle_file_is_a_config_error() {
        assert!(matches!(Config::from_lookup(lookup(&[])), Err(Error::Config(_))));
    }

    #[test]
    fn invalid_limit_is_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("SENTINEL_CANDLE_FILE", "x.json"),
            ("SENTINEL_DATA_LIMIT", "many"),
        ]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn unknown_timeframe_is_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("SENTINEL_CANDLE_FILE", "x.json"),
            ("SENTINEL_TIMEFRAME", "2y"),
        ]));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
