use std::{env, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, Result};

use crate::{
    asset::{default_assets, parse_assets, Asset},
    datasources::DEFAULT_ENDPOINT,
    status::DEFAULT_LABEL,
    widget::{RetryPolicy, WidgetConfig},
};

/// Everything the binary needs, read from `TICKER_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub assets: Vec<Asset>,
    pub request_timeout: Duration,
    pub output: PathBuf,
    pub widget: WidgetConfig,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Unset or blank variables fall back to defaults; anything else must parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let secs = |key: &str, default: u64| -> Result<Duration> {
            Ok(Duration::from_secs(parse_var(key, get(key), default)?))
        };

        let assets = match get("TICKER_ASSETS") {
            Some(list) => parse_assets(&list)?,
            None => default_assets(),
        };
        let refresh_interval = secs("TICKER_REFRESH_SECS", 30)?;
        let clock_interval = secs("TICKER_CLOCK_SECS", 1)?;
        if refresh_interval.as_secs() == 0 || clock_interval.as_secs() == 0 {
            return Err(anyhow!("Refresh and clock intervals must be positive"));
        }
        let max_attempts: u32 = parse_var("TICKER_RETRY_ATTEMPTS", get("TICKER_RETRY_ATTEMPTS"), 2)?;
        if max_attempts == 0 {
            return Err(anyhow!("TICKER_RETRY_ATTEMPTS must be at least 1"));
        }

        Ok(Config {
            api_url: get("TICKER_API_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()),
            assets,
            request_timeout: secs("TICKER_TIMEOUT_SECS", 10)?,
            output: PathBuf::from(get("TICKER_OUTPUT").unwrap_or_else(|| "ticker.html".to_owned())),
            widget: WidgetConfig {
                refresh_interval,
                clock_interval,
                copies: parse_var("TICKER_COPIES", get("TICKER_COPIES"), 3)?,
                retry: RetryPolicy {
                    max_attempts,
                    initial_backoff: secs("TICKER_RETRY_BACKOFF_SECS", 5)?,
                    ..RetryPolicy::default()
                },
                label: get("TICKER_LABEL").unwrap_or_else(|| DEFAULT_LABEL.to_owned()),
            },
        })
    }
}

fn parse_var<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid value '{}' for {}: {}", v, key, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.api_url, DEFAULT_ENDPOINT);
        assert_eq!(config.assets, default_assets());
        assert_eq!(config.widget.refresh_interval, Duration::from_secs(30));
        assert_eq!(config.widget.clock_interval, Duration::from_secs(1));
        assert_eq!(config.widget.copies, 3);
        assert_eq!(config.widget.retry.max_attempts, 2);
        assert_eq!(config.widget.retry.initial_backoff, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.output, PathBuf::from("ticker.html"));
        assert_eq!(config.widget.label, DEFAULT_LABEL);
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("TICKER_ASSETS", "bitcoin:BTC"),
            ("TICKER_REFRESH_SECS", " 60 "),
            ("TICKER_COPIES", "2"),
            ("TICKER_LABEL", "Desk"),
            ("TICKER_OUTPUT", ""),
        ])
        .unwrap();
        assert_eq!(config.assets, vec![Asset::new("bitcoin", "BTC", "BTC")]);
        assert_eq!(config.widget.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.widget.copies, 2);
        assert_eq!(config.widget.label, "Desk");
        assert_eq!(config.output, PathBuf::from("ticker.html"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("TICKER_REFRESH_SECS", "soon")]).is_err());
        assert!(config(&[("TICKER_REFRESH_SECS", "0")]).is_err());
        assert!(config(&[("TICKER_RETRY_ATTEMPTS", "0")]).is_err());
        assert!(config(&[("TICKER_ASSETS", "bitcoin")]).is_err());
    }
}
