use std::env;
use std::str::FromStr;

use thiserror::Error;

/// Longest availability window a single query may ask for
pub const DEFAULT_MAX_AVAILABILITY_DAYS: u32 = 31;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Upper bound on the number of days an availability query may span
    pub max_availability_days: u32,
    /// Sustained request rate for mutating booking/review routes, per client IP
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
    /// Apply the bundled SQL schema at startup (idempotent)
    pub apply_schema: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            port: parse_or(&lookup, "PORT", 8080)?,
            max_availability_days: parse_or(
                &lookup,
                "MAX_AVAILABILITY_DAYS",
                DEFAULT_MAX_AVAILABILITY_DAYS,
            )?,
            rate_limit_per_second: parse_or(&lookup, "RATE_LIMIT_PER_SECOND", 5)?,
            rate_limit_burst: parse_or(&lookup, "RATE_LIMIT_BURST", 10)?,
            apply_schema: parse_or(&lookup, "APPLY_SCHEMA", true)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config =
            Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://db/test")])).unwrap();
        assert_eq!(config.database_url, "postgres://db/test");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_availability_days, DEFAULT_MAX_AVAILABILITY_DAYS);
        assert_eq!(config.rate_limit_per_second, 5);
        assert_eq!(config.rate_limit_burst, 10);
        assert!(config.apply_schema);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::Missing("DATABASE_URL"))));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/test"),
            ("PORT", "9000"),
            ("MAX_AVAILABILITY_DAYS", "7"),
            ("APPLY_SCHEMA", "false"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_availability_days, 7);
        assert!(!config.apply_schema);
    }

    #[test]
    fn invalid_number_is_reported_with_its_key() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/test"),
            ("PORT", "eighty"),
        ]));
        match result {
            Err(ConfigError::Invalid { key, value }) => {
                assert_eq!(key, "PORT");
                assert_eq!(value, "eighty");
            }
            _ => panic!("expected invalid PORT"),
        }
    }
}
