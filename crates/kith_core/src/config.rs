//! Runtime configuration resolved from environment-style lookups.
//!
//! # Invariants
//! - Resolution is pure over the lookup function, so tests can inject maps.
//! - Logging stays disabled unless `KITH_LOG_DIR` is set.

use crate::logging::{default_log_level, LoggingConfig};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "KITH_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "KITH_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "KITH_LOG_DIR";
pub const ENV_STORAGE_QUOTA_BYTES: &str = "KITH_STORAGE_QUOTA_BYTES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing required setting `{key}`"),
            Self::Invalid { key, message } => write!(f, "invalid setting `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KithConfig {
    pub db_path: PathBuf,
    pub logging: Option<LoggingConfig>,
    pub storage_quota_bytes: Option<usize>,
}

impl KithConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(ENV_DB_PATH)
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing(ENV_DB_PATH))?;

        let logging = match read(ENV_LOG_DIR) {
            Some(dir) => {
                let level = read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());
                Some(
                    LoggingConfig::new(&level, dir)
                        .map_err(|message| ConfigError::Invalid {
                            key: ENV_LOG_DIR,
                            message,
                        })?,
                )
            }
            None => None,
        };

        let storage_quota_bytes = match read(ENV_STORAGE_QUOTA_BYTES) {
            Some(raw) => Some(parse_quota(&raw)?),
            None => None,
        };

        Ok(Self {
            db_path,
            logging,
            storage_quota_bytes,
        })
    }
}

fn parse_quota(raw: &str) -> Result<usize, ConfigError> {
    match raw.parse::<usize>() {
        Ok(0) => Err(ConfigError::Invalid {
            key: ENV_STORAGE_QUOTA_BYTES,
            message: "must be greater than zero".to_string(),
        }),
        Ok(value) => Ok(value),
        Err(err) => Err(ConfigError::Invalid {
            key: ENV_STORAGE_QUOTA_BYTES,
            message: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, KithConfig, ENV_DB_PATH, ENV_STORAGE_QUOTA_BYTES};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn db_path_is_required() {
        let err = KithConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_DB_PATH));
    }

    #[test]
    fn logging_is_off_without_log_dir() {
        let config = KithConfig::from_lookup(lookup(&[("KITH_DB_PATH", "/tmp/kith.db")])).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/kith.db"));
        assert!(config.logging.is_none());
        assert!(config.storage_quota_bytes.is_none());
    }

    #[test]
    fn log_level_and_quota_are_parsed() {
        let config = KithConfig::from_lookup(lookup(&[
            ("KITH_DB_PATH", "/tmp/kith.db"),
            ("KITH_LOG_DIR", "/tmp/kith-logs"),
            ("KITH_LOG_LEVEL", "WARN"),
            ("KITH_STORAGE_QUOTA_BYTES", "5242880"),
        ]))
        .unwrap();
        assert_eq!(config.logging.unwrap().level(), "warn");
        assert_eq!(config.storage_quota_bytes, Some(5_242_880));
    }

    #[test]
    fn zero_quota_is_rejected() {
        let err = KithConfig::from_lookup(lookup(&[
            ("KITH_DB_PATH", "/tmp/kith.db"),
            ("KITH_STORAGE_QUOTA_BYTES", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: ENV_STORAGE_QUOTA_BYTES,
                ..
            }
        ));
    }
}
