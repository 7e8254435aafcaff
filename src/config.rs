// ⚙️ Configuration - where data lives and how the dashboard is sized
//
// Precedence: defaults → environment → CLI flags (applied by the binary).

use log::warn;
use std::env;
use std::path::PathBuf;

use crate::aggregator::DEFAULT_MONTH_COUNT;

pub const ENV_DB_PATH: &str = "FINANCE_TRACKER_DB";
pub const ENV_EXPORT_DIR: &str = "FINANCE_TRACKER_EXPORT_DIR";
pub const ENV_MONTHS: &str = "FINANCE_TRACKER_MONTHS";

const APP_DIR: &str = "finance-tracker";
const DB_FILE: &str = "finance.db";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub export_dir: PathBuf,
    pub dashboard_months: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: default_db_path(),
            export_dir: PathBuf::from("."),
            dashboard_months: DEFAULT_MONTH_COUNT,
        }
    }
}

/// `<data dir>/finance-tracker/finance.db`, or the working directory if the
/// platform has no data directory
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DB_FILE)
}

impl Config {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(dir) = lookup(ENV_EXPORT_DIR).filter(|v| !v.trim().is_empty()) {
            config.export_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(ENV_MONTHS) {
            match raw.trim().parse::<usize>() {
                Ok(months) if months > 0 => config.dashboard_months = months,
                _ => warn!(
                    "Ignoring {}='{}', using {} months",
                    ENV_MONTHS, raw, config.dashboard_months
                ),
            }
        }

        config
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
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[]));

        assert_eq!(config.dashboard_months, 6);
        assert_eq!(config.export_dir, PathBuf::from("."));
        assert!(config.db_path.ends_with("finance.db"));
    }

    #[test]
    fn test_environment_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/tmp/finance/test.db"),
            (ENV_EXPORT_DIR, "/tmp/exports"),
            (ENV_MONTHS, "12"),
        ]));

        assert_eq!(config.db_path, PathBuf::from("/tmp/finance/test.db"));
        assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(config.dashboard_months, 12);
    }

    #[test]
    fn test_invalid_months_fall_back() {
        for raw in ["zero", "0", "-3"] {
            let config = Config::from_lookup(lookup_from(&[(ENV_MONTHS, raw)]));
            assert_eq!(config.dashboard_months, DEFAULT_MONTH_COUNT);
        }
    }
}
