//! Runtime configuration read from the environment.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_ROSTER_PATH: &str = "data/roster.json";
pub const DEFAULT_STORAGE_PATH: &str = "data/attributes.json";
pub const DEFAULT_LOG_FILTER: &str = "info";

pub const BIND_ENV: &str = "BATTLE_SUMMARY_BIND";
pub const ROSTER_ENV: &str = "BATTLE_SUMMARY_ROSTER";
pub const STORAGE_ENV: &str = "BATTLE_SUMMARY_STORAGE";
pub const LOG_ENV: &str = "BATTLE_SUMMARY_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub roster_path: PathBuf,
    pub storage_path: PathBuf,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            roster_path: PathBuf::from(DEFAULT_ROSTER_PATH),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; blank values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();
        Self {
            bind_addr: get(BIND_ENV).unwrap_or(defaults.bind_addr),
            roster_path: get(ROSTER_ENV).map(PathBuf::from).unwrap_or(defaults.roster_path),
            storage_path: get(STORAGE_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            log_filter: get(LOG_ENV).unwrap_or(defaults.log_filter),
        }
    }
}
