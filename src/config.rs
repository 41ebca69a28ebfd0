//! Runtime configuration read from the environment.
//!
//! | Variable            | Default        |
//! |---------------------|----------------|
//! | `REWARDS_DB_PATH`   | `rewards.db`   |
//! | `REWARDS_BIND_ADDR` | `0.0.0.0:3000` |
//! | `REWARDS_LOG`       | `info`         |

use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const DB_PATH_ENV_VAR: &str = "REWARDS_DB_PATH";
pub const BIND_ADDR_ENV_VAR: &str = "REWARDS_BIND_ADDR";
pub const LOG_ENV_VAR: &str = "REWARDS_LOG";

const DEFAULT_DB_PATH: &str = "rewards.db";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite database file
    pub db_path: PathBuf,
    /// Address the HTTP server listens on
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            db_path: get(DB_PATH_ENV_VAR).map(PathBuf::from).unwrap_or(defaults.db_path),
            bind_addr: get(BIND_ADDR_ENV_VAR).unwrap_or(defaults.bind_addr),
        }
    }
}

/// Initialize tracing with the REWARDS_LOG environment variable.
///
/// Defaults to "info" level if REWARDS_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
