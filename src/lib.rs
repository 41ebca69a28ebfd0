// Customer Rewards - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod model;
pub mod points;
pub mod rewards;
pub mod service;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::{init_tracing, Config};
pub use db::{setup_database, CustomerStore, SqliteStore};
pub use error::{ErrorKind, Result, RewardsError};
pub use model::{Customer, NewCustomer, NewTransaction, Transaction, ValidTransaction};
pub use points::points;
pub use rewards::{aggregate, month_name, MonthlyPoints, RewardsReport, RewardsSummary};
pub use service::RewardsService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
