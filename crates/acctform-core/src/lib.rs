//! Core types and configuration for AcctForm.
//!
//! This crate holds the pieces shared by every other AcctForm crate: the
//! account configuration with its merge and validation rules, the error
//! types, and small AWS identifier types.

mod config;
mod error;
mod types;

pub use config::{
    AccountConfig, AccountConfigOverrides, BillingAlerts, Budgets, DEFAULT_REGION,
    DEFAULT_RESOURCE_PREFIX, PLACEHOLDER_ALERT_EMAIL, effective_config,
};
pub use error::{AcctFormError, AcctFormResult, ConfigError};
pub use types::{AccountId, DeploymentEnv};
