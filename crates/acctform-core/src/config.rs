//! Account configuration for AcctForm.
//!
//! [`AccountConfig`] carries the parameters every construct reads: the alert
//! address, billing alarm thresholds, budget limits, and naming. Callers
//! start from [`AccountConfig::default`] and overlay an
//! [`AccountConfigOverrides`]; the result is checked with
//! [`AccountConfig::validate`] before any resource is built from it.
//!
//! Overrides replace fields at the first level. `billingAlerts` and
//! `budgets` are replaced as whole groups, so supplying a group means
//! supplying all of its members.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

use crate::error::{AcctFormResult, ConfigError};
use crate::types::{AccountId, non_blank};

/// Alert address shipped in the defaults. Validation rejects it.
pub const PLACEHOLDER_ALERT_EMAIL: &str = "your-email@example.com";

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default prefix for resource names and default environment label.
pub const DEFAULT_RESOURCE_PREFIX: &str = "personal";

/// Billing alarm thresholds in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillingAlerts {
    /// Early warning threshold.
    #[serde(rename = "lowThreshold")]
    pub low: f64,
    /// High usage threshold.
    #[serde(rename = "mediumThreshold")]
    pub medium: f64,
    /// Critical threshold.
    #[serde(rename = "highThreshold")]
    pub high: f64,
}

impl Default for BillingAlerts {
    fn default() -> Self {
        Self {
            low: 10.0,
            medium: 25.0,
            high: 50.0,
        }
    }
}

/// Recurring budget limits in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budgets {
    /// Monthly cost ceiling.
    pub monthly_limit: f64,
    /// Quarterly cost ceiling.
    pub quarterly_limit: f64,
}

impl Default for Budgets {
    fn default() -> Self {
        Self {
            monthly_limit: 50.0,
            quarterly_limit: 150.0,
        }
    }
}

/// Account-wide parameters consumed by the constructs.
///
/// # Examples
///
/// ```
/// use acctform_core::AccountConfig;
///
/// let config = AccountConfig::builder()
///     .alert_email("ops@example.org")
///     .account_id("677803207672")
///     .build();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.billing_alerts.medium, 25.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct AccountConfig {
    /// Address that receives alarm and budget notifications.
    #[builder(default = String::from(PLACEHOLDER_ALERT_EMAIL), setter(into))]
    pub alert_email: String,

    /// Target account id. Left unset, the deployment target decides.
    #[serde(rename = "awsAccountId", default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option, into))]
    pub account_id: Option<String>,

    /// Target region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default = Some(String::from(DEFAULT_REGION)))]
    pub region: Option<String>,

    /// Billing alarm thresholds.
    #[builder(default)]
    pub billing_alerts: BillingAlerts,

    /// Budget limits.
    #[builder(default)]
    pub budgets: Budgets,

    /// Prefix for generated resource names (topics, budgets).
    #[builder(default = String::from(DEFAULT_RESOURCE_PREFIX), setter(into))]
    pub resource_prefix: String,

    /// Free-form environment label.
    #[builder(default = String::from(DEFAULT_RESOURCE_PREFIX), setter(into))]
    pub environment: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AccountConfig {
    /// Overlay `overrides` on this configuration.
    ///
    /// Every field set in `overrides` wins; unset fields keep their current
    /// value. Grouped fields are replaced whole.
    #[must_use]
    pub fn with_overrides(self, overrides: &AccountConfigOverrides) -> Self {
        Self {
            alert_email: overrides.alert_email.clone().unwrap_or(self.alert_email),
            account_id: overrides.account_id.clone().or(self.account_id),
            region: overrides.region.clone().or(self.region),
            billing_alerts: overrides.billing_alerts.unwrap_or(self.billing_alerts),
            budgets: overrides.budgets.unwrap_or(self.budgets),
            resource_prefix: overrides
                .resource_prefix
                .clone()
                .unwrap_or(self.resource_prefix),
            environment: overrides.environment.clone().unwrap_or(self.environment),
        }
    }

    /// Check the configuration before it is used to build resources.
    ///
    /// Checks run in a fixed order and the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] describing the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alert_email.is_empty() || self.alert_email == PLACEHOLDER_ALERT_EMAIL {
            return Err(ConfigError::MissingAlertEmail(self.alert_email.clone()));
        }
        if !self.alert_email.contains('@') {
            return Err(ConfigError::InvalidAlertEmail(self.alert_email.clone()));
        }

        if let Some(id) = &self.account_id {
            AccountId::new(id.as_str())?;
        }

        let BillingAlerts { low, medium, high } = self.billing_alerts;
        let Budgets {
            monthly_limit,
            quarterly_limit,
        } = self.budgets;
        for (field, value) in [
            ("lowThreshold", low),
            ("mediumThreshold", medium),
            ("highThreshold", high),
            ("monthlyLimit", monthly_limit),
            ("quarterlyLimit", quarterly_limit),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteValue { field, value });
            }
        }

        if low >= medium {
            return Err(ConfigError::LowThresholdNotBelowMedium { low, medium });
        }
        if medium >= high {
            return Err(ConfigError::MediumThresholdNotBelowHigh { medium, high });
        }
        if monthly_limit <= 0.0 || quarterly_limit <= 0.0 {
            return Err(ConfigError::NonPositiveBudget {
                monthly_limit,
                quarterly_limit,
            });
        }

        Ok(())
    }
}

/// The default configuration with `overrides` applied.
#[must_use]
pub fn effective_config(overrides: &AccountConfigOverrides) -> AccountConfig {
    AccountConfig::default().with_overrides(overrides)
}

/// A partial [`AccountConfig`]. Unset fields fall through to the base value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AccountConfigOverrides {
    /// Replacement alert address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_email: Option<String>,
    /// Replacement account id.
    #[serde(rename = "awsAccountId", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Replacement region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Replacement threshold group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_alerts: Option<BillingAlerts>,
    /// Replacement budget group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budgets: Option<Budgets>,
    /// Replacement resource prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_prefix: Option<String>,
    /// Replacement environment label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

impl AccountConfigOverrides {
    /// Load overrides from environment variables.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `ACCTFORM_ALERT_EMAIL` | `alertEmail` |
    /// | `ACCTFORM_ACCOUNT_ID` | `awsAccountId` |
    /// | `ACCTFORM_REGION` | `region` |
    /// | `ACCTFORM_BILLING_ALERTS` | `billingAlerts` as `low,medium,high` |
    /// | `ACCTFORM_BUDGETS` | `budgets` as `monthly,quarterly` |
    /// | `ACCTFORM_RESOURCE_PREFIX` | `resourcePrefix` |
    /// | `ACCTFORM_ENVIRONMENT` | `environment` |
    ///
    /// Malformed numeric groups are skipped with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    /// Blank values count as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| non_blank(lookup(key));

        let billing_alerts = var("ACCTFORM_BILLING_ALERTS").and_then(|v| {
            let parsed = parse_billing_alerts(&v);
            if parsed.is_none() {
                warn!(value = %v, "ignoring malformed ACCTFORM_BILLING_ALERTS, expected low,medium,high");
            }
            parsed
        });
        let budgets = var("ACCTFORM_BUDGETS").and_then(|v| {
            let parsed = parse_budgets(&v);
            if parsed.is_none() {
                warn!(value = %v, "ignoring malformed ACCTFORM_BUDGETS, expected monthly,quarterly");
            }
            parsed
        });

        Self {
            alert_email: var("ACCTFORM_ALERT_EMAIL"),
            account_id: var("ACCTFORM_ACCOUNT_ID"),
            region: var("ACCTFORM_REGION"),
            billing_alerts,
            budgets,
            resource_prefix: var("ACCTFORM_RESOURCE_PREFIX"),
            environment: var("ACCTFORM_ENVIRONMENT"),
        }
    }

    /// Parse overrides from a JSON document.
    pub fn from_json_str(json: &str) -> AcctFormResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load overrides from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> AcctFormResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading configuration overrides");
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            alert_email: other.alert_email.or(self.alert_email),
            account_id: other.account_id.or(self.account_id),
            region: other.region.or(self.region),
            billing_alerts: other.billing_alerts.or(self.billing_alerts),
            budgets: other.budgets.or(self.budgets),
            resource_prefix: other.resource_prefix.or(self.resource_prefix),
            environment: other.environment.or(self.environment),
        }
    }

    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn parse_numbers<const N: usize>(value: &str) -> Option<[f64; N]> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|p| p.trim().parse::<f64>().ok().filter(|n| n.is_finite()))
        .collect::<Option<_>>()?;
    parts.try_into().ok()
}

fn parse_billing_alerts(value: &str) -> Option<BillingAlerts> {
    let [low, medium, high] = parse_numbers::<3>(value)?;
    Some(BillingAlerts { low, medium, high })
}

fn parse_budgets(value: &str) -> Option<Budgets> {
    let [monthly_limit, quarterly_limit] = parse_numbers::<2>(value)?;
    Some(Budgets {
        monthly_limit,
        quarterly_limit,
    })
}
