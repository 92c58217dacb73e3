//! Common AWS type definitions shared across the workspace.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Twelve ASCII digits. `\d` would also accept non-ASCII digits.
static ACCOUNT_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("account id pattern is a valid regex"));

/// AWS Account ID (12-digit string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account ID from a string.
    ///
    /// # Errors
    /// Returns an error if the account ID is not a 12-digit numeric string.
    pub fn new(id: impl Into<String>) -> Result<Self, crate::ConfigError> {
        let id = id.into();
        if !Self::is_valid(&id) {
            return Err(crate::ConfigError::InvalidAccountId(id));
        }
        Ok(Self(id))
    }

    /// Whether `id` has the shape of an AWS account id.
    #[must_use]
    pub fn is_valid(id: &str) -> bool {
        ACCOUNT_ID_PATTERN.is_match(id)
    }

    /// Get the account ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Target account and region for a synthesized stack.
///
/// Both values are opaque pass-through strings read from the environment;
/// the deployment platform is responsible for rejecting bad values.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeploymentEnv {
    /// Target account, if known.
    pub account: Option<String>,
    /// Target region, if known.
    pub region: Option<String>,
}

impl DeploymentEnv {
    /// Placeholder used when the account is not known at synthesis time.
    pub const UNKNOWN_ACCOUNT: &str = "unknown-account";
    /// Placeholder used when the region is not known at synthesis time.
    pub const UNKNOWN_REGION: &str = "unknown-region";

    /// Read `CDK_DEFAULT_ACCOUNT` and `CDK_DEFAULT_REGION`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            account: non_blank(lookup("CDK_DEFAULT_ACCOUNT")),
            region: non_blank(lookup("CDK_DEFAULT_REGION")),
        }
    }

    /// Environment string in the `aws://<account>/<region>` form.
    #[must_use]
    pub fn environment_string(&self) -> String {
        format!(
            "aws://{}/{}",
            self.account.as_deref().unwrap_or(Self::UNKNOWN_ACCOUNT),
            self.region.as_deref().unwrap_or(Self::UNKNOWN_REGION),
        )
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_valid_account_id() {
        let id = AccountId::new("677803207672").unwrap();
        assert_eq!(id.as_str(), "677803207672");
        assert_eq!(id.to_string(), "677803207672");
    }

    #[test]
    fn test_should_reject_invalid_account_id() {
        assert!(AccountId::new("12345").is_err());
        assert!(AccountId::new("abcdefghijkl").is_err());
        assert!(AccountId::new("1234567890123").is_err());
        assert!(AccountId::new(" 12345678901").is_err());
    }

    #[test]
    fn test_should_reject_non_ascii_digits() {
        // Arabic-Indic digits are Unicode decimal digits but not account ids.
        assert!(!AccountId::is_valid("١٢٣٤٥٦٧٨٩٠١٢"));
    }

    #[test]
    fn test_should_format_environment_string() {
        let env = DeploymentEnv {
            account: Some("677803207672".to_owned()),
            region: Some("eu-west-1".to_owned()),
        };
        assert_eq!(env.environment_string(), "aws://677803207672/eu-west-1");
    }

    #[test]
    fn test_should_read_deployment_target_from_env() {
        let env = DeploymentEnv::from_lookup(|key| match key {
            "CDK_DEFAULT_ACCOUNT" => Some("not-validated".to_owned()),
            "CDK_DEFAULT_REGION" => Some("ap-south-1".to_owned()),
            _ => None,
        });
        assert_eq!(env.account.as_deref(), Some("not-validated"));
        assert_eq!(env.environment_string(), "aws://not-validated/ap-south-1");

        let env = DeploymentEnv::from_lookup(|key| {
            (key == "CDK_DEFAULT_REGION").then(|| " ".to_owned())
        });
        assert_eq!(env, DeploymentEnv::default());
    }

    #[test]
    fn test_should_use_unknown_placeholders() {
        let env = DeploymentEnv::default();
        assert_eq!(
            env.environment_string(),
            "aws://unknown-account/unknown-region"
        );
    }
}
