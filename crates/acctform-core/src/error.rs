//! Error types for AcctForm.

/// Reasons an [`AccountConfig`](crate::AccountConfig) fails validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The alert email is empty or still the placeholder value.
    #[error("alert email is not configured; set a valid email address (got {0:?})")]
    MissingAlertEmail(String),

    /// The alert email has no `@`.
    #[error("invalid email address format: {0:?}")]
    InvalidAlertEmail(String),

    /// The account id is present but not 12 digits.
    #[error("AWS account ID must be exactly 12 digits (got {0:?})")]
    InvalidAccountId(String),

    /// A threshold or budget limit is NaN or infinite.
    #[error("{field} must be a finite number (got {value})")]
    NonFiniteValue {
        /// JSON name of the offending field.
        field: &'static str,
        /// The configured value.
        value: f64,
    },

    /// Low billing threshold is not below the medium one.
    #[error("low threshold ({low}) must be less than medium threshold ({medium})")]
    LowThresholdNotBelowMedium {
        /// Configured low threshold.
        low: f64,
        /// Configured medium threshold.
        medium: f64,
    },

    /// Medium billing threshold is not below the high one.
    #[error("medium threshold ({medium}) must be less than high threshold ({high})")]
    MediumThresholdNotBelowHigh {
        /// Configured medium threshold.
        medium: f64,
        /// Configured high threshold.
        high: f64,
    },

    /// A budget limit is zero or negative.
    #[error(
        "budget limits must be positive numbers (monthly: {monthly_limit}, quarterly: {quarterly_limit})"
    )]
    NonPositiveBudget {
        /// Configured monthly limit.
        monthly_limit: f64,
        /// Configured quarterly limit.
        quarterly_limit: f64,
    },
}

/// Top-level error type for AcctForm.
#[derive(Debug, thiserror::Error)]
pub enum AcctFormError {
    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Two constructs share an id within the same scope.
    #[error("there is already a construct with id {id:?} in scope {scope:?}")]
    DuplicateConstructId {
        /// Path of the enclosing scope.
        scope: String,
        /// The conflicting id.
        id: String,
    },

    /// Reading overrides or writing the artifact failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience result type for AcctForm operations.
pub type AcctFormResult<T> = Result<T, AcctFormError>;
