//! AWS Budgets resource properties.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What a budget tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetType {
    Cost,
    Usage,
    RiUtilization,
    RiCoverage,
    SavingsPlansUtilization,
    SavingsPlansCoverage,
}

/// Budget reset period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    Daily,
    Monthly,
    Quarterly,
    Annually,
}

/// Whether a notification fires on actual or forecasted spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    Actual,
    Forecasted,
}

/// Comparison between spend and the notification threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetComparison {
    GreaterThan,
    LessThan,
    EqualTo,
}

/// Whether the threshold is a percentage of the limit or an absolute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThresholdType {
    Percentage,
    AbsoluteValue,
}

/// Notification delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionType {
    Email,
    Sns,
}

/// An amount of money.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Spend {
    pub amount: f64,
    pub unit: String,
}

impl Spend {
    /// Amount in US dollars.
    #[must_use]
    pub fn usd(amount: f64) -> Self {
        Self {
            amount,
            unit: "USD".to_owned(),
        }
    }
}

/// The budget definition itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BudgetData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_limit: Option<Spend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_name: Option<String>,
    pub budget_type: BudgetType,
    /// Filter name (e.g. `Service`) -> accepted values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cost_filters: BTreeMap<String, Vec<String>>,
    pub time_unit: TimeUnit,
}

/// Trigger for a budget notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Notification {
    pub comparison_operator: BudgetComparison,
    pub notification_type: NotificationType,
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_type: Option<ThresholdType>,
}

/// Recipient of a budget notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Subscriber {
    pub address: String,
    pub subscription_type: SubscriptionType,
}

/// A notification with the recipients it is sent to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotificationWithSubscribers {
    pub notification: Notification,
    pub subscribers: Vec<Subscriber>,
}

/// `AWS::Budgets::Budget` properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BudgetProperties {
    pub budget: BudgetData,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notifications_with_subscribers: Vec<NotificationWithSubscribers>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_use_screaming_case_wire_values() {
        assert_eq!(serde_json::to_value(BudgetType::Cost).unwrap(), "COST");
        assert_eq!(serde_json::to_value(TimeUnit::Quarterly).unwrap(), "QUARTERLY");
        assert_eq!(
            serde_json::to_value(BudgetComparison::GreaterThan).unwrap(),
            "GREATER_THAN"
        );
        assert_eq!(
            serde_json::to_value(ThresholdType::Percentage).unwrap(),
            "PERCENTAGE"
        );
    }
}
