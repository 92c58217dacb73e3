//! Monthly and quarterly cost budgets with email notifications.

use std::collections::BTreeMap;

use acctform_core::{AccountConfig, AccountConfigOverrides, AcctFormResult, effective_config};
use acctform_model::Resource;
use acctform_model::budgets::{
    BudgetComparison, BudgetData, BudgetProperties, BudgetType, Notification, NotificationType,
    NotificationWithSubscribers, Spend, Subscriber, SubscriptionType, ThresholdType, TimeUnit,
};
use tracing::debug;

use crate::construct::{Construct, ConstructPath, Declaration};

/// Service the monthly budget is restricted to.
const MONTHLY_BUDGET_SERVICE: &str = "Amazon Elastic Compute Cloud - Compute";

/// Notify once actual spend passes 80 % of the monthly limit.
const MONTHLY_ACTUAL_PERCENT: f64 = 80.0;
/// Notify once forecasted spend passes the monthly limit.
const MONTHLY_FORECAST_PERCENT: f64 = 100.0;
/// Notify once actual spend passes 90 % of the quarterly limit.
const QUARTERLY_ACTUAL_PERCENT: f64 = 90.0;

/// One `AWS::Budgets::Budget`.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    resource_path: ConstructPath,
    properties: BudgetProperties,
}

impl Budget {
    /// Logical id in the template.
    #[must_use]
    pub fn logical_id(&self) -> String {
        self.resource_path.logical_id()
    }

    /// The budget properties.
    #[must_use]
    pub fn properties(&self) -> &BudgetProperties {
        &self.properties
    }

    fn declaration(&self) -> Declaration {
        Declaration {
            path: self.resource_path.clone(),
            resource: Resource::Budget(self.properties.clone()),
        }
    }
}

fn email_notification(
    notification_type: NotificationType,
    percent: f64,
    address: &str,
) -> NotificationWithSubscribers {
    NotificationWithSubscribers {
        notification: Notification {
            comparison_operator: BudgetComparison::GreaterThan,
            notification_type,
            threshold: percent,
            threshold_type: Some(ThresholdType::Percentage),
        },
        subscribers: vec![Subscriber {
            address: address.to_owned(),
            subscription_type: SubscriptionType::Email,
        }],
    }
}

/// The monthly and quarterly budgets.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingLimits {
    path: ConstructPath,
    /// Monthly EC2 compute budget.
    pub monthly_budget: Budget,
    /// Quarterly budget over all services.
    pub quarterly_budget: Budget,
}

impl SpendingLimits {
    /// Resolve `overrides` against the defaults, validate, and declare.
    ///
    /// # Errors
    ///
    /// Fails when the effective configuration does not validate.
    pub fn new(
        scope: &ConstructPath,
        id: &str,
        overrides: &AccountConfigOverrides,
    ) -> AcctFormResult<Self> {
        let config = effective_config(overrides);
        config.validate()?;
        Ok(Self::from_config(scope, id, &config))
    }

    /// Declare from an already validated configuration.
    #[must_use]
    pub fn from_config(scope: &ConstructPath, id: &str, config: &AccountConfig) -> Self {
        let path = scope.child(id);
        let email = config.alert_email.as_str();

        let monthly_budget = Budget {
            resource_path: path.child("MonthlyBudget"),
            properties: BudgetProperties {
                budget: BudgetData {
                    budget_limit: Some(Spend::usd(config.budgets.monthly_limit)),
                    budget_name: Some(format!("{}-monthly-budget", config.resource_prefix)),
                    budget_type: BudgetType::Cost,
                    cost_filters: BTreeMap::from([(
                        "Service".to_owned(),
                        vec![MONTHLY_BUDGET_SERVICE.to_owned()],
                    )]),
                    time_unit: TimeUnit::Monthly,
                },
                notifications_with_subscribers: vec![
                    email_notification(NotificationType::Actual, MONTHLY_ACTUAL_PERCENT, email),
                    email_notification(
                        NotificationType::Forecasted,
                        MONTHLY_FORECAST_PERCENT,
                        email,
                    ),
                ],
            },
        };

        let quarterly_budget = Budget {
            resource_path: path.child("QuarterlyBudget"),
            properties: BudgetProperties {
                budget: BudgetData {
                    budget_limit: Some(Spend::usd(config.budgets.quarterly_limit)),
                    budget_name: Some(format!("{}-quarterly-budget", config.resource_prefix)),
                    budget_type: BudgetType::Cost,
                    cost_filters: BTreeMap::new(),
                    time_unit: TimeUnit::Quarterly,
                },
                notifications_with_subscribers: vec![email_notification(
                    NotificationType::Actual,
                    QUARTERLY_ACTUAL_PERCENT,
                    email,
                )],
            },
        };

        debug!(
            scope = %path,
            monthly_limit = config.budgets.monthly_limit,
            quarterly_limit = config.budgets.quarterly_limit,
            "declared budgets"
        );

        Self {
            path,
            monthly_budget,
            quarterly_budget,
        }
    }
}

impl Construct for SpendingLimits {
    fn path(&self) -> &ConstructPath {
        &self.path
    }

    fn declarations(&self) -> Vec<Declaration> {
        vec![
            self.monthly_budget.declaration(),
            self.quarterly_budget.declaration(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use acctform_core::{AcctFormError, Budgets, ConfigError};
    use serde_json::json;

    use super::*;

    fn limits() -> SpendingLimits {
        let config = AccountConfig::builder().alert_email("a@b.com").build();
        SpendingLimits::from_config(&ConstructPath::root(), "SpendingLimits", &config)
    }

    #[test]
    fn test_should_declare_monthly_budget() {
        let limits = limits();
        let budget = &limits.monthly_budget.properties().budget;
        assert_eq!(budget.budget_name.as_deref(), Some("personal-monthly-budget"));
        assert_eq!(budget.time_unit, TimeUnit::Monthly);
        assert_eq!(budget.budget_limit, Some(Spend::usd(50.0)));
        assert_eq!(
            budget.cost_filters["Service"],
            vec!["Amazon Elastic Compute Cloud - Compute"]
        );
    }

    #[test]
    fn test_should_notify_on_actual_and_forecasted_monthly_spend() {
        let limits = limits();
        let value = serde_json::to_value(limits.monthly_budget.properties()).unwrap();
        let notifications = &value["NotificationsWithSubscribers"];
        assert_eq!(
            notifications[0]["Notification"],
            json!({
                "ComparisonOperator": "GREATER_THAN",
                "NotificationType": "ACTUAL",
                "Threshold": 80.0,
                "ThresholdType": "PERCENTAGE"
            })
        );
        assert_eq!(notifications[1]["Notification"]["NotificationType"], "FORECASTED");
        assert_eq!(notifications[1]["Notification"]["Threshold"], 100.0);
        assert_eq!(
            notifications[0]["Subscribers"],
            json!([{"Address": "a@b.com", "SubscriptionType": "EMAIL"}])
        );
    }

    #[test]
    fn test_should_declare_quarterly_budget_without_filters() {
        let limits = limits();
        let props = limits.quarterly_budget.properties();
        assert_eq!(props.budget.time_unit, TimeUnit::Quarterly);
        assert_eq!(props.budget.budget_limit, Some(Spend::usd(150.0)));
        assert!(props.budget.cost_filters.is_empty());
        assert_eq!(props.notifications_with_subscribers.len(), 1);
        assert_eq!(
            props.notifications_with_subscribers[0].notification.threshold,
            90.0
        );
    }

    #[test]
    fn test_should_use_logical_ids_without_resource_suffix() {
        let limits = limits();
        assert!(
            limits
                .monthly_budget
                .logical_id()
                .starts_with("SpendingLimitsMonthlyBudget")
        );
    }

    #[test]
    fn test_should_reject_non_positive_budget_overrides() {
        let overrides = AccountConfigOverrides {
            alert_email: Some("a@b.com".to_owned()),
            budgets: Some(Budgets {
                monthly_limit: 0.0,
                quarterly_limit: 150.0,
            }),
            ..AccountConfigOverrides::default()
        };
        let result = SpendingLimits::new(&ConstructPath::root(), "SpendingLimits", &overrides);
        assert!(matches!(
            result,
            Err(AcctFormError::Config(ConfigError::NonPositiveBudget { .. }))
        ));
    }
}
