//! Billing alarms on estimated charges, delivered through an SNS topic.

use acctform_core::{AccountConfig, AccountConfigOverrides, AcctFormResult, effective_config};
use acctform_model::cloudwatch::{
    AlarmProperties, ComparisonOperator, Dimension, Statistic, TreatMissingData,
};
use acctform_model::sns::{SubscriptionProperties, SubscriptionProtocol, TopicProperties};
use acctform_model::{CfnValue, Resource};
use tracing::debug;

use crate::construct::{Construct, ConstructPath, Declaration};

/// Billing metrics are published every few hours; shorter periods alarm on no data.
const BILLING_PERIOD_SECS: u32 = 6 * 60 * 60;

const BILLING_NAMESPACE: &str = "AWS/Billing";
const BILLING_METRIC: &str = "EstimatedCharges";

/// One alarm on estimated charges.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingAlarm {
    resource_path: ConstructPath,
    properties: AlarmProperties,
}

impl BillingAlarm {
    fn new(
        scope: &ConstructPath,
        id: &str,
        alarm_name: String,
        description: String,
        threshold: f64,
        topic_arn: CfnValue,
    ) -> Self {
        Self {
            resource_path: scope.child(id).child("Resource"),
            properties: AlarmProperties {
                alarm_actions: vec![topic_arn],
                alarm_description: Some(description),
                alarm_name: Some(alarm_name),
                comparison_operator: ComparisonOperator::GreaterThanThreshold,
                dimensions: vec![Dimension {
                    name: "Currency".to_owned(),
                    value: "USD".to_owned(),
                }],
                evaluation_periods: 1,
                metric_name: BILLING_METRIC.to_owned(),
                namespace: BILLING_NAMESPACE.to_owned(),
                period: BILLING_PERIOD_SECS,
                statistic: Statistic::Maximum,
                threshold,
                treat_missing_data: Some(TreatMissingData::NotBreaching),
            },
        }
    }

    /// Logical id in the template.
    #[must_use]
    pub fn logical_id(&self) -> String {
        self.resource_path.logical_id()
    }

    /// The alarm properties.
    #[must_use]
    pub fn properties(&self) -> &AlarmProperties {
        &self.properties
    }

    fn declaration(&self) -> Declaration {
        Declaration {
            path: self.resource_path.clone(),
            resource: Resource::Alarm(self.properties.clone()),
        }
    }
}

/// Notification topic, email subscription, and three billing alarms.
#[derive(Debug, Clone, PartialEq)]
pub struct CostAlerts {
    path: ConstructPath,
    topic_path: ConstructPath,
    topic: TopicProperties,
    subscription_path: ConstructPath,
    subscription: SubscriptionProperties,
    /// Low, medium, and high alarms, in that order.
    pub alarms: [BillingAlarm; 3],
}

impl CostAlerts {
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

        let topic_path = path.child("BillingAlerts").child("Resource");
        let topic = TopicProperties {
            display_name: Some("AWS Billing Alerts".to_owned()),
            topic_name: Some(format!("{}-billing-alerts", config.resource_prefix)),
        };
        let topic_arn = CfnValue::reference(topic_path.logical_id());

        let subscription_path = path
            .child("BillingAlerts")
            .child(config.alert_email.as_str())
            .child("Resource");
        let subscription = SubscriptionProperties {
            endpoint: config.alert_email.clone(),
            protocol: SubscriptionProtocol::Email,
            topic_arn: topic_arn.clone(),
        };

        let thresholds = config.billing_alerts;
        let alarms = [
            BillingAlarm::new(
                &path,
                "BillingAlarmLow",
                format!("billing-alarm-{}-usd", thresholds.low),
                format!("Alert when billing exceeds ${}", thresholds.low),
                thresholds.low,
                topic_arn.clone(),
            ),
            BillingAlarm::new(
                &path,
                "BillingAlarmMedium",
                format!("billing-alarm-{}-usd", thresholds.medium),
                format!("Alert when billing exceeds ${}", thresholds.medium),
                thresholds.medium,
                topic_arn.clone(),
            ),
            BillingAlarm::new(
                &path,
                "BillingAlarmHigh",
                format!("billing-alarm-{}-usd-critical", thresholds.high),
                format!("CRITICAL: Alert when billing exceeds ${}", thresholds.high),
                thresholds.high,
                topic_arn,
            ),
        ];

        debug!(
            scope = %path,
            low = thresholds.low,
            medium = thresholds.medium,
            high = thresholds.high,
            "declared billing alarms"
        );

        Self {
            path,
            topic_path,
            topic,
            subscription_path,
            subscription,
            alarms,
        }
    }

    /// `Ref` of the notification topic (its ARN).
    #[must_use]
    pub fn topic_arn(&self) -> CfnValue {
        CfnValue::reference(self.topic_path.logical_id())
    }

    /// The topic properties.
    #[must_use]
    pub fn topic(&self) -> &TopicProperties {
        &self.topic
    }

    /// The email subscription properties.
    #[must_use]
    pub fn subscription(&self) -> &SubscriptionProperties {
        &self.subscription
    }
}

impl Construct for CostAlerts {
    fn path(&self) -> &ConstructPath {
        &self.path
    }

    fn declarations(&self) -> Vec<Declaration> {
        let mut out = vec![
            Declaration {
                path: self.topic_path.clone(),
                resource: Resource::Topic(self.topic.clone()),
            },
            Declaration {
                path: self.subscription_path.clone(),
                resource: Resource::Subscription(self.subscription.clone()),
            },
        ];
        out.extend(self.alarms.iter().map(BillingAlarm::declaration));
        out
    }
}
