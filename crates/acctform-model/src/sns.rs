//! SNS resource properties.

use serde::{Deserialize, Serialize};

use crate::value::CfnValue;

/// `AWS::SNS::Topic` properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopicProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,
}

/// Delivery protocol of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionProtocol {
    Email,
    Sms,
    Sqs,
    Lambda,
}

/// `AWS::SNS::Subscription` properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubscriptionProperties {
    pub endpoint: String,
    pub protocol: SubscriptionProtocol,
    pub topic_arn: CfnValue,
}
