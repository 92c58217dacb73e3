//! CloudFormation template document.
//!
//! A [`Resource`] serializes as `{"Type": "...", "Properties": {...}}`; the
//! `Type` tag selects the property struct.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::budgets::BudgetProperties;
use crate::cloudwatch::AlarmProperties;
use crate::iam::{ManagedPolicyProperties, RoleProperties};
use crate::sns::{SubscriptionProperties, TopicProperties};
use crate::value::CfnValue;

/// Template format version written into every template.
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// A resource declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type", content = "Properties")]
pub enum Resource {
    #[serde(rename = "AWS::IAM::Role")]
    Role(RoleProperties),
    #[serde(rename = "AWS::IAM::ManagedPolicy")]
    ManagedPolicy(ManagedPolicyProperties),
    #[serde(rename = "AWS::SNS::Topic")]
    Topic(TopicProperties),
    #[serde(rename = "AWS::SNS::Subscription")]
    Subscription(SubscriptionProperties),
    #[serde(rename = "AWS::CloudWatch::Alarm")]
    Alarm(AlarmProperties),
    #[serde(rename = "AWS::Budgets::Budget")]
    Budget(BudgetProperties),
}

impl Resource {
    /// The CloudFormation resource type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Role(_) => "AWS::IAM::Role",
            Self::ManagedPolicy(_) => "AWS::IAM::ManagedPolicy",
            Self::Topic(_) => "AWS::SNS::Topic",
            Self::Subscription(_) => "AWS::SNS::Subscription",
            Self::Alarm(_) => "AWS::CloudWatch::Alarm",
            Self::Budget(_) => "AWS::Budgets::Budget",
        }
    }
}

/// A stack output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: CfnValue,
}

/// A complete template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub resources: BTreeMap<String, Resource>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, Output>,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            format_version: TEMPLATE_FORMAT_VERSION.to_owned(),
            description: None,
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }
}

impl Template {
    /// Logical ids of every resource of the given type, in id order.
    pub fn logical_ids_of_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a str> {
        self.resources
            .iter()
            .filter(move |(_, r)| r.type_name() == type_name)
            .map(|(id, _)| id.as_str())
    }

    /// Number of resources of the given type.
    #[must_use]
    pub fn count_of_type(&self, type_name: &str) -> usize {
        self.logical_ids_of_type(type_name).count()
    }
}
