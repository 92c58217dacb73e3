//! IAM resource properties: roles, managed policies, and policy documents.
//!
//! Field names follow the CloudFormation `PascalCase` convention. `Action` and
//! `Resource` collapse to a bare string when they hold a single entry, the
//! same way CloudFormation templates are usually written.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::{CfnValue, one_or_many};

/// The only policy language version in use.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Whether a statement grants or withholds the listed actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl Effect {
    /// Returns the wire-format string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "Allow",
            Self::Deny => "Deny",
        }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who may assume a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Principal {
    /// An account or IAM principal ARN.
    #[serde(rename = "AWS")]
    Aws(CfnValue),
    /// An AWS service, e.g. `lambda.amazonaws.com`.
    Service(String),
}

/// Condition block: operator -> condition key -> accepted values.
pub type Conditions = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// A single allow/deny rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub effect: Effect,
    #[serde(with = "one_or_many")]
    pub action: Vec<String>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "one_or_many::serialize",
        deserialize_with = "one_or_many::deserialize"
    )]
    pub resource: Vec<CfnValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub condition: Conditions,
}

impl PolicyStatement {
    /// Statement with the given effect over `actions` on `resources`.
    #[must_use]
    pub fn new<A, R>(effect: Effect, actions: A, resources: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<CfnValue>,
    {
        Self {
            effect,
            action: actions.into_iter().map(Into::into).collect(),
            resource: resources.into_iter().map(Into::into).collect(),
            principal: None,
            condition: Conditions::new(),
        }
    }

    /// Allow `actions` on `resources`.
    #[must_use]
    pub fn allow<A, R>(actions: A, resources: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<CfnValue>,
    {
        Self::new(Effect::Allow, actions, resources)
    }

    /// Deny `actions` on `resources`.
    #[must_use]
    pub fn deny<A, R>(actions: A, resources: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<CfnValue>,
    {
        Self::new(Effect::Deny, actions, resources)
    }

    /// Trust statement letting `principal` call `sts:AssumeRole`.
    #[must_use]
    pub fn assume_role(principal: Principal) -> Self {
        Self {
            effect: Effect::Allow,
            action: vec!["sts:AssumeRole".to_owned()],
            resource: Vec::new(),
            principal: Some(principal),
            condition: Conditions::new(),
        }
    }

    /// Add a condition, e.g. `StringNotEquals` on `ec2:InstanceType`.
    #[must_use]
    pub fn with_condition<V>(
        mut self,
        operator: impl Into<String>,
        key: impl Into<String>,
        values: V,
    ) -> Self
    where
        V: IntoIterator,
        V::Item: Into<String>,
    {
        self.condition
            .entry(operator.into())
            .or_default()
            .insert(key.into(), values.into_iter().map(Into::into).collect());
        self
    }
}

/// A versioned list of statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

impl PolicyDocument {
    /// Document at [`POLICY_VERSION`] holding `statements`.
    #[must_use]
    pub fn new(statements: Vec<PolicyStatement>) -> Self {
        Self {
            version: POLICY_VERSION.to_owned(),
            statement: statements,
        }
    }
}

/// Policy embedded directly in a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InlinePolicy {
    pub policy_name: String,
    pub policy_document: PolicyDocument,
}

/// `AWS::IAM::Role` properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleProperties {
    pub assume_role_policy_document: PolicyDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub managed_policy_arns: Vec<CfnValue>,
    /// Maximum session length in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_session_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<InlinePolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
}

/// `AWS::IAM::ManagedPolicy` properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManagedPolicyProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_policy_name: Option<String>,
    pub path: String,
    pub policy_document: PolicyDocument,
}
