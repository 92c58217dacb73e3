//! Standalone customer-managed IAM policies.

use acctform_model::iam::ManagedPolicyProperties;
use acctform_model::{CfnValue, PolicyDocument, PolicyStatement, Resource};
use tracing::debug;

use crate::construct::{Construct, ConstructPath, Declaration};

/// Instance types still allowed by [`BasicPolicies::deny_dangerous_actions`].
pub const ALLOWED_EC2_INSTANCE_TYPES: [&str; 6] = [
    "t2.micro",
    "t2.small",
    "t3.micro",
    "t3.small",
    "t4g.micro",
    "t4g.small",
];

/// Database classes still allowed by [`BasicPolicies::deny_dangerous_actions`].
pub const ALLOWED_RDS_INSTANCE_CLASSES: [&str; 4] =
    ["db.t3.micro", "db.t3.small", "db.t4g.micro", "db.t4g.small"];

/// A single `AWS::IAM::ManagedPolicy`.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedPolicy {
    resource_path: ConstructPath,
    properties: ManagedPolicyProperties,
}

impl ManagedPolicy {
    /// Policy `id` under `scope`.
    #[must_use]
    pub fn new(
        scope: &ConstructPath,
        id: &str,
        name: &str,
        description: &str,
        statements: Vec<PolicyStatement>,
    ) -> Self {
        Self {
            resource_path: scope.child(id).child("Resource"),
            properties: ManagedPolicyProperties {
                description: Some(description.to_owned()),
                managed_policy_name: Some(name.to_owned()),
                path: "/".to_owned(),
                policy_document: PolicyDocument::new(statements),
            },
        }
    }

    /// Logical id in the template.
    #[must_use]
    pub fn logical_id(&self) -> String {
        self.resource_path.logical_id()
    }

    /// `Ref` of a managed policy resolves to its ARN.
    #[must_use]
    pub fn arn(&self) -> CfnValue {
        CfnValue::reference(self.logical_id())
    }

    /// Physical policy name, if set.
    #[must_use]
    pub fn policy_name(&self) -> Option<&str> {
        self.properties.managed_policy_name.as_deref()
    }

    /// The policy properties.
    #[must_use]
    pub fn properties(&self) -> &ManagedPolicyProperties {
        &self.properties
    }

    fn declaration(&self) -> Declaration {
        Declaration {
            path: self.resource_path.clone(),
            resource: Resource::ManagedPolicy(self.properties.clone()),
        }
    }
}

/// Storage, table, cost-visibility, and guard-rail policies.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicPolicies {
    path: ConstructPath,
    /// Access to `personal-*` S3 buckets.
    pub personal_s3_policy: ManagedPolicy,
    /// Access to `personal-*` DynamoDB tables.
    pub personal_dynamo_policy: ManagedPolicy,
    /// Read access to cost, usage, and inventory data.
    pub cost_optimization_policy: ManagedPolicy,
    /// Denies launching anything but small burstable instances.
    pub deny_dangerous_actions: ManagedPolicy,
}

impl BasicPolicies {
    /// Declare the policies under `scope/id`.
    #[must_use]
    pub fn new(scope: &ConstructPath, id: &str) -> Self {
        let path = scope.child(id);

        let personal_s3_policy = ManagedPolicy::new(
            &path,
            "PersonalS3Policy",
            "PersonalS3Access",
            "Access to personal S3 buckets only",
            vec![
                PolicyStatement::allow(
                    [
                        "s3:ListBucket",
                        "s3:GetBucketLocation",
                        "s3:GetBucketVersioning",
                    ],
                    ["arn:aws:s3:::personal-*"],
                ),
                PolicyStatement::allow(
                    [
                        "s3:GetObject",
                        "s3:PutObject",
                        "s3:DeleteObject",
                        "s3:GetObjectVersion",
                        "s3:DeleteObjectVersion",
                    ],
                    ["arn:aws:s3:::personal-*/*"],
                ),
                PolicyStatement::allow(["s3:ListAllMyBuckets"], ["*"]),
            ],
        );

        let personal_dynamo_policy = ManagedPolicy::new(
            &path,
            "PersonalDynamoPolicy",
            "PersonalDynamoDBAccess",
            "Access to personal DynamoDB tables only",
            vec![
                PolicyStatement::allow(
                    [
                        "dynamodb:GetItem",
                        "dynamodb:PutItem",
                        "dynamodb:UpdateItem",
                        "dynamodb:DeleteItem",
                        "dynamodb:Query",
                        "dynamodb:Scan",
                        "dynamodb:BatchGetItem",
                        "dynamodb:BatchWriteItem",
                    ],
                    [
                        "arn:aws:dynamodb:*:*:table/personal-*",
                        "arn:aws:dynamodb:*:*:table/personal-*/index/*",
                    ],
                ),
                PolicyStatement::allow(["dynamodb:ListTables"], ["*"]),
            ],
        );

        let cost_optimization_policy = ManagedPolicy::new(
            &path,
            "CostOptimizationPolicy",
            "PersonalCostOptimization",
            "Permissions for cost monitoring and optimization",
            vec![
                PolicyStatement::allow(
                    [
                        "ce:GetCostAndUsage",
                        "ce:GetUsageReport",
                        "ce:GetReservationCoverage",
                        "ce:GetReservationPurchaseRecommendation",
                        "ce:GetReservationUtilization",
                        "ce:ListCostCategoryDefinitions",
                        "ce:GetRightsizingRecommendation",
                        "budgets:ViewBudget",
                        "budgets:DescribeBudgets",
                        "cloudwatch:GetMetricStatistics",
                        "cloudwatch:ListMetrics",
                        "support:DescribeTrustedAdvisorChecks",
                        "support:DescribeTrustedAdvisorCheckResult",
                    ],
                    ["*"],
                ),
                PolicyStatement::allow(
                    [
                        "ec2:DescribeInstances",
                        "ec2:DescribeReservedInstances",
                        "ec2:DescribeSnapshots",
                        "ec2:DescribeVolumes",
                        "rds:DescribeDBInstances",
                        "rds:DescribeReservedDBInstances",
                    ],
                    ["*"],
                ),
            ],
        );

        let deny_dangerous_actions = ManagedPolicy::new(
            &path,
            "DenyDangerousActions",
            "DenyDangerousActions",
            "Deny potentially costly or dangerous actions",
            vec![
                PolicyStatement::deny(["ec2:RunInstances", "ec2:StartInstances"], ["*"])
                    .with_condition(
                        "StringNotEquals",
                        "ec2:InstanceType",
                        ALLOWED_EC2_INSTANCE_TYPES,
                    ),
                PolicyStatement::deny(["rds:CreateDBInstance", "rds:CreateDBCluster"], ["*"])
                    .with_condition(
                        "StringNotEquals",
                        "rds:db-instance-class",
                        ALLOWED_RDS_INSTANCE_CLASSES,
                    ),
            ],
        );

        debug!(scope = %path, "declared managed policies");

        Self {
            path,
            personal_s3_policy,
            personal_dynamo_policy,
            cost_optimization_policy,
            deny_dangerous_actions,
        }
    }

    /// All policies, in declaration order.
    #[must_use]
    pub fn all(&self) -> [&ManagedPolicy; 4] {
        [
            &self.personal_s3_policy,
            &self.personal_dynamo_policy,
            &self.cost_optimization_policy,
            &self.deny_dangerous_actions,
        ]
    }
}

impl Construct for BasicPolicies {
    fn path(&self) -> &ConstructPath {
        &self.path
    }

    fn declarations(&self) -> Vec<Declaration> {
        self.all()
            .into_iter()
            .map(ManagedPolicy::declaration)
            .collect()
    }
}
