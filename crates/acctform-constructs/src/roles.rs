//! IAM roles for day-to-day, read-only, emergency, and Lambda use.

use acctform_model::iam::{InlinePolicy, RoleProperties};
use acctform_model::value::{AWS_ACCOUNT_ID, AWS_PARTITION};
use acctform_model::{CfnValue, PolicyDocument, PolicyStatement, Principal, Resource};
use tracing::debug;

use crate::construct::{Construct, ConstructPath, Declaration};

/// Emergency sessions are capped at one hour.
const EMERGENCY_MAX_SESSION_SECS: u32 = 60 * 60;

/// Resources the Lambda execution role may touch.
const LAMBDA_RESOURCES: [&str; 2] = [
    "arn:aws:s3:::personal-*/*",
    "arn:aws:dynamodb:*:*:table/personal-*",
];

/// ARN of an AWS managed policy, resolved against the deploying partition.
#[must_use]
pub fn aws_managed_policy_arn(name: &str) -> CfnValue {
    CfnValue::concat(vec![
        CfnValue::literal("arn:"),
        CfnValue::reference(AWS_PARTITION),
        CfnValue::literal(format!(":iam::aws:policy/{name}")),
    ])
}

/// Principal for the root of the deploying account.
#[must_use]
pub fn account_root_principal() -> Principal {
    Principal::Aws(CfnValue::concat(vec![
        CfnValue::literal("arn:"),
        CfnValue::reference(AWS_PARTITION),
        CfnValue::literal(":iam::"),
        CfnValue::reference(AWS_ACCOUNT_ID),
        CfnValue::literal(":root"),
    ]))
}

/// A single `AWS::IAM::Role`.
#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    resource_path: ConstructPath,
    properties: RoleProperties,
}

impl Role {
    /// Role `id` under `scope`, assumable by `principal`.
    #[must_use]
    pub fn new(scope: &ConstructPath, id: &str, principal: Principal) -> Self {
        Self {
            resource_path: scope.child(id).child("Resource"),
            properties: RoleProperties {
                assume_role_policy_document: PolicyDocument::new(vec![
                    PolicyStatement::assume_role(principal),
                ]),
                description: None,
                managed_policy_arns: Vec::new(),
                max_session_duration: None,
                policies: Vec::new(),
                role_name: None,
            },
        }
    }

    /// Set the physical role name.
    #[must_use]
    pub fn named(mut self, role_name: &str) -> Self {
        self.properties.role_name = Some(role_name.to_owned());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn described(mut self, description: &str) -> Self {
        self.properties.description = Some(description.to_owned());
        self
    }

    /// Attach AWS managed policies by name.
    #[must_use]
    pub fn with_aws_managed_policies(mut self, names: &[&str]) -> Self {
        self.properties
            .managed_policy_arns
            .extend(names.iter().map(|n| aws_managed_policy_arn(n)));
        self
    }

    /// Embed an inline policy.
    #[must_use]
    pub fn with_inline_policy(mut self, name: &str, statements: Vec<PolicyStatement>) -> Self {
        self.properties.policies.push(InlinePolicy {
            policy_name: name.to_owned(),
            policy_document: PolicyDocument::new(statements),
        });
        self
    }

    /// Cap the session length.
    #[must_use]
    pub fn with_max_session_secs(mut self, secs: u32) -> Self {
        self.properties.max_session_duration = Some(secs);
        self
    }

    /// Logical id in the template.
    #[must_use]
    pub fn logical_id(&self) -> String {
        self.resource_path.logical_id()
    }

    /// `Fn::GetAtt` of the role ARN.
    #[must_use]
    pub fn arn(&self) -> CfnValue {
        CfnValue::get_att(self.logical_id(), "Arn")
    }

    /// Physical role name, if set.
    #[must_use]
    pub fn role_name(&self) -> Option<&str> {
        self.properties.role_name.as_deref()
    }

    /// The role properties.
    #[must_use]
    pub fn properties(&self) -> &RoleProperties {
        &self.properties
    }

    pub(crate) fn declaration(&self) -> Declaration {
        Declaration {
            path: self.resource_path.clone(),
            resource: Resource::Role(self.properties.clone()),
        }
    }
}

/// The four account roles.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalRoles {
    path: ConstructPath,
    /// Power-user role with destructive account actions denied.
    pub dev_role: Role,
    /// Read-only and billing read-only access.
    pub read_only_role: Role,
    /// Administrator access with a one-hour session cap.
    pub emergency_role: Role,
    /// Execution role for Lambda functions.
    pub lambda_role: Role,
}

impl PersonalRoles {
    /// Declare the roles under `scope/id`.
    #[must_use]
    pub fn new(scope: &ConstructPath, id: &str) -> Self {
        let path = scope.child(id);

        let dev_role = Role::new(&path, "PersonalDevRole", account_root_principal())
            .named("PersonalDeveloperRole")
            .described("Role for personal development and experimentation")
            .with_aws_managed_policies(&["PowerUserAccess"])
            .with_inline_policy(
                "DenyDangerousActions",
                vec![PolicyStatement::deny(
                    [
                        "organizations:*",
                        "account:*",
                        "iam:DeleteRole",
                        "iam:DeleteUser",
                        "iam:DeletePolicy",
                        "billing:*",
                    ],
                    ["*"],
                )],
            );

        let read_only_role = Role::new(&path, "PersonalReadOnlyRole", account_root_principal())
            .named("PersonalReadOnlyRole")
            .described("Read-only access for monitoring and cost analysis")
            .with_aws_managed_policies(&["ReadOnlyAccess", "AWSBillingReadOnlyAccess"]);

        let emergency_role = Role::new(&path, "PersonalEmergencyRole", account_root_principal())
            .named("PersonalEmergencyRole")
            .described("Emergency administrative access - use with extreme caution")
            .with_aws_managed_policies(&["AdministratorAccess"])
            .with_max_session_secs(EMERGENCY_MAX_SESSION_SECS);

        let lambda_role = Role::new(
            &path,
            "PersonalLambdaRole",
            Principal::Service("lambda.amazonaws.com".to_owned()),
        )
        .named("PersonalLambdaExecutionRole")
        .described("Execution role for personal Lambda functions")
        .with_aws_managed_policies(&["service-role/AWSLambdaBasicExecutionRole"])
        .with_inline_policy(
            "PersonalLambdaPolicy",
            vec![PolicyStatement::allow(
                [
                    "s3:GetObject",
                    "s3:PutObject",
                    "dynamodb:GetItem",
                    "dynamodb:PutItem",
                    "dynamodb:UpdateItem",
                    "dynamodb:DeleteItem",
                    "dynamodb:Query",
                    "dynamodb:Scan",
                ],
                LAMBDA_RESOURCES,
            )],
        );

        debug!(scope = %path, "declared account roles");

        Self {
            path,
            dev_role,
            read_only_role,
            emergency_role,
            lambda_role,
        }
    }

    /// All roles, in declaration order.
    #[must_use]
    pub fn all(&self) -> [&Role; 4] {
        [
            &self.dev_role,
            &self.read_only_role,
            &self.emergency_role,
            &self.lambda_role,
        ]
    }
}

impl Construct for PersonalRoles {
    fn path(&self) -> &ConstructPath {
        &self.path
    }

    fn declarations(&self) -> Vec<Declaration> {
        self.all().into_iter().map(Role::declaration).collect()
    }
}
