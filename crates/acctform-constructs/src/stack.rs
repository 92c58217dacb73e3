//! Stack assembly.
//!
//! [`Stack`] collects declarations into a [`Template`] and rejects duplicate
//! construct paths. [`PersonalAccountStack`] is the assembler for the account
//! infrastructure: it resolves and validates the configuration first, then
//! adds roles, policies, billing alarms, and budgets, and exposes the three
//! assumable role ARNs as outputs.

use std::collections::HashSet;

use acctform_core::{
    AccountConfig, AccountConfigOverrides, AcctFormError, AcctFormResult, DeploymentEnv,
    effective_config,
};
use acctform_model::{CfnValue, Output, Template};
use tracing::{debug, info, warn};

use crate::construct::{Construct, ConstructPath};
use crate::cost_alerts::CostAlerts;
use crate::policies::BasicPolicies;
use crate::roles::PersonalRoles;
use crate::spend_limits::SpendingLimits;
use crate::synth::StackArtifact;

/// Stack name used when none is given.
pub const DEFAULT_STACK_NAME: &str = "PersonalAwsManagementStack";

/// Description written into the template.
pub const DEFAULT_STACK_DESCRIPTION: &str =
    "Personal AWS account management with IAM roles and billing controls";

/// A stack under construction.
#[derive(Debug, Clone)]
pub struct Stack {
    name: String,
    env: DeploymentEnv,
    template: Template,
    paths: HashSet<String>,
}

impl Stack {
    /// Empty stack.
    #[must_use]
    pub fn new(name: impl Into<String>, description: Option<String>, env: DeploymentEnv) -> Self {
        Self {
            name: name.into(),
            env,
            template: Template {
                description,
                ..Template::default()
            },
            paths: HashSet::new(),
        }
    }

    /// Stack name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Deployment target.
    #[must_use]
    pub fn env(&self) -> &DeploymentEnv {
        &self.env
    }

    /// The template built so far.
    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Add every resource declared by `construct`.
    ///
    /// Nothing is added unless every declaration fits.
    ///
    /// # Errors
    ///
    /// Fails if a declared path or its logical id is already taken, by the
    /// stack or by an earlier declaration of the same construct.
    pub fn add(&mut self, construct: &impl Construct) -> AcctFormResult<()> {
        let declarations = construct.declarations();

        let mut paths = HashSet::with_capacity(declarations.len());
        let mut logical_ids = HashSet::with_capacity(declarations.len());
        for decl in &declarations {
            let logical_id = decl.logical_id();
            if self.paths.contains(&decl.path.to_string())
                || self.template.resources.contains_key(&logical_id)
                || !paths.insert(decl.path.to_string())
                || !logical_ids.insert(logical_id)
            {
                return Err(duplicate(&decl.path));
            }
        }

        for decl in declarations {
            let logical_id = decl.logical_id();
            debug!(
                path = %decl.path,
                logical_id = %logical_id,
                resource_type = decl.resource.type_name(),
                "adding resource"
            );
            self.paths.insert(decl.path.to_string());
            self.template.resources.insert(logical_id, decl.resource);
        }
        debug!(construct = %construct.path(), "construct added");
        Ok(())
    }

    /// Add a stack output with id `id`.
    ///
    /// # Errors
    ///
    /// Fails if `id` is already used at the stack root.
    pub fn add_output(
        &mut self,
        id: &str,
        value: CfnValue,
        description: Option<&str>,
    ) -> AcctFormResult<()> {
        let path = ConstructPath::root().child(id);
        self.claim(&path)?;
        self.template.outputs.insert(
            path.logical_id(),
            Output {
                description: description.map(str::to_owned),
                value,
            },
        );
        Ok(())
    }

    /// Finish the stack.
    #[must_use]
    pub fn synth(self) -> StackArtifact {
        info!(
            stack = %self.name,
            environment = %self.env.environment_string(),
            resources = self.template.resources.len(),
            outputs = self.template.outputs.len(),
            "synthesized stack"
        );
        StackArtifact {
            stack_name: self.name,
            environment: self.env.environment_string(),
            template: self.template,
        }
    }

    fn claim(&mut self, path: &ConstructPath) -> AcctFormResult<()> {
        if self.paths.insert(path.to_string()) {
            Ok(())
        } else {
            Err(duplicate(path))
        }
    }
}

fn duplicate(path: &ConstructPath) -> AcctFormError {
    let parts = path.parts();
    let (scope, id) = match parts.split_last() {
        Some((id, scope)) => (scope.join("/"), id.clone()),
        None => (String::new(), String::new()),
    };
    AcctFormError::DuplicateConstructId { scope, id }
}

/// Inputs to [`PersonalAccountStack::new`].
#[derive(Debug, Clone)]
pub struct StackProps {
    /// Overrides applied to the default configuration.
    pub config: AccountConfigOverrides,
    /// Template description.
    pub description: Option<String>,
    /// Deployment target.
    pub env: DeploymentEnv,
}

impl Default for StackProps {
    fn default() -> Self {
        Self {
            config: AccountConfigOverrides::default(),
            description: Some(DEFAULT_STACK_DESCRIPTION.to_owned()),
            env: DeploymentEnv::default(),
        }
    }
}

/// The assembled account-management stack.
#[derive(Debug)]
pub struct PersonalAccountStack {
    stack: Stack,
    config: AccountConfig,
    /// IAM roles.
    pub roles: PersonalRoles,
    /// Managed policies.
    pub policies: BasicPolicies,
    /// Billing alarms.
    pub cost_alerts: CostAlerts,
    /// Budgets.
    pub spending_limits: SpendingLimits,
}

impl PersonalAccountStack {
    /// Resolve and validate the configuration, then build every construct.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration; nothing is built in that case.
    pub fn new(id: &str, props: StackProps) -> AcctFormResult<Self> {
        let config = effective_config(&props.config);
        config.validate()?;

        if let (Some(configured), Some(target)) = (&config.account_id, &props.env.account) {
            if configured != target {
                warn!(
                    configured = %configured,
                    target = %target,
                    "configured account id differs from deployment account"
                );
            }
        }

        info!(
            stack = id,
            environment = %config.environment,
            resource_prefix = %config.resource_prefix,
            "building account stack"
        );

        let mut stack = Stack::new(id, props.description, props.env);
        let root = ConstructPath::root();

        let roles = PersonalRoles::new(&root, "PersonalRoles");
        let policies = BasicPolicies::new(&root, "BasicPolicies");
        let cost_alerts = CostAlerts::new(&root, "CostAlerts", &props.config)?;
        let spending_limits = SpendingLimits::new(&root, "SpendingLimits", &props.config)?;

        stack.add(&roles)?;
        stack.add(&policies)?;
        stack.add(&cost_alerts)?;
        stack.add(&spending_limits)?;

        stack.add_output(
            "DevRoleArn",
            roles.dev_role.arn(),
            Some("ARN of the development role"),
        )?;
        stack.add_output(
            "ReadOnlyRoleArn",
            roles.read_only_role.arn(),
            Some("ARN of the read-only role"),
        )?;
        stack.add_output(
            "EmergencyRoleArn",
            roles.emergency_role.arn(),
            Some("ARN of the emergency access role"),
        )?;

        Ok(Self {
            stack,
            config,
            roles,
            policies,
            cost_alerts,
            spending_limits,
        })
    }

    /// The validated configuration the stack was built from.
    #[must_use]
    pub fn config(&self) -> &AccountConfig {
        &self.config
    }

    /// The template built so far.
    #[must_use]
    pub fn template(&self) -> &Template {
        self.stack.template()
    }

    /// Finish the stack.
    #[must_use]
    pub fn synth(self) -> StackArtifact {
        self.stack.synth()
    }
}
