//! Resource builders, stack assembly, and synthesis for AcctForm.
//!
//! Each builder declares a group of CloudFormation resources at a
//! [`ConstructPath`]:
//!
//! - [`PersonalRoles`]: development, read-only, emergency, and Lambda roles.
//! - [`BasicPolicies`]: customer-managed policies for storage, cost
//!   visibility, and instance-size guard rails.
//! - [`CostAlerts`]: SNS topic, email subscription, and billing alarms.
//! - [`SpendingLimits`]: monthly and quarterly budgets.
//!
//! [`PersonalAccountStack`] validates the configuration, combines the
//! builders into one [`Stack`], and produces a [`StackArtifact`] that a
//! [`TemplateSink`] writes out.
//!
//! ```no_run
//! use acctform_constructs::{DEFAULT_STACK_NAME, DirectorySink, PersonalAccountStack, StackProps, TemplateSink};
//!
//! # fn main() -> acctform_core::AcctFormResult<()> {
//! let mut props = StackProps::default();
//! props.config.alert_email = Some("me@example.org".to_owned());
//! let artifact = PersonalAccountStack::new(DEFAULT_STACK_NAME, props)?.synth();
//! DirectorySink::new("cdk.out").emit(&artifact)?;
//! # Ok(())
//! # }
//! ```

pub mod construct;
pub mod cost_alerts;
pub mod policies;
pub mod roles;
pub mod spend_limits;
pub mod stack;
pub mod synth;

pub use construct::{Construct, ConstructPath, Declaration};
pub use cost_alerts::{BillingAlarm, CostAlerts};
pub use policies::{BasicPolicies, ManagedPolicy};
pub use roles::{PersonalRoles, Role};
pub use spend_limits::{Budget, SpendingLimits};
pub use stack::{
    DEFAULT_STACK_DESCRIPTION, DEFAULT_STACK_NAME, PersonalAccountStack, Stack, StackProps,
};
pub use synth::{
    AssemblyManifest, DirectorySink, MemorySink, StackArtifact, TemplateSink, WriterSink,
};
