//! End-to-end synthesis tests for AcctForm.
//!
//! These run the full path from configuration overrides to emitted
//! template JSON, without touching AWS.
//!
//! ```text
//! cargo test -p acctform-integration
//! ```

use std::sync::Once;

use acctform_constructs::{MemorySink, PersonalAccountStack, StackArtifact, StackProps, TemplateSink};
use acctform_core::{AccountConfigOverrides, DeploymentEnv};
use serde_json::Value;

mod test_assembly;
mod test_config;
mod test_synth;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Overrides carrying only a usable alert address.
#[must_use]
pub fn overrides_with_email(email: &str) -> AccountConfigOverrides {
    AccountConfigOverrides {
        alert_email: Some(email.to_owned()),
        ..AccountConfigOverrides::default()
    }
}

/// Build and synthesize a stack, collecting it through a [`MemorySink`].
pub fn synth_stack(
    stack_name: &str,
    config: AccountConfigOverrides,
    env: DeploymentEnv,
) -> anyhow::Result<StackArtifact> {
    init_tracing();

    let props = StackProps {
        config,
        env,
        ..StackProps::default()
    };
    let artifact = PersonalAccountStack::new(stack_name, props)?.synth();

    let mut sink = MemorySink::new();
    sink.emit(&artifact)?;
    sink.artifacts
        .pop()
        .ok_or_else(|| anyhow::anyhow!("sink kept no artifact"))
}

/// Synthesize and return the template as JSON.
pub fn synth_template_json(config: AccountConfigOverrides) -> anyhow::Result<Value> {
    let artifact = synth_stack("TestStack", config, DeploymentEnv::default())?;
    Ok(serde_json::from_str(&artifact.to_json()?)?)
}

/// Logical ids of every resource of `type_name` in a template JSON.
#[must_use]
pub fn resources_of_type<'a>(template: &'a Value, type_name: &str) -> Vec<(&'a str, &'a Value)> {
    template["Resources"]
        .as_object()
        .map(|resources| {
            resources
                .iter()
                .filter(|(_, r)| r["Type"] == type_name)
                .map(|(id, r)| (id.as_str(), r))
                .collect()
        })
        .unwrap_or_default()
}
