//! AcctForm - personal AWS account management as code.
//!
//! Synthesizes a CloudFormation template with IAM roles, managed policies,
//! billing alarms, and budgets for a single account.
//!
//! # Usage
//!
//! ```text
//! ACCTFORM_ALERT_EMAIL=me@example.org acctform synth --out cdk.out
//! acctform validate --config account.json
//! acctform config --config account.json
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ACCTFORM_ALERT_EMAIL` | *(placeholder)* | Billing alert recipient |
//! | `ACCTFORM_ACCOUNT_ID` | *(unset)* | 12-digit account id |
//! | `ACCTFORM_REGION` | `us-east-1` | Region |
//! | `ACCTFORM_BILLING_ALERTS` | `10,25,50` | Alarm thresholds in USD |
//! | `ACCTFORM_BUDGETS` | `50,150` | Monthly and quarterly limits in USD |
//! | `ACCTFORM_RESOURCE_PREFIX` | `personal` | Prefix for physical names |
//! | `ACCTFORM_ENVIRONMENT` | `personal` | Environment label |
//! | `CDK_DEFAULT_ACCOUNT` | *(unset)* | Deployment account |
//! | `CDK_DEFAULT_REGION` | *(unset)* | Deployment region |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |
//!
//! Values from `--config` are applied first; environment variables win over
//! the file.

use std::io;
use std::path::{Path, PathBuf};

use acctform_constructs::{
    DEFAULT_STACK_NAME, DirectorySink, PersonalAccountStack, StackProps, TemplateSink, WriterSink,
};
use acctform_core::{AccountConfigOverrides, DeploymentEnv, effective_config};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Command-line interface.
#[derive(Debug, Parser)]
#[command(name = "acctform")]
#[command(about = "Personal AWS account management as code", long_about = None)]
#[command(version)]
struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Log level filter, ignored when RUST_LOG is set
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
struct ConfigArgs {
    /// JSON file with configuration overrides
    #[arg(short, long, env = "ACCTFORM_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Synthesize the stack template
    Synth {
        #[command(flatten)]
        config: ConfigArgs,

        /// Cloud assembly directory; the template goes to stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Stack name
        #[arg(short, long, default_value = DEFAULT_STACK_NAME)]
        stack_name: String,
    },

    /// Check the effective configuration
    Validate {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the effective configuration as JSON
    Config {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

/// Initialize the tracing subscriber on stderr.
///
/// Uses `RUST_LOG` if set, otherwise falls back to `log_level`.
fn init_tracing(log_level: &str, format: LogFormat) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }

    Ok(())
}

/// File overrides first, then `env` on top.
fn load_overrides(
    path: Option<&Path>,
    env: AccountConfigOverrides,
) -> Result<AccountConfigOverrides> {
    let file = match path {
        Some(path) => AccountConfigOverrides::from_json_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => AccountConfigOverrides::default(),
    };
    Ok(file.merge(env))
}

fn overrides_from(args: &ConfigArgs) -> Result<AccountConfigOverrides> {
    load_overrides(args.config.as_deref(), AccountConfigOverrides::from_env())
}

fn synth(config: AccountConfigOverrides, out: Option<&Path>, stack_name: &str) -> Result<()> {
    let props = StackProps {
        config,
        env: DeploymentEnv::from_env(),
        ..StackProps::default()
    };
    let artifact = PersonalAccountStack::new(stack_name, props)?.synth();

    match out {
        Some(dir) => DirectorySink::new(dir).emit(&artifact)?,
        None => WriterSink::new(io::stdout().lock()).emit(&artifact)?,
    }
    Ok(())
}

fn validate(config: &AccountConfigOverrides) -> Result<()> {
    let effective = effective_config(config);
    println!("{}", serde_json::to_string_pretty(&effective)?);
    effective.validate()?;
    println!("configuration is valid");
    info!(
        alert_email = %effective.alert_email,
        environment = %effective.environment,
        "configuration is valid"
    );
    Ok(())
}

fn print_config(config: &AccountConfigOverrides) -> Result<()> {
    let effective = effective_config(config);
    println!("{}", serde_json::to_string_pretty(&effective)?);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Synth {
            config,
            out,
            stack_name,
        } => synth(overrides_from(&config)?, out.as_deref(), &stack_name),
        Commands::Validate { config } => validate(&overrides_from(&config)?),
        Commands::Config { config } => print_config(&overrides_from(&config)?),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format)?;

    if let Err(e) = run(cli) {
        error!(error = %e, "command failed");
        return Err(e);
    }
    Ok(())
}
