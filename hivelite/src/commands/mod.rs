//! CLI commands. Each returns one ToolResult JSON document for stdout.
//!
//! Store-backed commands receive a [`StoreSet`] and never look at which
//! family built it; `stores` is the only command that reports the family.

pub mod feature;
pub mod mcps;
pub mod plan;
pub mod slug;
pub mod stores;
pub mod task;

use std::path::PathBuf;

use anyhow::Result;
use hivelite_core::config::{ConfigError, HiveConfig};
use hivelite_core::BeadsMode;
use hivelite_store::{create_stores, LazyBeadsRepository, StoreError};

use crate::cli::{Cli, Commands};

/// Errors raised by the CLI layer itself, before any store is touched.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Invalid {what}: '{value}'")]
    InvalidValue {
        what: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("Plan content is empty")]
    EmptyPlan,

    #[error("Provide plan content with --file or --content")]
    MissingPlanSource,
}

/// Resolved invocation settings: CLI flags over config file and env.
#[derive(Debug, Clone)]
pub struct Context {
    pub root: PathBuf,
    pub mode: BeadsMode,
    pub config: HiveConfig,
}

impl Context {
    pub fn resolve(root: Option<PathBuf>, beads: Option<&str>) -> Result<Self> {
        let config = HiveConfig::load()?;
        Self::from_config(config, root, beads)
    }

    pub fn from_config(config: HiveConfig, root: Option<PathBuf>, beads: Option<&str>) -> Result<Self> {
        let mode = match beads {
            Some(flag) => BeadsMode::parse_strict(flag)?,
            None => config.beads_mode,
        };
        let root = root.unwrap_or_else(|| config.project_root.clone());
        Ok(Self { root, mode, config })
    }

    /// Beads repository for the project root, opened on first use.
    pub fn repository(&self) -> LazyBeadsRepository {
        LazyBeadsRepository::new(&self.root)
    }
}

pub fn run(cli: Cli) -> Result<String> {
    let ctx = Context::resolve(cli.root, cli.beads.as_deref())?;
    tracing::debug!(root = %ctx.root.display(), mode = %ctx.mode, "Resolved context");
    execute(&ctx, cli.command)
}

pub fn execute(ctx: &Context, command: Commands) -> Result<String> {
    let repo = ctx.repository();
    let set = create_stores(&ctx.root, ctx.mode, &repo);
    match command {
        Commands::Mcps { disable } => Ok(mcps::cmd_mcps(&ctx.config.disable_mcps, &disable)),
        Commands::Slug { name, order } => Ok(slug::cmd_slug(&name, order)),
        Commands::Stores => Ok(stores::cmd_stores(&ctx.root, &set)),
        Commands::Feature { action } => feature::run(&set, action),
        Commands::Task { action } => task::run(&set, action),
        Commands::Plan { action } => plan::run(&set, action),
    }
}

/// Remediation hints for a failed command, shown in the error envelope.
pub fn hints_for(err: &anyhow::Error) -> Vec<String> {
    if let Some(e) = err.downcast_ref::<CommandError>() {
        return match e {
            CommandError::InvalidValue { allowed, .. } => {
                vec![format!("Allowed values: {}", allowed.join(", "))]
            }
            CommandError::EmptyPlan | CommandError::MissingPlanSource => {
                vec!["Pass --file plan.md or --content \"...\"".to_string()]
            }
        };
    }
    if let Some(ConfigError::InvalidBeadsMode(_)) = err.downcast_ref::<ConfigError>() {
        return vec!["Use --beads on or --beads off".to_string()];
    }
    match err.downcast_ref::<StoreError>() {
        Some(StoreError::FeatureNotFound(_)) => vec![
            "Create it with `hivelite feature create <NAME>`".to_string(),
            "See existing features with `hivelite feature list`".to_string(),
        ],
        Some(StoreError::FeatureExists(name)) => {
            vec![format!("Inspect it with `hivelite feature show {}`", name)]
        }
        Some(StoreError::TaskNotFound { feature, .. }) => {
            vec![format!("See task folders with `hivelite task list {}`", feature)]
        }
        Some(StoreError::TaskExists { .. }) => {
            vec!["Pick a different --order or task name".to_string()]
        }
        Some(StoreError::PlanNotFound(feature)) => vec![format!(
            "Write one with `hivelite plan write {} --file plan.md`",
            feature
        )],
        Some(StoreError::InvalidName(_)) => {
            vec!["Names are slugs: lowercase letters, digits and hyphens".to_string()]
        }
        _ => Vec::new(),
    }
}

/// Parse a status-like argument, keeping the allowed values for the hint.
pub(crate) fn parse_value<T: std::str::FromStr>(
    what: &'static str,
    value: &str,
    allowed: &'static [&'static str],
) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        CommandError::InvalidValue {
            what,
            value: value.to_string(),
            allowed,
        }
        .into()
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use hivelite_core::ToolResult;
    use serde_json::Value;

    /// Parse a success envelope and return its data.
    pub fn data(raw: &str) -> Value {
        let result = ToolResult::parse(raw).unwrap();
        assert!(result.is_success(), "expected success: {}", raw);
        result.data().cloned().unwrap()
    }
}
