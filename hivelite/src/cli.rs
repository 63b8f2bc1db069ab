use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use hivelite_core::tool_error;

/// Hivelite - feature planning and task tracking for coding agents
#[derive(Parser, Debug)]
#[command(name = "hivelite")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root (default: HIVELITE_PROJECT_ROOT, config file, or current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Store family: "on" keeps everything in the beads repository, "off" uses .hive/ files
    #[arg(long, global = true, value_name = "on|off")]
    pub beads: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the builtin MCP server table
    Mcps {
        /// MCP names to leave out, comma separated (added to HIVELITE_DISABLE_MCPS)
        #[arg(long, value_delimiter = ',', value_name = "NAMES")]
        disable: Vec<String>,
    },

    /// Slugify a task name, or derive its folder when --order is given
    Slug {
        #[arg(value_name = "NAME")]
        name: String,

        /// Task order; prints the `NN-slug` folder name instead of the slug
        #[arg(long)]
        order: Option<u32>,
    },

    /// Manage features
    Feature {
        #[command(subcommand)]
        action: FeatureAction,
    },

    /// Manage tasks of a feature
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Write, show and approve feature plans
    Plan {
        #[command(subcommand)]
        action: PlanAction,
    },

    /// Show which store family is active for the project
    Stores,
}

#[derive(Subcommand, Debug)]
pub enum FeatureAction {
    /// Create a feature in planning state
    Create {
        #[arg(value_name = "NAME")]
        name: String,

        /// External ticket reference
        #[arg(long)]
        ticket: Option<String>,
    },

    /// List all features
    List,

    /// Show one feature with its task count
    Show {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Set feature status (planning, approved, executing, completed)
    Status {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(value_name = "STATUS")]
        status: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskAction {
    /// Create a task; its folder is derived from --order and the name
    Create {
        #[arg(value_name = "FEATURE")]
        feature: String,

        #[arg(value_name = "NAME")]
        name: String,

        #[arg(long)]
        order: u32,
    },

    /// List tasks in order
    List {
        #[arg(value_name = "FEATURE")]
        feature: String,
    },

    /// Update task status and/or summary
    Update {
        #[arg(value_name = "FEATURE")]
        feature: String,

        /// Task folder, e.g. 01-build-ui
        #[arg(value_name = "FOLDER")]
        folder: String,

        /// pending, in_progress, done, blocked, failed, cancelled
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        summary: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PlanAction {
    /// Write (or replace) the plan; clears any approval
    Write {
        #[arg(value_name = "FEATURE")]
        feature: String,

        /// Read plan markdown from a file ("-" for stdin)
        #[arg(long, value_name = "PATH", conflicts_with = "content")]
        file: Option<PathBuf>,

        /// Plan markdown given inline
        #[arg(long)]
        content: Option<String>,
    },

    /// Show the plan and its approval state
    Show {
        #[arg(value_name = "FEATURE")]
        feature: String,
    },

    /// Approve the current plan
    Approve {
        #[arg(value_name = "FEATURE")]
        feature: String,
    },
}

/// Failure envelope for a command-line usage error.
///
/// Returns `None` for help and version requests, which clap prints itself.
pub fn usage_error_envelope(err: &clap::Error) -> Option<String> {
    if matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    ) {
        return None;
    }
    let rendered = err.render().to_string();
    let message = rendered
        .split("\n\nUsage:")
        .next()
        .unwrap_or(&rendered)
        .trim()
        .trim_start_matches("error: ");
    Some(tool_error(message, Some(&["Run `hivelite --help` for usage"])))
}
