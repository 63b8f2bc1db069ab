//! `hivelite task ...`

use anyhow::Result;
use hivelite_core::{tool_success, ToolResult, ToolWarning, WarningSeverity};
use hivelite_store::{StoreSet, Task, TaskStatus, TaskUpdate};

use super::parse_value;
use crate::cli::TaskAction;

const TASK_STATUSES: &[&str] = &["pending", "in_progress", "done", "blocked", "failed", "cancelled"];

pub fn run(set: &StoreSet<'_>, action: TaskAction) -> Result<String> {
    match action {
        TaskAction::Create { feature, name, order } => {
            Ok(tool_success(&set.task_store.create(&feature, &name, order)?))
        }
        TaskAction::List { feature } => {
            let tasks = set.task_store.list(&feature)?;
            let warnings = stuck_warning(&tasks).into_iter().collect();
            Ok(ToolResult::ok(serde_json::to_value(&tasks)?)
                .with_warnings(warnings)
                .to_json())
        }
        TaskAction::Update {
            feature,
            folder,
            status,
            summary,
        } => {
            let status = status
                .map(|s| parse_value::<TaskStatus>("task status", &s, TASK_STATUSES))
                .transpose()?;
            let task = set
                .task_store
                .update(&feature, &folder, TaskUpdate { status, summary })?;
            Ok(tool_success(&task))
        }
    }
}

/// One warning covering every blocked or failed task, if any.
fn stuck_warning(tasks: &[Task]) -> Option<ToolWarning> {
    let stuck: Vec<&str> = tasks
        .iter()
        .filter(|t| t.status.is_stuck())
        .map(|t| t.folder.as_str())
        .collect();
    if stuck.is_empty() {
        return None;
    }
    Some(
        ToolWarning::new(
            "stuck_tasks",
            WarningSeverity::Warning,
            format!("{} task(s) blocked or failed", stuck.len()),
        )
        .affected(stuck.join(", "))
        .count(stuck.len() as u64),
    )
}
