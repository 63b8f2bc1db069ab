//! Records handed out by the stores. Both store families produce the same
//! shapes, so callers never need to know which one is active.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Backing family of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Beads,
    Filesystem,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Beads => "beads",
            StoreBackend::Filesystem => "filesystem",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    #[default]
    Planning,
    Approved,
    Executing,
    Completed,
}

impl FeatureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureStatus::Planning => "planning",
            FeatureStatus::Approved => "approved",
            FeatureStatus::Executing => "executing",
            FeatureStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub status: FeatureStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
    Blocked,
    Failed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Failed => "failed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Statuses that need attention before the feature can complete.
    pub fn is_stuck(&self) -> bool {
        matches!(self, TaskStatus::Blocked | TaskStatus::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub feature: String,
    /// `{order:02}-{slug}`, unique within the feature.
    pub folder: String,
    pub name: String,
    pub order: u32,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Partial task update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub status: Option<TaskStatus>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub feature: String,
    pub content: String,
    pub approved: bool,
    pub updated_at: String,
}

fn parse_wire_name<T: DeserializeOwned>(s: &str, what: &str) -> std::result::Result<T, String> {
    let normalized = s.trim().to_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| format!("Invalid {}: '{}'", what, s))
}

impl FromStr for FeatureStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_wire_name(s, "feature status")
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_wire_name(s, "task status")
    }
}

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Feature names double as directory names, so they must already be slugs.
pub(crate) fn validate_feature_name(name: &str) -> Result<()> {
    if name.is_empty() || hivelite_core::slug::slugify_task_name(name) != name {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// `true` when `folder` is `{digits}-{slug}` with a non-empty slug.
pub(crate) fn is_task_folder(folder: &str) -> bool {
    hivelite_core::slug::parse_task_folder(folder).is_some_and(|(_, slug)| {
        !slug.is_empty() && hivelite_core::slug::slugify_task_name(slug) == slug
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_feature_name() {
        assert!(validate_feature_name("user-auth").is_ok());
        assert!(validate_feature_name("v2").is_ok());
        assert!(validate_feature_name("").is_err());
        assert!(validate_feature_name("User Auth").is_err());
        assert!(validate_feature_name("../etc").is_err());
    }

    #[test]
    fn test_is_task_folder() {
        assert!(is_task_folder("01-build-ui"));
        assert!(is_task_folder("120-x"));
        assert!(!is_task_folder("01-"));
        assert!(!is_task_folder("build-ui"));
        assert!(!is_task_folder("01-../etc"));
        assert!(!is_task_folder("01-Build"));
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("Done".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
        assert_eq!("executing".parse::<FeatureStatus>().unwrap(), FeatureStatus::Executing);
        assert!("later".parse::<TaskStatus>().is_err());
        for status in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Cancelled] {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&TaskStatus::InProgress).unwrap(), "\"in_progress\"");
        assert_eq!(serde_json::to_string(&FeatureStatus::Planning).unwrap(), "\"planning\"");
        assert_eq!(serde_json::to_string(&StoreBackend::Filesystem).unwrap(), "\"filesystem\"");
    }
}
