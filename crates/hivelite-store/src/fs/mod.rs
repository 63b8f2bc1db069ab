//! Filesystem-backed stores.
//!
//! Layout under the project root:
//! ```text
//! .hive/features/<feature>/feature.json
//! .hive/features/<feature>/plan.md
//! .hive/features/<feature>/plan.json
//! .hive/features/<feature>/tasks/<NN-slug>/status.json
//! ```

mod feature;
mod plan;
mod task;

pub use feature::FsFeatureStore;
pub use plan::FsPlanStore;
pub use task::FsTaskStore;

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};
use crate::types::validate_feature_name;
pub(crate) use crate::types::is_task_folder;

const HIVE_DIR: &str = ".hive";
const FEATURES_DIR: &str = "features";
const TASKS_DIR: &str = "tasks";
pub(crate) const FEATURE_FILE: &str = "feature.json";

pub(crate) fn features_dir(root: &Path) -> PathBuf {
    root.join(HIVE_DIR).join(FEATURES_DIR)
}

/// Validated feature directory. Rejects names that are not slugs.
pub(crate) fn feature_dir(root: &Path, feature: &str) -> Result<PathBuf> {
    validate_feature_name(feature)?;
    Ok(features_dir(root).join(feature))
}

/// Feature directory that must already hold a `feature.json`.
pub(crate) fn existing_feature_dir(root: &Path, feature: &str) -> Result<PathBuf> {
    let dir = feature_dir(root, feature)?;
    if !dir.join(FEATURE_FILE).is_file() {
        return Err(StoreError::FeatureNotFound(feature.to_string()));
    }
    Ok(dir)
}

pub(crate) fn tasks_dir(root: &Path, feature: &str) -> Result<PathBuf> {
    Ok(feature_dir(root, feature)?.join(TASKS_DIR))
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Names of the immediate subdirectories of `dir`, sorted. Missing dir → empty.
pub(crate) fn subdir_names(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    Ok(names)
}
