//! `hivelite stores`

use std::path::Path;

use hivelite_core::tool_success;
use hivelite_store::StoreSet;
use serde_json::json;

pub fn cmd_stores(root: &Path, set: &StoreSet<'_>) -> String {
    tool_success(&json!({
        "backend": set.backend().as_str(),
        "root": root.display().to_string(),
        "feature_store": set.feature_store.backend().as_str(),
        "task_store": set.task_store.backend().as_str(),
        "plan_store": set.plan_store.backend().as_str(),
    }))
}
