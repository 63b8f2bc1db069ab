//! `hivelite slug`

use hivelite_core::slug::{derive_task_folder, slugify_task_name};
use hivelite_core::tool_success;
use serde_json::json;

pub fn cmd_slug(name: &str, order: Option<u32>) -> String {
    match order {
        Some(order) => tool_success(&json!({ "folder": derive_task_folder(order, name) })),
        None => tool_success(&json!({ "slug": slugify_task_name(name) })),
    }
}
