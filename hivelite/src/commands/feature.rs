//! `hivelite feature ...`

use anyhow::Result;
use hivelite_core::tool_success;
use hivelite_store::{FeatureStatus, StoreError, StoreSet};
use serde_json::json;

use super::parse_value;
use crate::cli::FeatureAction;

const FEATURE_STATUSES: &[&str] = &["planning", "approved", "executing", "completed"];

pub fn run(set: &StoreSet<'_>, action: FeatureAction) -> Result<String> {
    match action {
        FeatureAction::Create { name, ticket } => {
            let feature = set.feature_store.create(&name, ticket.as_deref())?;
            Ok(tool_success(&feature))
        }
        FeatureAction::List => Ok(tool_success(&set.feature_store.list()?)),
        FeatureAction::Show { name } => {
            let feature = set
                .feature_store
                .get(&name)?
                .ok_or_else(|| StoreError::FeatureNotFound(name.clone()))?;
            let tasks = set.task_store.list(&name)?;
            let plan = set.plan_store.read(&name)?;
            Ok(tool_success(&json!({
                "feature": feature,
                "task_count": tasks.len(),
                "has_plan": plan.is_some(),
                "plan_approved": plan.is_some_and(|p| p.approved),
            })))
        }
        FeatureAction::Status { name, status } => {
            let status: FeatureStatus = parse_value("feature status", &status, FEATURE_STATUSES)?;
            Ok(tool_success(&set.feature_store.set_status(&name, status)?))
        }
    }
}
