//! `hivelite plan ...`

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use hivelite_core::tool_success;
use hivelite_store::{StoreError, StoreSet};

use super::CommandError;
use crate::cli::PlanAction;

pub fn run(set: &StoreSet<'_>, action: PlanAction) -> Result<String> {
    match action {
        PlanAction::Write {
            feature,
            file,
            content,
        } => {
            let content = match (file, content) {
                (Some(path), _) => read_source(&path)?,
                (None, Some(content)) => content,
                (None, None) => return Err(CommandError::MissingPlanSource.into()),
            };
            if content.trim().is_empty() {
                return Err(CommandError::EmptyPlan.into());
            }
            Ok(tool_success(&set.plan_store.write(&feature, &content)?))
        }
        PlanAction::Show { feature } => {
            let plan = set
                .plan_store
                .read(&feature)?
                .ok_or(StoreError::PlanNotFound(feature))?;
            Ok(tool_success(&plan))
        }
        PlanAction::Approve { feature } => Ok(tool_success(&set.plan_store.approve(&feature)?)),
    }
}

/// Plan markdown from a file, or stdin when the path is `-`.
fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut s = String::new();
        std::io::stdin()
            .read_to_string(&mut s)
            .context("Failed to read plan from stdin")?;
        return Ok(s);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read plan: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{hints_for, test_support::data};
    use hivelite_core::BeadsMode;
    use hivelite_store::{create_stores, JsonlBeadsRepository};

    #[test]
    fn test_write_from_file_then_approve() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = JsonlBeadsRepository::in_memory();
        let set = create_stores(tmp.path(), BeadsMode::Off, &repo);
        set.feature_store.create("checkout", None).unwrap();
        let plan_file = tmp.path().join("plan.md");
        std::fs::write(&plan_file, "# Checkout\n\n1. Cart\n").unwrap();

        let written = data(
            &run(
                &set,
                PlanAction::Write {
                    feature: "checkout".into(),
                    file: Some(plan_file),
                    content: None,
                },
            )
            .unwrap(),
        );
        assert_eq!(written["approved"], false);
        assert_eq!(written["content"], "# Checkout\n\n1. Cart\n");

        let approved = data(&run(&set, PlanAction::Approve { feature: "checkout".into() }).unwrap());
        assert_eq!(approved["approved"], true);
        let shown = data(&run(&set, PlanAction::Show { feature: "checkout".into() }).unwrap());
        assert_eq!(shown["approved"], true);
    }

    #[test]
    fn test_missing_plan_and_empty_content() {
        let repo = JsonlBeadsRepository::in_memory();
        let set = create_stores(Path::new("."), BeadsMode::On, &repo);
        set.feature_store.create("checkout", None).unwrap();

        let err = run(&set, PlanAction::Show { feature: "checkout".into() }).unwrap_err();
        assert!(hints_for(&err)[0].contains("plan write checkout"));

        let err = run(
            &set,
            PlanAction::Write {
                feature: "checkout".into(),
                file: None,
                content: Some("  \n".into()),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Plan content is empty");

        let err = run(
            &set,
            PlanAction::Write {
                feature: "checkout".into(),
                file: None,
                content: None,
            },
        )
        .unwrap_err();
        assert!(err.downcast_ref::<CommandError>().is_some());
    }
}
