use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{existing_feature_dir, feature_dir, read_json, write_json};
use crate::error::{Result, StoreError};
use crate::store::PlanStore;
use crate::types::{now_rfc3339, Plan, StoreBackend};

const PLAN_FILE: &str = "plan.md";
const PLAN_META_FILE: &str = "plan.json";

/// Sidecar for `plan.md`.
#[derive(Debug, Serialize, Deserialize)]
struct PlanMeta {
    approved: bool,
    updated_at: String,
}

pub struct FsPlanStore {
    project_root: PathBuf,
}

impl FsPlanStore {
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
        }
    }
}

impl PlanStore for FsPlanStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Filesystem
    }

    fn write(&self, feature: &str, content: &str) -> Result<Plan> {
        let dir = existing_feature_dir(&self.project_root, feature)?;
        std::fs::write(dir.join(PLAN_FILE), content)?;
        let meta = PlanMeta {
            approved: false,
            updated_at: now_rfc3339(),
        };
        write_json(&dir.join(PLAN_META_FILE), &meta)?;
        tracing::debug!(feature, "Wrote plan.md");
        Ok(Plan {
            feature: feature.to_string(),
            content: content.to_string(),
            approved: meta.approved,
            updated_at: meta.updated_at,
        })
    }

    fn read(&self, feature: &str) -> Result<Option<Plan>> {
        let dir = existing_feature_dir(&self.project_root, feature)?;
        let plan_path = dir.join(PLAN_FILE);
        if !plan_path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&plan_path)?;
        // plan.md edited by hand without a sidecar counts as unapproved
        let meta = read_json::<PlanMeta>(&dir.join(PLAN_META_FILE))?.unwrap_or_else(|| PlanMeta {
            approved: false,
            updated_at: now_rfc3339(),
        });
        Ok(Some(Plan {
            feature: feature.to_string(),
            content,
            approved: meta.approved,
            updated_at: meta.updated_at,
        }))
    }

    fn approve(&self, feature: &str) -> Result<Plan> {
        let mut plan = self
            .read(feature)?
            .ok_or_else(|| StoreError::PlanNotFound(feature.to_string()))?;
        let dir = feature_dir(&self.project_root, feature)?;
        let meta = PlanMeta {
            approved: true,
            updated_at: now_rfc3339(),
        };
        write_json(&dir.join(PLAN_META_FILE), &meta)?;
        plan.approved = true;
        plan.updated_at = meta.updated_at;
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::FsFeatureStore;
    use crate::store::FeatureStore;

    #[test]
    fn test_write_read_approve() {
        let tmp = tempfile::tempdir().unwrap();
        FsFeatureStore::new(tmp.path()).create("search", None).unwrap();
        let store = FsPlanStore::new(tmp.path());

        assert!(store.read("search").unwrap().is_none());
        store.write("search", "# Plan\n\n1. index").unwrap();
        assert_eq!(
            std::fs::read_to_string(tmp.path().join(".hive/features/search/plan.md")).unwrap(),
            "# Plan\n\n1. index"
        );
        assert!(!store.read("search").unwrap().unwrap().approved);

        assert!(store.approve("search").unwrap().approved);
        assert!(store.read("search").unwrap().unwrap().approved);

        store.write("search", "# Plan v2").unwrap();
        let plan = store.read("search").unwrap().unwrap();
        assert_eq!(plan.content, "# Plan v2");
        assert!(!plan.approved);
    }

    #[test]
    fn test_hand_written_plan_is_unapproved() {
        let tmp = tempfile::tempdir().unwrap();
        FsFeatureStore::new(tmp.path()).create("docs", None).unwrap();
        std::fs::write(tmp.path().join(".hive/features/docs/plan.md"), "manual").unwrap();
        let plan = FsPlanStore::new(tmp.path()).read("docs").unwrap().unwrap();
        assert_eq!(plan.content, "manual");
        assert!(!plan.approved);
    }

    #[test]
    fn test_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsPlanStore::new(tmp.path());
        assert!(matches!(
            store.write("ghost", "x"),
            Err(StoreError::FeatureNotFound(_))
        ));
        assert!(matches!(
            store.read("ghost"),
            Err(StoreError::FeatureNotFound(_))
        ));
        FsFeatureStore::new(tmp.path()).create("ghost", None).unwrap();
        assert!(matches!(
            store.approve("ghost"),
            Err(StoreError::PlanNotFound(_))
        ));
    }
}
