use std::path::{Path, PathBuf};

use super::{require_feature_bead, META_APPROVED};
use crate::error::{Result, StoreError};
use crate::repository::{Bead, BeadFilter, BeadKind, BeadUpdate, BeadsRepository, NewBead};
use crate::store::PlanStore;
use crate::types::{Plan, StoreBackend};

pub struct BeadsPlanStore<'a> {
    project_root: PathBuf,
    repo: &'a dyn BeadsRepository,
}

impl<'a> BeadsPlanStore<'a> {
    pub fn new(project_root: &Path, repo: &'a dyn BeadsRepository) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            repo,
        }
    }

    /// Feature epic and its plan bead, if one was written.
    fn find_plan_bead(&self, feature: &str) -> Result<(Bead, Option<Bead>)> {
        let epic = require_feature_bead(self.repo, feature)?;
        let plan = self
            .repo
            .list(&BeadFilter::kind(BeadKind::Plan).with_parent(&epic.id))?
            .into_iter()
            .next();
        Ok((epic, plan))
    }
}

fn to_plan(feature: &str, bead: Bead) -> Plan {
    Plan {
        feature: feature.to_string(),
        approved: bead.meta(META_APPROVED) == Some("true"),
        content: bead.body,
        updated_at: bead.updated_at,
    }
}

impl PlanStore for BeadsPlanStore<'_> {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Beads
    }

    fn write(&self, feature: &str, content: &str) -> Result<Plan> {
        let (epic, plan) = self.find_plan_bead(feature)?;
        let bead = match plan {
            Some(existing) => self.repo.update(
                &existing.id,
                BeadUpdate::default()
                    .body(content)
                    .meta(META_APPROVED, "false"),
            )?,
            None => self.repo.create(
                NewBead::new(BeadKind::Plan, format!("{} plan", feature))
                    .parent(&epic.id)
                    .body(content)
                    .meta(META_APPROVED, "false"),
            )?,
        };
        tracing::debug!(
            feature,
            bead = %bead.id,
            epic = %epic.id,
            root = %self.project_root.display(),
            "Wrote plan bead"
        );
        Ok(to_plan(feature, bead))
    }

    fn read(&self, feature: &str) -> Result<Option<Plan>> {
        let (_, plan) = self.find_plan_bead(feature)?;
        Ok(plan.map(|b| to_plan(feature, b)))
    }

    fn approve(&self, feature: &str) -> Result<Plan> {
        let (_, plan) = self.find_plan_bead(feature)?;
        let bead = plan.ok_or_else(|| StoreError::PlanNotFound(feature.to_string()))?;
        let updated = self
            .repo
            .update(&bead.id, BeadUpdate::default().meta(META_APPROVED, "true"))?;
        Ok(to_plan(feature, updated))
    }
}
