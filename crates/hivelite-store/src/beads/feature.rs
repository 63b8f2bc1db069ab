use std::path::{Path, PathBuf};

use super::{find_feature_bead, require_feature_bead, META_TICKET};
use crate::error::{Result, StoreError};
use crate::repository::{Bead, BeadFilter, BeadKind, BeadUpdate, BeadsRepository, NewBead};
use crate::store::FeatureStore;
use crate::types::{Feature, FeatureStatus, StoreBackend};

pub struct BeadsFeatureStore<'a> {
    project_root: PathBuf,
    repo: &'a dyn BeadsRepository,
}

impl<'a> BeadsFeatureStore<'a> {
    pub fn new(project_root: &Path, repo: &'a dyn BeadsRepository) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            repo,
        }
    }
}

fn to_feature(bead: Bead) -> Feature {
    Feature {
        status: bead.status.parse().unwrap_or_default(),
        ticket: bead.meta(META_TICKET).map(str::to_string),
        name: bead.title,
        created_at: bead.created_at,
    }
}

impl FeatureStore for BeadsFeatureStore<'_> {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Beads
    }

    fn create(&self, name: &str, ticket: Option<&str>) -> Result<Feature> {
        if find_feature_bead(self.repo, name)?.is_some() {
            return Err(StoreError::FeatureExists(name.to_string()));
        }
        let mut new = NewBead::new(BeadKind::Epic, name).status(FeatureStatus::Planning.as_str());
        if let Some(ticket) = ticket {
            new = new.meta(META_TICKET, ticket);
        }
        let bead = self.repo.create(new)?;
        tracing::info!(
            feature = name,
            bead = %bead.id,
            root = %self.project_root.display(),
            "Created feature epic"
        );
        Ok(to_feature(bead))
    }

    fn get(&self, name: &str) -> Result<Option<Feature>> {
        Ok(find_feature_bead(self.repo, name)?.map(to_feature))
    }

    fn list(&self) -> Result<Vec<Feature>> {
        let mut features: Vec<Feature> = self
            .repo
            .list(&BeadFilter::kind(BeadKind::Epic))?
            .into_iter()
            .map(to_feature)
            .collect();
        features.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(features)
    }

    fn set_status(&self, name: &str, status: FeatureStatus) -> Result<Feature> {
        let bead = require_feature_bead(self.repo, name)?;
        let updated = self
            .repo
            .update(&bead.id, BeadUpdate::default().status(status.as_str()))?;
        Ok(to_feature(updated))
    }
}
