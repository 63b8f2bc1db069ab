use std::path::{Path, PathBuf};

use super::{feature_dir, features_dir, read_json, subdir_names, write_json, FEATURE_FILE};
use crate::error::{Result, StoreError};
use crate::store::FeatureStore;
use crate::types::{now_rfc3339, Feature, FeatureStatus, StoreBackend};

pub struct FsFeatureStore {
    project_root: PathBuf,
}

impl FsFeatureStore {
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
        }
    }

    fn feature_file(&self, name: &str) -> Result<PathBuf> {
        Ok(feature_dir(&self.project_root, name)?.join(FEATURE_FILE))
    }
}

impl FeatureStore for FsFeatureStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Filesystem
    }

    fn create(&self, name: &str, ticket: Option<&str>) -> Result<Feature> {
        let path = self.feature_file(name)?;
        if path.exists() {
            return Err(StoreError::FeatureExists(name.to_string()));
        }
        let feature = Feature {
            name: name.to_string(),
            status: FeatureStatus::Planning,
            ticket: ticket.map(str::to_string),
            created_at: now_rfc3339(),
        };
        write_json(&path, &feature)?;
        tracing::info!(feature = name, path = %path.display(), "Created feature");
        Ok(feature)
    }

    fn get(&self, name: &str) -> Result<Option<Feature>> {
        read_json(&self.feature_file(name)?)
    }

    fn list(&self) -> Result<Vec<Feature>> {
        let dir = features_dir(&self.project_root);
        let mut features = Vec::new();
        for name in subdir_names(&dir)? {
            match read_json::<Feature>(&dir.join(&name).join(FEATURE_FILE))? {
                Some(feature) => features.push(feature),
                None => tracing::debug!(dir = %name, "Skipping feature dir without feature.json"),
            }
        }
        features.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(features)
    }

    fn set_status(&self, name: &str, status: FeatureStatus) -> Result<Feature> {
        let path = self.feature_file(name)?;
        let mut feature: Feature =
            read_json(&path)?.ok_or_else(|| StoreError::FeatureNotFound(name.to_string()))?;
        feature.status = status;
        write_json(&path, &feature)?;
        Ok(feature)
    }
}
