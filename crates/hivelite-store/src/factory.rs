//! Store factory: picks one store family per project.

use std::path::Path;

use hivelite_core::BeadsMode;

use crate::beads::{BeadsFeatureStore, BeadsPlanStore, BeadsTaskStore};
use crate::fs::{FsFeatureStore, FsPlanStore, FsTaskStore};
use crate::repository::BeadsRepository;
use crate::store::{FeatureStore, PlanStore, TaskStore};
use crate::types::StoreBackend;

/// Feature, task and plan stores drawn from the same family.
///
/// Borrows the repository handle; the caller keeps ownership of it.
pub struct StoreSet<'a> {
    pub feature_store: Box<dyn FeatureStore + 'a>,
    pub task_store: Box<dyn TaskStore + 'a>,
    pub plan_store: Box<dyn PlanStore + 'a>,
}

impl StoreSet<'_> {
    /// The family shared by all three stores.
    pub fn backend(&self) -> StoreBackend {
        self.feature_store.backend()
    }
}

/// Build the store set for `project_root`.
///
/// `BeadsMode::On` backs all three stores with `repo`. `BeadsMode::Off` uses
/// the filesystem layout; the task store still borrows `repo` for task ids.
/// Nothing is validated here: a bad root or repository surfaces on first use.
pub fn create_stores<'a>(
    project_root: &Path,
    mode: BeadsMode,
    repo: &'a dyn BeadsRepository,
) -> StoreSet<'a> {
    tracing::debug!(root = %project_root.display(), mode = %mode, "Creating stores");
    match mode {
        BeadsMode::On => StoreSet {
            feature_store: Box::new(BeadsFeatureStore::new(project_root, repo)),
            task_store: Box::new(BeadsTaskStore::new(project_root, repo)),
            plan_store: Box::new(BeadsPlanStore::new(project_root, repo)),
        },
        BeadsMode::Off => StoreSet {
            feature_store: Box::new(FsFeatureStore::new(project_root)),
            task_store: Box::new(FsTaskStore::new(project_root, repo)),
            plan_store: Box::new(FsPlanStore::new(project_root)),
        },
    }
}
