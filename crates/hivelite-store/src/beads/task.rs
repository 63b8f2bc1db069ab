use std::path::{Path, PathBuf};

use hivelite_core::slug::derive_task_folder;

use super::{require_feature_bead, META_FOLDER, META_ORDER, META_SUMMARY};
use crate::error::{Result, StoreError};
use crate::repository::{Bead, BeadFilter, BeadKind, BeadUpdate, BeadsRepository, NewBead};
use crate::store::{sort_tasks, TaskStore};
use crate::types::{is_task_folder, StoreBackend, Task, TaskStatus, TaskUpdate};

pub struct BeadsTaskStore<'a> {
    project_root: PathBuf,
    repo: &'a dyn BeadsRepository,
}

impl<'a> BeadsTaskStore<'a> {
    pub fn new(project_root: &Path, repo: &'a dyn BeadsRepository) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            repo,
        }
    }

    fn task_beads(&self, feature_id: &str) -> Result<Vec<Bead>> {
        self.repo
            .list(&BeadFilter::kind(BeadKind::Task).with_parent(feature_id))
    }

    fn find_task_bead(&self, feature: &str, folder: &str) -> Result<Option<Bead>> {
        let epic = require_feature_bead(self.repo, feature)?;
        if !is_task_folder(folder) {
            return Err(StoreError::InvalidName(folder.to_string()));
        }
        Ok(self
            .task_beads(&epic.id)?
            .into_iter()
            .find(|b| b.meta(META_FOLDER) == Some(folder)))
    }
}

fn to_task(feature: &str, bead: Bead) -> Task {
    Task {
        feature: feature.to_string(),
        folder: bead.meta(META_FOLDER).unwrap_or_default().to_string(),
        order: bead
            .meta(META_ORDER)
            .and_then(|o| o.parse().ok())
            .unwrap_or_default(),
        status: bead.status.parse().unwrap_or_default(),
        summary: bead.meta(META_SUMMARY).map(str::to_string),
        id: bead.id,
        name: bead.title,
        created_at: bead.created_at,
        updated_at: bead.updated_at,
    }
}

impl TaskStore for BeadsTaskStore<'_> {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Beads
    }

    fn create(&self, feature: &str, name: &str, order: u32) -> Result<Task> {
        let epic = require_feature_bead(self.repo, feature)?;
        let folder = derive_task_folder(order, name);
        if !is_task_folder(&folder) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        if self
            .task_beads(&epic.id)?
            .iter()
            .any(|b| b.meta(META_FOLDER) == Some(folder.as_str()))
        {
            return Err(StoreError::TaskExists {
                feature: feature.to_string(),
                folder,
            });
        }
        let bead = self.repo.create(
            NewBead::new(BeadKind::Task, name)
                .parent(&epic.id)
                .status(TaskStatus::Pending.as_str())
                .meta(META_FOLDER, folder.as_str())
                .meta(META_ORDER, order.to_string()),
        )?;
        tracing::info!(
            feature,
            folder = %folder,
            bead = %bead.id,
            root = %self.project_root.display(),
            "Created task bead"
        );
        Ok(to_task(feature, bead))
    }

    fn get(&self, feature: &str, folder: &str) -> Result<Option<Task>> {
        Ok(self
            .find_task_bead(feature, folder)?
            .map(|b| to_task(feature, b)))
    }

    fn list(&self, feature: &str) -> Result<Vec<Task>> {
        let epic = require_feature_bead(self.repo, feature)?;
        let mut tasks: Vec<Task> = self
            .task_beads(&epic.id)?
            .into_iter()
            .map(|b| to_task(feature, b))
            .collect();
        sort_tasks(&mut tasks);
        Ok(tasks)
    }

    fn update(&self, feature: &str, folder: &str, update: TaskUpdate) -> Result<Task> {
        let bead = self
            .find_task_bead(feature, folder)?
            .ok_or_else(|| StoreError::TaskNotFound {
                feature: feature.to_string(),
                folder: folder.to_string(),
            })?;
        let mut change = BeadUpdate::default();
        if let Some(status) = update.status {
            change = change.status(status.as_str());
        }
        if let Some(summary) = update.summary {
            change = change.meta(META_SUMMARY, summary);
        }
        let updated = self.repo.update(&bead.id, change)?;
        Ok(to_task(feature, updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beads::BeadsFeatureStore;
    use crate::repository::JsonlBeadsRepository;
    use crate::store::FeatureStore;

    fn setup(repo: &JsonlBeadsRepository) {
        BeadsFeatureStore::new(Path::new("."), repo)
            .create("checkout", None)
            .unwrap();
    }

    #[test]
    fn test_create_uses_folder_and_bead_id() {
        let repo = JsonlBeadsRepository::in_memory();
        setup(&repo);
        let store = BeadsTaskStore::new(Path::new("."), &repo);
        let task = store.create("checkout", "Build UI", 1).unwrap();
        assert_eq!(task.folder, "01-build-ui");
        assert_eq!(task.name, "Build UI");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.id.starts_with("bd-"));
        assert_eq!(repo.get(&task.id).unwrap().unwrap().kind, BeadKind::Task);
    }

    #[test]
    fn test_create_requires_feature_and_unique_folder() {
        let repo = JsonlBeadsRepository::in_memory();
        let store = BeadsTaskStore::new(Path::new("."), &repo);
        assert!(matches!(
            store.create("missing", "x", 1),
            Err(StoreError::FeatureNotFound(_))
        ));
        setup(&repo);
        store.create("checkout", "x", 1).unwrap();
        assert!(matches!(
            store.create("checkout", "X", 1),
            Err(StoreError::TaskExists { .. })
        ));
        assert!(matches!(
            store.create("checkout", "???", 2),
            Err(StoreError::InvalidName(name)) if name == "???"
        ));
    }

    #[test]
    fn test_list_orders_and_update() {
        let repo = JsonlBeadsRepository::in_memory();
        setup(&repo);
        let store = BeadsTaskStore::new(Path::new("."), &repo);
        store.create("checkout", "Wire payments", 10).unwrap();
        store.create("checkout", "Cart model", 2).unwrap();
        let folders: Vec<String> = store
            .list("checkout")
            .unwrap()
            .into_iter()
            .map(|t| t.folder)
            .collect();
        assert_eq!(folders, vec!["02-cart-model", "10-wire-payments"]);

        let updated = store
            .update(
                "checkout",
                "02-cart-model",
                TaskUpdate {
                    status: Some(TaskStatus::Done),
                    summary: Some("model landed".to_string()),
                },
            )
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.summary.as_deref(), Some("model landed"));
        assert_eq!(store.get("checkout", "02-cart-model").unwrap(), Some(updated));
        assert!(matches!(
            store.update("checkout", "99-nope", TaskUpdate::default()),
            Err(StoreError::TaskNotFound { .. })
        ));
        assert!(matches!(
            store.get("checkout", "../escape"),
            Err(StoreError::InvalidName(_))
        ));
    }
}
