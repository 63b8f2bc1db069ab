use std::path::{Path, PathBuf};

use hivelite_core::slug::derive_task_folder;

use super::{existing_feature_dir, is_task_folder, read_json, subdir_names, tasks_dir, write_json};
use crate::error::{Result, StoreError};
use crate::repository::BeadsRepository;
use crate::store::{sort_tasks, TaskStore};
use crate::types::{now_rfc3339, StoreBackend, Task, TaskStatus, TaskUpdate};

const STATUS_FILE: &str = "status.json";
const TASK_ID_PREFIX: &str = "task";

/// Filesystem task store. Task ids still come from the beads repository's
/// id generator so they stay unique across modes.
pub struct FsTaskStore<'a> {
    project_root: PathBuf,
    repo: &'a dyn BeadsRepository,
}

impl<'a> FsTaskStore<'a> {
    pub fn new(project_root: &Path, repo: &'a dyn BeadsRepository) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            repo,
        }
    }

    /// `status.json` path for a task of an existing feature.
    fn status_file(&self, feature: &str, folder: &str) -> Result<PathBuf> {
        existing_feature_dir(&self.project_root, feature)?;
        if !is_task_folder(folder) {
            return Err(StoreError::InvalidName(folder.to_string()));
        }
        Ok(tasks_dir(&self.project_root, feature)?
            .join(folder)
            .join(STATUS_FILE))
    }
}

impl TaskStore for FsTaskStore<'_> {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Filesystem
    }

    fn create(&self, feature: &str, name: &str, order: u32) -> Result<Task> {
        existing_feature_dir(&self.project_root, feature)?;
        let folder = derive_task_folder(order, name);
        if !is_task_folder(&folder) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        let path = self.status_file(feature, &folder)?;
        if path.exists() {
            return Err(StoreError::TaskExists {
                feature: feature.to_string(),
                folder,
            });
        }
        let now = now_rfc3339();
        let task = Task {
            id: self.repo.generate_id(TASK_ID_PREFIX),
            feature: feature.to_string(),
            folder,
            name: name.to_string(),
            order,
            status: TaskStatus::Pending,
            summary: None,
            created_at: now.clone(),
            updated_at: now,
        };
        write_json(&path, &task)?;
        tracing::info!(feature, folder = %task.folder, id = %task.id, "Created task");
        Ok(task)
    }

    fn get(&self, feature: &str, folder: &str) -> Result<Option<Task>> {
        read_json(&self.status_file(feature, folder)?)
    }

    fn list(&self, feature: &str) -> Result<Vec<Task>> {
        existing_feature_dir(&self.project_root, feature)?;
        let dir = tasks_dir(&self.project_root, feature)?;
        let mut tasks = Vec::new();
        for folder in subdir_names(&dir)? {
            if !is_task_folder(&folder) {
                tracing::debug!(folder = %folder, "Skipping non-task directory");
                continue;
            }
            if let Some(task) = read_json::<Task>(&dir.join(&folder).join(STATUS_FILE))? {
                tasks.push(task);
            }
        }
        sort_tasks(&mut tasks);
        Ok(tasks)
    }

    fn update(&self, feature: &str, folder: &str, update: TaskUpdate) -> Result<Task> {
        let path = self.status_file(feature, folder)?;
        let mut task: Task = read_json(&path)?.ok_or_else(|| StoreError::TaskNotFound {
            feature: feature.to_string(),
            folder: folder.to_string(),
        })?;
        if let Some(status) = update.status {
            task.status = status;
        }
        if let Some(summary) = update.summary {
            task.summary = Some(summary);
        }
        task.updated_at = now_rfc3339();
        write_json(&path, &task)?;
        Ok(task)
    }
}
