//! Store interfaces. Each has a beads-backed and a filesystem-backed
//! implementation; callers hold them as trait objects.

use crate::error::Result;
use crate::types::{Feature, FeatureStatus, Plan, StoreBackend, Task, TaskUpdate};

pub trait FeatureStore {
    fn backend(&self) -> StoreBackend;

    /// Fails with `FeatureExists` if the name is taken, `InvalidName` if it is not a slug.
    fn create(&self, name: &str, ticket: Option<&str>) -> Result<Feature>;

    fn get(&self, name: &str) -> Result<Option<Feature>>;

    /// All features, sorted by name.
    fn list(&self) -> Result<Vec<Feature>>;

    fn set_status(&self, name: &str, status: FeatureStatus) -> Result<Feature>;
}

pub trait TaskStore {
    fn backend(&self) -> StoreBackend;

    /// Creates the task in folder `derive_task_folder(order, name)`.
    fn create(&self, feature: &str, name: &str, order: u32) -> Result<Task>;

    fn get(&self, feature: &str, folder: &str) -> Result<Option<Task>>;

    /// Tasks of a feature, sorted by order then folder.
    fn list(&self, feature: &str) -> Result<Vec<Task>>;

    fn update(&self, feature: &str, folder: &str, update: TaskUpdate) -> Result<Task>;
}

pub trait PlanStore {
    fn backend(&self) -> StoreBackend;

    /// Writing a plan clears any previous approval.
    fn write(&self, feature: &str, content: &str) -> Result<Plan>;

    fn read(&self, feature: &str) -> Result<Option<Plan>>;

    fn approve(&self, feature: &str) -> Result<Plan>;
}

pub(crate) fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.folder.cmp(&b.folder)));
}
