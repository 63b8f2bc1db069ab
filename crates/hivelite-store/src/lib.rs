//! Feature / task / plan stores.
//!
//! Two families implement the same traits:
//! - **beads**: everything lives in a [`BeadsRepository`]
//! - **fs**: plain files under `.hive/features/`
//!
//! [`create_stores`] picks the family from [`hivelite_core::BeadsMode`].

pub mod beads;
pub mod error;
pub mod factory;
pub mod fs;
pub mod repository;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use factory::{create_stores, StoreSet};
pub use repository::{
    Bead, BeadFilter, BeadKind, BeadUpdate, BeadsRepository, JsonlBeadsRepository,
    LazyBeadsRepository, NewBead,
};
pub use store::{FeatureStore, PlanStore, TaskStore};
pub use types::{Feature, FeatureStatus, Plan, StoreBackend, Task, TaskStatus, TaskUpdate};
