//! Beads-backed stores.
//!
//! Mapping onto beads:
//! - feature → `epic` bead, title = feature name, status = feature status
//! - task    → `task` bead parented to the epic, folder/order/summary in metadata
//! - plan    → `plan` bead parented to the epic, body = plan markdown

mod feature;
mod plan;
mod task;

pub use feature::BeadsFeatureStore;
pub use plan::BeadsPlanStore;
pub use task::BeadsTaskStore;

use crate::error::{Result, StoreError};
use crate::repository::{Bead, BeadFilter, BeadKind, BeadsRepository};
use crate::types::validate_feature_name;

pub(crate) const META_TICKET: &str = "ticket";
pub(crate) const META_FOLDER: &str = "folder";
pub(crate) const META_ORDER: &str = "order";
pub(crate) const META_SUMMARY: &str = "summary";
pub(crate) const META_APPROVED: &str = "approved";

fn find_feature_bead(repo: &dyn BeadsRepository, name: &str) -> Result<Option<Bead>> {
    validate_feature_name(name)?;
    Ok(repo
        .list(&BeadFilter::kind(BeadKind::Epic).with_title(name))?
        .into_iter()
        .next())
}

fn require_feature_bead(repo: &dyn BeadsRepository, name: &str) -> Result<Bead> {
    find_feature_bead(repo, name)?.ok_or_else(|| StoreError::FeatureNotFound(name.to_string()))
}
