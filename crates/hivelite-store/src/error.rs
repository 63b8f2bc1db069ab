use thiserror::Error;

/// Errors returned by stores and beads repositories.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Feature '{0}' not found")]
    FeatureNotFound(String),

    #[error("Feature '{0}' already exists")]
    FeatureExists(String),

    #[error("Task '{folder}' not found in feature '{feature}'")]
    TaskNotFound { feature: String, folder: String },

    #[error("Task '{folder}' already exists in feature '{feature}'")]
    TaskExists { feature: String, folder: String },

    #[error("No plan written for feature '{0}'")]
    PlanNotFound(String),

    #[error("Bead '{0}' not found")]
    BeadNotFound(String),

    #[error("Invalid name '{0}': use lowercase letters, digits and hyphens")]
    InvalidName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Repository error: {0}")]
    Repository(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
