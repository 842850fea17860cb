//! Model listing.

use serde::{Deserialize, Serialize};

/// Identifies the model fetched by `GET /v1/models/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelQuery {
    /// The model identifier.
    pub model: String,
}

impl ModelQuery {
    /// Create a query.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

/// A model the server offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelResult {
    /// The model identifier.
    pub id: String,

    /// Object type, `model`.
    #[serde(default)]
    pub object: String,

    /// Creation time in unix seconds.
    #[serde(default)]
    pub created: u64,

    /// The owning organization.
    #[serde(default)]
    pub owned_by: String,
}

/// Result of `GET /v1/models`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsResult {
    /// Object type, `list`.
    #[serde(default)]
    pub object: String,

    /// Every model visible to the caller.
    pub data: Vec<ModelResult>,
}
