//! Embeddings.

use crate::Usage;
use serde::{Deserialize, Serialize};

/// Text to embed: one string or a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    /// A single input.
    Text(String),
    /// A batch, embedded in order.
    Texts(Vec<String>),
}

impl From<&str> for EmbeddingInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for EmbeddingInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<String>> for EmbeddingInput {
    fn from(texts: Vec<String>) -> Self {
        Self::Texts(texts)
    }
}

/// Body of `POST /v1/embeddings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingsQuery {
    /// The model identifier.
    pub model: String,

    /// What to embed.
    pub input: EmbeddingInput,

    /// Output dimensions, for models that support shortening.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<u32>,

    /// End-user identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl EmbeddingsQuery {
    /// Create a query.
    pub fn new(model: impl Into<String>, input: impl Into<EmbeddingInput>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            dimensions: None,
            user: None,
        }
    }
}

/// Result of `POST /v1/embeddings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingsResult {
    /// Object type, `list`.
    #[serde(default)]
    pub object: String,

    /// One embedding per input, in input order.
    pub data: Vec<Embedding>,

    /// The model used.
    #[serde(default)]
    pub model: String,

    /// Token usage.
    #[serde(default)]
    pub usage: Usage,
}

/// One embedding vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    /// Object type, `embedding`.
    #[serde(default)]
    pub object: String,

    /// The vector.
    pub embedding: Vec<f64>,

    /// Index of the input it belongs to.
    pub index: u32,
}
