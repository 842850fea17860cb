use serde::{Deserialize, Serialize};

/// Token accounting attached to a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Tokens generated. Absent for embeddings.
    #[serde(default)]
    pub completion_tokens: u32,

    /// Prompt plus completion.
    #[serde(default)]
    pub total_tokens: u32,
}
