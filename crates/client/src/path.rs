//! Endpoint paths, relative to the configured base path.

pub const COMPLETIONS: &str = "/v1/completions";
pub const CHATS: &str = "/v1/chat/completions";
pub const EMBEDDINGS: &str = "/v1/embeddings";
pub const IMAGES: &str = "/v1/images/generations";
pub const IMAGE_EDITS: &str = "/v1/images/edits";
pub const IMAGE_VARIATIONS: &str = "/v1/images/variations";
pub const MODERATIONS: &str = "/v1/moderations";
pub const MODELS: &str = "/v1/models";
pub const AUDIO_SPEECH: &str = "/v1/audio/speech";
pub const AUDIO_TRANSCRIPTIONS: &str = "/v1/audio/transcriptions";
pub const AUDIO_TRANSLATIONS: &str = "/v1/audio/translations";

/// Path of a single model.
pub fn model(id: &str) -> String {
    format!("{MODELS}/{id}")
}
