//! Payload types for every endpoint of the narwhal client.
//!
//! Queries serialize into request bodies (or multipart forms for uploads),
//! results deserialize from response bodies. Optional query fields are
//! omitted from the wire when unset so the server applies its own defaults.

pub use {
    audio::{
        AudioResponseFormat, AudioSpeechQuery, AudioSpeechResult, AudioTranscriptionQuery,
        AudioTranscriptionResult, AudioTranslationQuery, AudioTranslationResult, FileType,
        SpeechFormat, Voice,
    },
    chat::{
        ChatChoice, ChatDelta, ChatMessage, ChatQuery, ChatResult, ChatStreamChoice,
        ChatStreamResult, Role,
    },
    completions::{CompletionChoice, CompletionsQuery, CompletionsResult},
    embeddings::{Embedding, EmbeddingInput, EmbeddingsQuery, EmbeddingsResult},
    file::InputFile,
    images::{
        ImageData, ImageEditsQuery, ImageResponseFormat, ImageVariationsQuery, ImagesQuery,
        ImagesResult,
    },
    models::{ModelQuery, ModelResult, ModelsResult},
    moderations::{Categories, CategoryScores, Moderation, ModerationsQuery, ModerationsResult},
    usage::Usage,
};

pub use ncore::{ApiError, ApiErrorResponse};

mod audio;
mod chat;
mod completions;
mod embeddings;
mod file;
mod images;
mod models;
mod moderations;
mod usage;
