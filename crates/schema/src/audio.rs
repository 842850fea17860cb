//! Speech synthesis, transcription and translation.

use crate::InputFile;
use bytes::Bytes;
use ncore::Form;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in voices for speech synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
}

/// Encoding of synthesized speech.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechFormat {
    #[default]
    Mp3,
    Opus,
    Aac,
    Flac,
    Wav,
    Pcm,
}

/// Body of `POST /v1/audio/speech`. The reply is raw audio, not JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSpeechQuery {
    /// The model identifier, e.g. `tts-1`.
    pub model: String,

    /// Text to speak.
    pub input: String,

    /// Voice to speak with.
    pub voice: Voice,

    /// Audio encoding of the reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<SpeechFormat>,

    /// Playback speed, 0.25 to 4.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl AudioSpeechQuery {
    /// Create a query.
    pub fn new(model: impl Into<String>, input: impl Into<String>, voice: Voice) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            voice,
            response_format: None,
            speed: None,
        }
    }

    /// Set the audio encoding.
    pub fn format(mut self, format: SpeechFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

/// Synthesized audio in the requested encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSpeechResult {
    /// The encoded audio.
    pub audio: Bytes,
}

/// Audio container of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Flac,
    Mp3,
    Mp4,
    Mpeg,
    Mpga,
    M4a,
    Ogg,
    Wav,
    Webm,
}

impl FileType {
    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Flac => "flac",
            Self::Mp3 => "mp3",
            Self::Mp4 => "mp4",
            Self::Mpeg => "mpeg",
            Self::Mpga => "mpga",
            Self::M4a => "m4a",
            Self::Ogg => "ogg",
            Self::Wav => "wav",
            Self::Webm => "webm",
        }
    }

    /// MIME type of the container.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Flac => "audio/flac",
            Self::Mp3 | Self::Mpeg | Self::Mpga => "audio/mpeg",
            Self::Mp4 => "audio/mp4",
            Self::M4a => "audio/m4a",
            Self::Ogg => "audio/ogg",
            Self::Wav => "audio/wav",
            Self::Webm => "audio/webm",
        }
    }
}

/// Format of a transcription or translation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioResponseFormat {
    #[default]
    Json,
    Text,
    Srt,
    VerboseJson,
    Vtt,
}

impl fmt::Display for AudioResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Srt => "srt",
            Self::VerboseJson => "verbose_json",
            Self::Vtt => "vtt",
        })
    }
}

/// Multipart query of `POST /v1/audio/transcriptions`.
#[derive(Debug, Clone)]
pub struct AudioTranscriptionQuery {
    /// The audio to transcribe.
    pub file: InputFile,

    /// Container of `file`.
    pub file_type: FileType,

    /// The model identifier, e.g. `whisper-1`.
    pub model: String,

    /// Text guiding style or continuing a previous segment.
    pub prompt: Option<String>,

    /// Sampling temperature.
    pub temperature: Option<f64>,

    /// ISO-639-1 language of the audio.
    pub language: Option<String>,

    /// Format of the result. Only the JSON formats decode into
    /// [`AudioTranscriptionResult`].
    pub response_format: Option<AudioResponseFormat>,
}

impl AudioTranscriptionQuery {
    /// A query with only the required fields.
    pub fn new(file: InputFile, file_type: FileType, model: impl Into<String>) -> Self {
        Self {
            file,
            file_type,
            model: model.into(),
            prompt: None,
            temperature: None,
            language: None,
            response_format: None,
        }
    }

    /// Set the language of the audio.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// The form sent to the server.
    pub fn form(&self) -> Form {
        audio_file(&self.file, self.file_type)
            .text("model", self.model.as_str())
            .text_opt("prompt", self.prompt.as_deref())
            .text_opt("temperature", self.temperature)
            .text_opt("language", self.language.as_deref())
            .text_opt("response_format", self.response_format)
    }
}

/// Result of `POST /v1/audio/transcriptions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTranscriptionResult {
    /// The transcribed text.
    pub text: String,
}

/// Multipart query of `POST /v1/audio/translations`. The result is always
/// English.
#[derive(Debug, Clone)]
pub struct AudioTranslationQuery {
    /// The audio to translate.
    pub file: InputFile,

    /// Container of `file`.
    pub file_type: FileType,

    /// The model identifier, e.g. `whisper-1`.
    pub model: String,

    /// Text guiding style, in English.
    pub prompt: Option<String>,

    /// Sampling temperature.
    pub temperature: Option<f64>,

    /// Format of the result.
    pub response_format: Option<AudioResponseFormat>,
}

impl AudioTranslationQuery {
    /// A query with only the required fields.
    pub fn new(file: InputFile, file_type: FileType, model: impl Into<String>) -> Self {
        Self {
            file,
            file_type,
            model: model.into(),
            prompt: None,
            temperature: None,
            response_format: None,
        }
    }

    /// The form sent to the server.
    pub fn form(&self) -> Form {
        audio_file(&self.file, self.file_type)
            .text("model", self.model.as_str())
            .text_opt("prompt", self.prompt.as_deref())
            .text_opt("temperature", self.temperature)
            .text_opt("response_format", self.response_format)
    }
}

/// Result of `POST /v1/audio/translations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTranslationResult {
    /// The English text.
    pub text: String,
}

fn audio_file(file: &InputFile, file_type: FileType) -> Form {
    file.append(Form::new(), "file", file_type.content_type())
}
