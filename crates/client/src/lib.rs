//! Typed client for OpenAI-compatible inference APIs.
//!
//! [`Client`] has one method per endpoint. Single-shot calls are `async`
//! and resolve to the decoded result or an [`Error`]. Streaming calls start
//! a session in the background, hand every partial result to a callback and
//! return the session's [`SessionId`] right away; the client keeps the
//! session alive until it completes.
//!
//! ```no_run
//! use narwhal::{Client, Config, schema::{ChatMessage, ChatQuery}};
//!
//! # async fn run() -> narwhal::Result<()> {
//! let client = Client::new(Config::new("sk-..."));
//! let query = ChatQuery::new("gpt-4o", vec![ChatMessage::user("hello")]);
//! let result = client.chats(&query).await?;
//! println!("{}", result.content().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub use ncore::{
    ApiError, Config, ConfigFile, Error, HttpTransport, Result, SessionId, Sessions, Transport,
};
pub use schema;

use ncore::{Dispatcher, Request, StreamingSession};
use parking_lot::Mutex;
use schema::{
    AudioSpeechQuery, AudioSpeechResult, AudioTranscriptionQuery, AudioTranscriptionResult,
    AudioTranslationQuery, AudioTranslationResult, ChatQuery, ChatResult, ChatStreamResult,
    CompletionsQuery, CompletionsResult, EmbeddingsQuery, EmbeddingsResult, ImageEditsQuery,
    ImageVariationsQuery, ImagesQuery, ImagesResult, ModelQuery, ModelResult, ModelsResult,
    ModerationsQuery, ModerationsResult,
};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

pub mod path;

/// Client for one configured server.
///
/// Cloning is cheap; clones share the configuration, the transport and the
/// session registry.
#[derive(Clone)]
pub struct Client<X: Transport = HttpTransport> {
    dispatcher: Dispatcher<X>,
    sessions: Arc<Sessions>,
}

impl Client {
    /// Create a client over HTTP.
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, HttpTransport::default())
    }
}

impl<X: Transport> Client<X> {
    /// Create a client over a custom transport.
    pub fn with_transport(config: Config, transport: X) -> Self {
        Self {
            dispatcher: Dispatcher::new(Arc::new(config), transport),
            sessions: Arc::new(Sessions::new()),
        }
    }

    /// The client configuration.
    pub fn config(&self) -> &Config {
        self.dispatcher.config()
    }

    /// Streaming sessions that have not completed yet.
    pub fn sessions(&self) -> &Arc<Sessions> {
        &self.sessions
    }

    /// The dispatcher behind every call, for requests the facade does not
    /// cover.
    pub fn dispatcher(&self) -> &Dispatcher<X> {
        &self.dispatcher
    }

    /// `POST /v1/completions`.
    pub async fn completions(&self, query: &CompletionsQuery) -> Result<CompletionsResult> {
        self.json(path::COMPLETIONS, query).await
    }

    /// Streamed `POST /v1/completions`.
    ///
    /// `on_result` receives every partial result, and every frame that
    /// failed to decode, in arrival order. `on_complete` fires once at the
    /// end, with the error that ended the stream if any.
    pub fn completions_stream(
        &self,
        query: &CompletionsQuery,
        on_result: impl FnMut(Result<CompletionsResult>) + Send + 'static,
        on_complete: impl FnOnce(Option<Error>) + Send + 'static,
    ) -> SessionId {
        let query = query.clone().stream(true);
        self.stream(path::COMPLETIONS, query, on_result, on_complete)
    }

    /// `POST /v1/chat/completions`.
    pub async fn chats(&self, query: &ChatQuery) -> Result<ChatResult> {
        self.json(path::CHATS, query).await
    }

    /// Streamed `POST /v1/chat/completions`. Callbacks behave as in
    /// [`Client::completions_stream`].
    pub fn chats_stream(
        &self,
        query: &ChatQuery,
        on_result: impl FnMut(Result<ChatStreamResult>) + Send + 'static,
        on_complete: impl FnOnce(Option<Error>) + Send + 'static,
    ) -> SessionId {
        let query = query.clone().stream(true);
        self.stream(path::CHATS, query, on_result, on_complete)
    }

    /// `POST /v1/embeddings`.
    pub async fn embeddings(&self, query: &EmbeddingsQuery) -> Result<EmbeddingsResult> {
        self.json(path::EMBEDDINGS, query).await
    }

    /// `POST /v1/images/generations`.
    pub async fn images(&self, query: &ImagesQuery) -> Result<ImagesResult> {
        self.json(path::IMAGES, query).await
    }

    /// `POST /v1/images/edits`.
    pub async fn image_edits(&self, query: &ImageEditsQuery) -> Result<ImagesResult> {
        let request = Request::multipart(self.config().url(path::IMAGE_EDITS)?, query.form());
        self.dispatcher.send(&request).await
    }

    /// `POST /v1/images/variations`.
    pub async fn image_variations(&self, query: &ImageVariationsQuery) -> Result<ImagesResult> {
        let request = Request::multipart(self.config().url(path::IMAGE_VARIATIONS)?, query.form());
        self.dispatcher.send(&request).await
    }

    /// `POST /v1/moderations`.
    pub async fn moderations(&self, query: &ModerationsQuery) -> Result<ModerationsResult> {
        self.json(path::MODERATIONS, query).await
    }

    /// `GET /v1/models`.
    pub async fn models(&self) -> Result<ModelsResult> {
        let request = Request::get(self.config().url(path::MODELS)?);
        self.dispatcher.send(&request).await
    }

    /// `GET /v1/models/{id}`.
    pub async fn model(&self, query: &ModelQuery) -> Result<ModelResult> {
        let request = Request::get(self.config().url(&path::model(&query.model))?);
        self.dispatcher.send(&request).await
    }

    /// `POST /v1/audio/speech`. The reply is the encoded audio.
    pub async fn audio_create_speech(&self, query: &AudioSpeechQuery) -> Result<AudioSpeechResult> {
        let request = Request::json(self.config().url(path::AUDIO_SPEECH)?, query);
        let audio = self.dispatcher.send_binary(&request).await?;
        Ok(AudioSpeechResult { audio })
    }

    /// `POST /v1/audio/transcriptions`.
    pub async fn audio_transcriptions(
        &self,
        query: &AudioTranscriptionQuery,
    ) -> Result<AudioTranscriptionResult> {
        let request =
            Request::multipart(self.config().url(path::AUDIO_TRANSCRIPTIONS)?, query.form());
        self.dispatcher.send(&request).await
    }

    /// `POST /v1/audio/translations`.
    pub async fn audio_translations(
        &self,
        query: &AudioTranslationQuery,
    ) -> Result<AudioTranslationResult> {
        let request =
            Request::multipart(self.config().url(path::AUDIO_TRANSLATIONS)?, query.form());
        self.dispatcher.send(&request).await
    }

    async fn json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let request = Request::json(self.config().url(path)?, body);
        self.dispatcher.send(&request).await
    }

    /// Start a streamed JSON request.
    ///
    /// The session is registered before it is performed and removed by its
    /// own completion, before `on_complete` runs.
    fn stream<T, B>(
        &self,
        path: &str,
        body: B,
        on_result: impl FnMut(Result<T>) + Send + 'static,
        on_complete: impl FnOnce(Option<Error>) + Send + 'static,
    ) -> SessionId
    where
        T: DeserializeOwned + Send + 'static,
        B: Serialize,
    {
        let session = match self.config().url(path) {
            Ok(url) => self.dispatcher.session(&Request::json(url, body)),
            Err(err) => StreamingSession::new(Err(err)),
        };

        let on_content = Arc::new(Mutex::new(on_result));
        let on_error = on_content.clone();
        let sessions = self.sessions.clone();
        let session = Arc::new(
            session
                .on_receive_content(move |content| (&mut *on_content.lock())(Ok(content)))
                .on_processing_error(move |err| (&mut *on_error.lock())(Err(err)))
                .on_complete(move |id, err| {
                    sessions.remove(id);
                    on_complete(err);
                }),
        );

        let id = session.id();
        self.sessions.append(session.clone());
        self.dispatcher.perform(&session);
        tracing::debug!(%id, path, live = self.sessions.len(), "started streaming session");
        id
    }
}
