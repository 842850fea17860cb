//! Streaming sessions.
//!
//! A [`StreamingSession`] owns one streamed request from start to finish.
//! [`StreamingSession::perform`] spawns a task that reads the body, decodes
//! event-stream frames and hands each one to the session's callbacks, in
//! arrival order and one at a time. The task ends with exactly one call to
//! the completion callback; nothing else fires for the session after it.

use crate::{
    ApiErrorResponse, Error, Result, Session, SessionId, Transport,
    dispatch::decode_payload,
    sse::{self, Decoder, Frame},
};
use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::{sync::Arc, time::Duration};

/// Callback for a decoded partial result.
pub type OnReceiveContent<T> = Box<dyn FnMut(T) + Send>;

/// Callback for a frame that could not be decoded.
pub type OnProcessingError = Box<dyn FnMut(Error) + Send>;

/// Callback for the terminal signal, with the failure that ended the
/// session if any.
pub type OnComplete = Box<dyn FnOnce(SessionId, Option<Error>) + Send>;

/// Lifecycle of a session. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Built, not started.
    Created,
    /// The transport stream is open.
    Running,
    /// The completion callback has fired or is firing.
    Completed,
}

struct Handlers<T> {
    on_receive_content: Option<OnReceiveContent<T>>,
    on_processing_error: Option<OnProcessingError>,
    on_complete: Option<OnComplete>,
}

impl<T> Default for Handlers<T> {
    fn default() -> Self {
        Self {
            on_receive_content: None,
            on_processing_error: None,
            on_complete: None,
        }
    }
}

/// A single-use streamed request and its decoding state.
pub struct StreamingSession<T> {
    id: SessionId,
    idle_timeout: Option<Duration>,
    status: Mutex<Status>,
    request: Mutex<Option<Result<reqwest::Request>>>,
    handlers: Mutex<Option<Handlers<T>>>,
}

impl<T> StreamingSession<T> {
    /// Create a session for a built request, or for the error building it
    /// produced. A build error is reported through the completion callback
    /// when the session is performed.
    pub fn new(request: Result<reqwest::Request>) -> Self {
        Self {
            id: SessionId::next(),
            idle_timeout: None,
            status: Mutex::new(Status::Created),
            request: Mutex::new(Some(request)),
            handlers: Mutex::new(Some(Handlers::default())),
        }
    }

    /// Fail the session if the body stalls for longer than `timeout`.
    ///
    /// The wait for the response itself counts as a stall. There is no
    /// deadline on the stream as a whole, so a long generation that keeps
    /// sending runs to the end.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    /// Set the partial-result callback.
    pub fn on_receive_content(mut self, f: impl FnMut(T) + Send + 'static) -> Self {
        if let Some(handlers) = self.handlers.get_mut() {
            handlers.on_receive_content = Some(Box::new(f));
        }
        self
    }

    /// Set the per-frame error callback.
    pub fn on_processing_error(mut self, f: impl FnMut(Error) + Send + 'static) -> Self {
        if let Some(handlers) = self.handlers.get_mut() {
            handlers.on_processing_error = Some(Box::new(f));
        }
        self
    }

    /// Set the completion callback.
    pub fn on_complete(
        mut self,
        f: impl FnOnce(SessionId, Option<Error>) + Send + 'static,
    ) -> Self {
        if let Some(handlers) = self.handlers.get_mut() {
            handlers.on_complete = Some(Box::new(f));
        }
        self
    }

    /// The session identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The current lifecycle state.
    pub fn status(&self) -> Status {
        *self.status.lock()
    }
}

impl<T> StreamingSession<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// Start streaming on a spawned task and return immediately.
    ///
    /// Returns `false` without doing anything if the session was already
    /// performed. Must be called within a tokio runtime.
    pub fn perform<X: Transport>(self: &Arc<Self>, transport: &X) -> bool {
        {
            let mut status = self.status.lock();
            if *status != Status::Created {
                return false;
            }
            *status = Status::Running;
        }

        let request = self.request.lock().take();
        let handlers = self.handlers.lock().take().unwrap_or_default();
        let transport = transport.clone();
        let session = Arc::clone(self);
        tracing::debug!(id = %self.id, "performing streaming session");
        tokio::spawn(async move {
            session.run(transport, request, handlers).await;
        });
        true
    }

    async fn run<X: Transport>(
        self: Arc<Self>,
        transport: X,
        request: Option<Result<reqwest::Request>>,
        mut handlers: Handlers<T>,
    ) {
        let error = match request {
            Some(Ok(request)) => self
                .drive(transport.stream(request), &mut handlers)
                .await
                .err(),
            Some(Err(err)) => Some(err),
            None => Some(Error::transport("streaming session has no request")),
        };

        *self.status.lock() = Status::Completed;
        match &error {
            Some(err) => tracing::debug!(id = %self.id, "streaming session failed: {err}"),
            None => tracing::debug!(id = %self.id, "streaming session completed"),
        }
        if let Some(on_complete) = handlers.on_complete.take() {
            on_complete(self.id, error);
        }
    }

    async fn drive(
        &self,
        stream: impl Stream<Item = Result<Bytes>>,
        handlers: &mut Handlers<T>,
    ) -> Result<()> {
        let mut stream = std::pin::pin!(stream);
        let mut decoder = Decoder::new();
        while let Some(chunk) = self.next(&mut stream).await? {
            let chunk = chunk?;
            tracing::trace!(id = %self.id, "chunk: {}", String::from_utf8_lossy(&chunk));
            for frame in decoder.feed(&chunk) {
                self.deliver(frame, handlers);
            }
        }
        for frame in decoder.finish() {
            self.deliver(frame, handlers);
        }

        match decoder.take_raw() {
            Some(raw) => Err(malformed(&raw)),
            None => Ok(()),
        }
    }

    async fn next<S>(&self, stream: &mut S) -> Result<Option<Result<Bytes>>>
    where
        S: Stream<Item = Result<Bytes>> + Unpin,
    {
        let Some(idle) = self.idle_timeout else {
            return Ok(stream.next().await);
        };
        tokio::time::timeout(idle, stream.next())
            .await
            .map_err(|_| Error::transport(format!("stream idle for more than {idle:?}")))
    }

    fn deliver(&self, frame: Frame, handlers: &mut Handlers<T>) {
        match frame {
            Frame::Done => tracing::trace!(id = %self.id, "end of stream sentinel"),
            Frame::Data(data) => self.decode(&data, handlers),
            Frame::Lines(lines) => {
                let joined = lines.join("\n");
                match decode_payload::<T>(joined.as_bytes()) {
                    Ok(content) => self.receive(content, handlers),
                    Err(err @ Error::Api(_)) => self.reject(err, &joined, handlers),
                    Err(_) => {
                        tracing::trace!(
                            id = %self.id,
                            lines = lines.len(),
                            "decoding event line by line"
                        );
                        for line in lines.iter().filter(|line| !sse::is_done(line)) {
                            self.decode(line, handlers);
                        }
                    }
                }
            }
        }
    }

    fn decode(&self, data: &str, handlers: &mut Handlers<T>) {
        match decode_payload::<T>(data.as_bytes()) {
            Ok(content) => self.receive(content, handlers),
            Err(err) => self.reject(err, data, handlers),
        }
    }

    fn receive(&self, content: T, handlers: &mut Handlers<T>) {
        if let Some(f) = handlers.on_receive_content.as_mut() {
            f(content);
        }
    }

    fn reject(&self, err: Error, data: &str, handlers: &mut Handlers<T>) {
        tracing::warn!(id = %self.id, "failed to process frame: {err}, data: {data}");
        if let Some(f) = handlers.on_processing_error.as_mut() {
            f(err);
        }
    }
}

impl<T: Send + 'static> Session for StreamingSession<T> {
    fn id(&self) -> SessionId {
        self.id
    }

    fn status(&self) -> Status {
        *self.status.lock()
    }
}

/// The error for a body that never looked like an event stream.
fn malformed(raw: &[u8]) -> Error {
    if let Ok(response) = serde_json::from_slice::<ApiErrorResponse>(raw) {
        return Error::Api(response.error);
    }
    let text = String::from_utf8_lossy(raw);
    let preview: String = text.chars().take(256).collect();
    Error::transport(format!("response is not an event stream: {preview}"))
}
