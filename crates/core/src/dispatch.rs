//! Single-shot dispatch.
//!
//! [`Dispatcher`] pairs the client configuration with a transport. It builds
//! each [`Request`] with a fresh token, executes it, and decodes the body:
//! first as the expected type, then as the server's error envelope. The
//! envelope wins over the original decode error because the service returns
//! error payloads that are not the requested schema.

use crate::{
    ApiErrorResponse, Config, Error, HttpTransport, Request, Result, StreamingSession, Transport,
};
use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};
use std::{sync::Arc, time::Duration};

/// Runs requests against the configured server.
#[derive(Clone)]
pub struct Dispatcher<X = HttpTransport> {
    config: Arc<Config>,
    transport: X,
}

impl<X: Transport> Dispatcher<X> {
    /// Create a dispatcher.
    pub fn new(config: Arc<Config>, transport: X) -> Self {
        Self { config, transport }
    }

    /// The configuration requests are built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Materialize a request with the current token, organization and
    /// timeout.
    pub fn build<B: Serialize>(&self, request: &Request<B>) -> Result<reqwest::Request> {
        self.materialize(request, Some(self.config.timeout))
    }

    fn materialize<B: Serialize>(
        &self,
        request: &Request<B>,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Request> {
        let token = self.config.token();
        request.build(
            self.transport.client(),
            &token,
            self.config.organization.as_deref(),
            timeout,
        )
    }

    /// Send a request and decode the body as `T`.
    pub async fn send<T, B>(&self, request: &Request<B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let request = self.build(request)?;
        let body = self.transport.execute(request).await?;
        decode(&body)
    }

    /// Send a request whose reply is raw bytes (e.g. generated audio).
    ///
    /// The body is not decoded, except that an error envelope is still
    /// reported as [`Error::Api`].
    pub async fn send_binary<B: Serialize>(&self, request: &Request<B>) -> Result<Bytes> {
        let request = self.build(request)?;
        let body = self.transport.execute(request).await?;
        decode_binary(body)
    }

    /// Run [`Dispatcher::send`] on a spawned task and hand the outcome to
    /// `completion`, exactly once.
    ///
    /// Returns immediately. Must be called within a tokio runtime.
    pub fn dispatch<T, B>(
        &self,
        request: Request<B>,
        completion: impl FnOnce(Result<T>) + Send + 'static,
    ) where
        T: DeserializeOwned + Send + 'static,
        B: Serialize + Send + Sync + 'static,
    {
        let this = self.clone();
        tokio::spawn(async move {
            let result = this.send(&request).await;
            completion(result);
        });
    }

    /// Callback form of [`Dispatcher::send_binary`].
    pub fn dispatch_binary<B>(
        &self,
        request: Request<B>,
        completion: impl FnOnce(Result<Bytes>) + Send + 'static,
    ) where
        B: Serialize + Send + Sync + 'static,
    {
        let this = self.clone();
        tokio::spawn(async move {
            let result = this.send_binary(&request).await;
            completion(result);
        });
    }

    /// Prepare a streaming session for a request.
    ///
    /// The request is built now, with the current token; a build failure is
    /// reported through the session's completion once it is performed. The
    /// configured timeout limits how long the stream may stall, not how long
    /// it may run.
    pub fn session<T, B: Serialize>(&self, request: &Request<B>) -> StreamingSession<T> {
        StreamingSession::new(self.materialize(request, None)).idle_timeout(self.config.timeout)
    }

    /// Start a prepared session on this dispatcher's transport.
    pub fn perform<T>(&self, session: &Arc<StreamingSession<T>>) -> bool
    where
        T: DeserializeOwned + Send + 'static,
    {
        session.perform(&self.transport)
    }
}

/// Decode a response body as `T`, falling back to the error envelope.
///
/// An empty body is [`Error::EmptyData`]. If `T` does not match and the body
/// parses as [`ApiErrorResponse`], the server error is reported; otherwise
/// the original decode error is.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    if body.is_empty() {
        return Err(Error::EmptyData);
    }
    decode_payload(body)
}

/// Decode a non-empty payload, preferring the error envelope over a decode
/// failure.
pub(crate) fn decode_payload<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    match serde_json::from_slice::<T>(body) {
        Ok(value) => Ok(value),
        Err(err) => match serde_json::from_slice::<ApiErrorResponse>(body) {
            Ok(response) => {
                tracing::debug!("server returned an error payload: {}", response.error);
                Err(Error::Api(response.error))
            }
            Err(_) => {
                tracing::warn!(
                    "failed to decode response: {err}, body: {}",
                    String::from_utf8_lossy(body)
                );
                Err(Error::Decode(err))
            }
        },
    }
}

fn decode_binary(body: Bytes) -> Result<Bytes> {
    if body.is_empty() {
        return Err(Error::EmptyData);
    }
    if let Ok(response) = serde_json::from_slice::<ApiErrorResponse>(&body) {
        return Err(Error::Api(response.error));
    }
    Ok(body)
}
