//! The network collaborator.
//!
//! A [`Transport`] executes materialized requests. [`HttpTransport`] does it
//! over a shared `reqwest::Client`; tests plug in in-memory transports that
//! still assemble requests with a client of their own.

use crate::Result;
use async_stream::try_stream;
use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::Client;

/// Executes transport requests.
pub trait Transport: Clone + Send + Sync + 'static {
    /// The client requests are assembled with, before they are handed back
    /// to [`Transport::execute`] or [`Transport::stream`].
    fn client(&self) -> &Client;

    /// Execute a request and collect the full response body.
    fn execute(&self, request: reqwest::Request) -> impl Future<Output = Result<Bytes>> + Send;

    /// Execute a request and yield the response body chunk by chunk.
    ///
    /// The stream ends when the server closes the body; a failure is
    /// yielded as the last item.
    fn stream(
        &self,
        request: reqwest::Request,
    ) -> impl Stream<Item = Result<Bytes>> + Send + 'static;
}

/// HTTP transport over `reqwest`.
///
/// Response bodies are passed through whatever the status code; the
/// dispatcher recognizes error payloads by their shape.
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Wrap an existing client so connection pools are shared.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn client(&self) -> &Client {
        &self.client
    }

    async fn execute(&self, request: reqwest::Request) -> Result<Bytes> {
        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(%status, len = body.len(), "received response");
        Ok(body)
    }

    fn stream(
        &self,
        request: reqwest::Request,
    ) -> impl Stream<Item = Result<Bytes>> + Send + 'static {
        tracing::debug!(method = %request.method(), url = %request.url(), "opening stream");
        let client = self.client.clone();
        try_stream! {
            let response = client.execute(request).await?;
            tracing::debug!(status = %response.status(), "stream opened");
            let mut stream = response.bytes_stream();
            while let Some(next) = stream.next().await {
                yield next?;
            }
        }
    }
}
