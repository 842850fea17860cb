//! In-memory transport shared by the integration tests.

#![allow(dead_code)]

use bytes::Bytes;
use futures_core::Stream;
use http_body_util::BodyExt;
use narwhal_core::{Error, Method, Result, Transport, reqwest, reqwest::header::HeaderMap};
use parking_lot::Mutex;
use rand::Rng;
use std::{sync::Arc, time::Duration};

/// A request as the transport saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub timeout: Option<Duration>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
enum Reply {
    Chunks(Vec<Vec<u8>>),
    FailAfter(Vec<Vec<u8>>, String),
}

/// Replies to every request with the same canned body.
#[derive(Clone)]
pub struct Mock {
    reply: Reply,
    jitter: bool,
    gap: Option<Duration>,
    client: reqwest::Client,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Mock {
    pub fn body(body: impl Into<Vec<u8>>) -> Self {
        Self::chunks([body.into()])
    }

    pub fn chunks<C: Into<Vec<u8>>>(chunks: impl IntoIterator<Item = C>) -> Self {
        Self::new(Reply::Chunks(chunks.into_iter().map(Into::into).collect()))
    }

    pub fn empty() -> Self {
        Self::new(Reply::Chunks(Vec::new()))
    }

    pub fn fail(message: &str) -> Self {
        Self::new(Reply::FailAfter(Vec::new(), message.to_owned()))
    }

    pub fn fail_after<C: Into<Vec<u8>>>(
        chunks: impl IntoIterator<Item = C>,
        message: &str,
    ) -> Self {
        Self::new(Reply::FailAfter(
            chunks.into_iter().map(Into::into).collect(),
            message.to_owned(),
        ))
    }

    /// Sleep a random few milliseconds before every streamed chunk.
    pub fn jitter(mut self) -> Self {
        self.jitter = true;
        self
    }

    /// Pause this long before every streamed chunk.
    pub fn gap(mut self, gap: Duration) -> Self {
        self.gap = Some(gap);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    fn new(reply: Reply) -> Self {
        Self {
            reply,
            jitter: false,
            gap: None,
            client: reqwest::Client::new(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Record a request, draining its body the way the wire would.
    async fn record(&self, mut request: reqwest::Request) {
        let body = match request.body_mut().take() {
            Some(body) => body.collect().await.unwrap().to_bytes().to_vec(),
            None => Vec::new(),
        };
        self.requests.lock().push(Recorded {
            method: request.method().clone(),
            url: request.url().to_string(),
            headers: request.headers().clone(),
            timeout: request.timeout().copied(),
            body,
        });
    }
}

impl Transport for Mock {
    fn client(&self) -> &reqwest::Client {
        &self.client
    }

    async fn execute(&self, request: reqwest::Request) -> Result<Bytes> {
        self.record(request).await;
        match &self.reply {
            Reply::Chunks(chunks) => Ok(Bytes::from(chunks.concat())),
            Reply::FailAfter(_, message) => Err(Error::transport(message.clone())),
        }
    }

    fn stream(
        &self,
        request: reqwest::Request,
    ) -> impl Stream<Item = Result<Bytes>> + Send + 'static {
        let this = self.clone();
        async_stream::stream! {
            this.record(request).await;
            let (chunks, failure) = match this.reply.clone() {
                Reply::Chunks(chunks) => (chunks, None),
                Reply::FailAfter(chunks, message) => (chunks, Some(message)),
            };
            for chunk in chunks {
                if this.jitter {
                    let millis = rand::rng().random_range(0..4);
                    tokio::time::sleep(Duration::from_millis(millis)).await;
                }
                if let Some(gap) = this.gap {
                    tokio::time::sleep(gap).await;
                }
                yield Ok(Bytes::from(chunk));
            }
            if let Some(message) = failure {
                yield Err(Error::transport(message));
            }
        }
    }
}

/// Short name of an error variant, for compact assertions.
pub fn kind(err: &Error) -> &'static str {
    match err {
        Error::Transport(_) => "transport",
        Error::EmptyData => "empty",
        Error::Decode(_) => "decode",
        Error::Api(_) => "api",
        Error::Encoding(_) => "encoding",
    }
}
