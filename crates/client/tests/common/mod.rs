//! In-memory transport for facade tests.

#![allow(dead_code)]

use bytes::Bytes;
use futures_core::Stream;
use http_body_util::BodyExt;
use narwhal::{Error, Result, Transport};
use ncore::{Method, reqwest};
use parking_lot::Mutex;
use std::sync::Arc;

/// A request as the transport saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Replies to every request with the same chunks.
#[derive(Clone)]
pub struct Mock {
    chunks: Vec<Bytes>,
    failure: Option<String>,
    client: reqwest::Client,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Mock {
    pub fn body(body: impl Into<Bytes>) -> Self {
        Self::chunks([body.into()])
    }

    pub fn chunks<C: Into<Bytes>>(chunks: impl IntoIterator<Item = C>) -> Self {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
            failure: None,
            client: reqwest::Client::new(),
            requests: Arc::default(),
        }
    }

    pub fn fail(message: &str) -> Self {
        Self {
            failure: Some(message.to_owned()),
            ..Self::chunks(Vec::<Bytes>::new())
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests.lock().last().cloned().expect("no request recorded")
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
            content_type: request
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned),
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
        match &self.failure {
            Some(message) => Err(Error::transport(message.clone())),
            None => Ok(self.chunks.concat().into()),
        }
    }

    fn stream(
        &self,
        request: reqwest::Request,
    ) -> impl Stream<Item = Result<Bytes>> + Send + 'static {
        let this = self.clone();
        async_stream::stream! {
            this.record(request).await;
            for chunk in this.chunks.clone() {
                yield Ok(chunk);
            }
            if let Some(message) = this.failure.clone() {
                yield Err(Error::transport(message));
            }
        }
    }
}
