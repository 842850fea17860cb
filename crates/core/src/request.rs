//! Declarative request descriptors.
//!
//! A [`Request`] captures what to send without touching the network.
//! [`Request::build`] turns it into a transport-level `reqwest::Request`
//! once the token, organization and timeout are known.

use crate::{Error, Form, Result};
use reqwest::{
    Method,
    header::{self, HeaderName, HeaderValue},
};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Header carrying the organization identifier.
pub const ORGANIZATION: HeaderName = HeaderName::from_static("openai-organization");

/// An outgoing request before it is materialized.
///
/// Exactly one body encoding per request. JSON requests default to `POST`,
/// bodiless ones to `GET`; [`Request::method`] overrides either.
#[derive(Debug, Clone)]
pub enum Request<B = ()> {
    /// A JSON-encoded body.
    Json {
        /// Target URL.
        url: Url,
        /// HTTP method.
        method: Method,
        /// The value serialized into the body.
        body: B,
    },
    /// A `multipart/form-data` body.
    Multipart {
        /// Target URL.
        url: Url,
        /// The ordered form parts.
        form: Form,
    },
    /// No body at all.
    Bodiless {
        /// Target URL.
        url: Url,
        /// HTTP method.
        method: Method,
    },
}

impl<B: Serialize> Request<B> {
    /// A `POST` with a JSON body.
    pub fn json(url: Url, body: B) -> Self {
        Self::Json {
            url,
            method: Method::POST,
            body,
        }
    }

    /// Override the method of a JSON or bodiless request.
    ///
    /// Multipart requests are always `POST`.
    pub fn method(mut self, method: Method) -> Self {
        match &mut self {
            Self::Json { method: m, .. } | Self::Bodiless { method: m, .. } => *m = method,
            Self::Multipart { .. } => {}
        }
        self
    }

    /// The target URL.
    pub fn url(&self) -> &Url {
        match self {
            Self::Json { url, .. } | Self::Multipart { url, .. } | Self::Bodiless { url, .. } => {
                url
            }
        }
    }

    /// The HTTP method the request will be sent with.
    pub fn http_method(&self) -> Method {
        match self {
            Self::Json { method, .. } | Self::Bodiless { method, .. } => method.clone(),
            Self::Multipart { .. } => Method::POST,
        }
    }

    /// Materialize the transport request.
    ///
    /// Sets `Authorization: Bearer <token>`, the organization header when
    /// given, the content type of the body, and the timeout if there is one.
    /// `client` only assembles the request; it is not sent here. Fails with
    /// [`Error::Encoding`] if the body cannot be serialized, a file part
    /// cannot be read, or a header value is invalid.
    pub fn build(
        &self,
        client: &reqwest::Client,
        token: &str,
        organization: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Request> {
        let mut builder = client
            .request(self.http_method(), self.url().clone())
            .header(header::AUTHORIZATION, header_value(&format!("Bearer {token}"))?);
        if let Some(organization) = organization {
            builder = builder.header(ORGANIZATION, header_value(organization)?);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        builder = match self {
            Self::Json { body, .. } => {
                let bytes = serde_json::to_vec(body).map_err(Error::encoding)?;
                if tracing::enabled!(tracing::Level::TRACE) {
                    tracing::trace!("request: {}", String::from_utf8_lossy(&bytes));
                }
                builder
                    .header(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    )
                    .body(bytes)
            }
            Self::Multipart { form, .. } => {
                tracing::trace!(parts = form.len(), "multipart request");
                builder.multipart(form.to_multipart()?)
            }
            Self::Bodiless { .. } => builder,
        };

        builder.build().map_err(Error::encoding)
    }
}

impl Request {
    /// A `POST` with a multipart form body.
    pub fn multipart(url: Url, form: Form) -> Self {
        Self::Multipart { url, form }
    }

    /// A bodiless `GET`.
    pub fn get(url: Url) -> Self {
        Self::Bodiless {
            url,
            method: Method::GET,
        }
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(Error::encoding)
}
