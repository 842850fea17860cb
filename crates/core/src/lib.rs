//! Request dispatch and streaming-session engine for the narwhal client.
//!
//! A [`Request`] describes an outgoing call (JSON body, multipart form or no
//! body). The [`Dispatcher`] materializes it with the configured token and
//! timeout, runs it through a [`Transport`] and decodes the reply, falling
//! back to the server's error shape when the body is not the expected type.
//! Streaming endpoints go through a [`StreamingSession`], which turns a live
//! `text/event-stream` body into typed partial results. In-flight sessions
//! are owned by a [`Sessions`] registry until they complete.

pub use {
    config::{Config, ConfigFile},
    dispatch::Dispatcher,
    endpoint::build_url,
    error::{ApiError, ApiErrorResponse, Error, Result},
    multipart::{Form, Part},
    registry::{Session, SessionId, Sessions},
    request::Request,
    stream::{Status, StreamingSession},
    token::TokenProvider,
    transport::{HttpTransport, Transport},
};

pub use reqwest::{self, Method};
pub use url::Url;

pub mod config;
pub mod dispatch;
mod endpoint;
mod error;
pub mod multipart;
pub mod registry;
pub mod request;
pub mod sse;
pub mod stream;
mod token;
pub mod transport;
