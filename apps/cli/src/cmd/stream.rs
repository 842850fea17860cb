//! Streamed chat output.

use anyhow::{Context, Result};
use narwhal::{
    Client, Error, Transport,
    schema::{ChatQuery, ChatStreamResult},
};
use std::io::Write;
use tokio::sync::mpsc;

enum Event {
    Chunk(narwhal::Result<ChatStreamResult>),
    Done(Option<Error>),
}

/// Stream a chat completion into `out`, writing each delta as it arrives.
///
/// Frames that fail to decode are logged and skipped. Returns once the
/// session completes.
pub async fn chat<X: Transport>(
    client: &Client<X>,
    query: &ChatQuery,
    out: &mut impl Write,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let done = tx.clone();
    let id = client.chats_stream(
        query,
        move |result| {
            let _ = tx.send(Event::Chunk(result));
        },
        move |err| {
            let _ = done.send(Event::Done(err));
        },
    );

    while let Some(event) = rx.recv().await {
        match event {
            Event::Chunk(Ok(chunk)) => {
                if let Some(content) = chunk.content() {
                    write!(out, "{content}")?;
                    out.flush()?;
                }
            }
            Event::Chunk(Err(err)) => tracing::warn!(%id, "skipped frame: {err}"),
            Event::Done(None) => return Ok(()),
            Event::Done(Some(err)) => return Err(err).context("stream failed"),
        }
    }
    Ok(())
}
