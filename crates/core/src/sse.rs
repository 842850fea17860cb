//! Incremental `text/event-stream` decoding.
//!
//! Bytes arrive in arbitrary chunks; [`Decoder::feed`] buffers partial lines
//! and yields a [`Frame`] for every complete event. An event is a run of
//! `data:` lines closed by a blank line. A single line is its own payload;
//! several lines are kept apart in [`Frame::Lines`] because servers send
//! both one payload split over lines and several payloads back to back.
//! `event:`, `id:`, `retry:` and comment lines are accepted and ignored.
//!
//! If the first non-blank line is not an event-stream field the body is not
//! an event stream at all (typically a plain JSON error). From then on the
//! decoder only collects bytes, available through [`Decoder::take_raw`].

/// Payload marking the end of the stream.
pub const DONE: &str = "[DONE]";

/// One decoded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// The payload of a single `data:` line.
    Data(String),
    /// The `data:` lines of one event, in order. Joined with `\n` they may
    /// form one payload, or each line may be a payload of its own.
    Lines(Vec<String>),
    /// The end-of-stream sentinel.
    Done,
}

/// Event-stream decoder state.
#[derive(Debug, Default)]
pub struct Decoder {
    line: Vec<u8>,
    data: Vec<String>,
    started: bool,
    raw: Option<Vec<u8>>,
}

impl Decoder {
    /// Create a decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a chunk, returning the events it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Frame> {
        let mut frames = Vec::new();
        let mut rest = chunk;
        while !rest.is_empty() {
            if let Some(raw) = &mut self.raw {
                raw.extend_from_slice(rest);
                break;
            }
            match rest.iter().position(|b| *b == b'\n') {
                Some(pos) => {
                    self.line.extend_from_slice(&rest[..pos]);
                    rest = &rest[pos + 1..];
                    let line = std::mem::take(&mut self.line);
                    self.process_line(line, &mut frames);
                }
                None => {
                    self.line.extend_from_slice(rest);
                    break;
                }
            }
        }
        frames
    }

    /// Flush at end of stream: a trailing line without a newline and an
    /// event without its closing blank line are still delivered.
    pub fn finish(&mut self) -> Vec<Frame> {
        let mut frames = Vec::new();
        if self.raw.is_none() && !self.line.is_empty() {
            let line = std::mem::take(&mut self.line);
            self.process_line(line, &mut frames);
        }
        if self.raw.is_none() {
            self.dispatch(&mut frames);
        }
        frames
    }

    /// Whether the body turned out not to be an event stream.
    pub fn is_raw(&self) -> bool {
        self.raw.is_some()
    }

    /// Take the collected bytes of a body that is not an event stream.
    pub fn take_raw(&mut self) -> Option<Vec<u8>> {
        self.raw.take()
    }

    fn process_line(&mut self, mut line: Vec<u8>, frames: &mut Vec<Frame>) {
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.is_empty() {
            self.dispatch(frames);
            return;
        }
        if !self.started {
            if !is_field(&line) {
                line.push(b'\n');
                self.raw = Some(line);
                return;
            }
            self.started = true;
        }

        let line = String::from_utf8_lossy(&line);
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (&*line, ""),
        };
        match field {
            "data" => self.data.push(value.to_owned()),
            "" => {}
            field => tracing::trace!("ignoring event-stream field: {field}"),
        }
    }

    fn dispatch(&mut self, frames: &mut Vec<Frame>) {
        let mut lines = std::mem::take(&mut self.data);
        lines.retain(|line| !line.trim().is_empty());
        match lines.len() {
            0 => {}
            1 => {
                let payload = lines.remove(0);
                if is_done(&payload) {
                    frames.push(Frame::Done);
                } else {
                    frames.push(Frame::Data(payload));
                }
            }
            _ => frames.push(Frame::Lines(lines)),
        }
    }
}

/// Whether a payload is the end-of-stream sentinel.
pub fn is_done(payload: &str) -> bool {
    payload.trim().eq_ignore_ascii_case(DONE)
}

fn is_field(line: &[u8]) -> bool {
    if line.first() == Some(&b':') {
        return true;
    }
    let name = match line.iter().position(|b| *b == b':') {
        Some(pos) => &line[..pos],
        None => line,
    };
    matches!(name, b"data" | b"event" | b"id" | b"retry")
}
