//! `multipart/form-data` bodies.
//!
//! [`Form`] is the inspectable description of a form: the parts in the order
//! they were added. Some endpoints read their fields positionally (an image
//! edit expects the image before the mask), so nothing is ever reordered,
//! neither here nor in the `reqwest` form it is converted to.

use crate::{Error, Result};
use bytes::Bytes;
use reqwest::multipart;
use std::{fmt::Display, path::PathBuf};

/// An ordered list of form fields and files.
#[derive(Debug, Clone, Default)]
pub struct Form {
    parts: Vec<Part>,
}

/// One field of a multipart form.
#[derive(Debug, Clone)]
pub enum Part {
    /// A plain `name=value` field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// A file upload.
    File {
        /// Field name.
        name: String,
        /// File name reported to the server.
        filename: String,
        /// MIME type of the content.
        content_type: String,
        /// Where the content comes from.
        content: Content,
    },
}

/// File content of a [`Part::File`].
#[derive(Debug, Clone)]
pub enum Content {
    /// Bytes already in memory.
    Bytes(Bytes),
    /// A path read when the request is built.
    Path(PathBuf),
}

impl Part {
    /// The field name.
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

impl Form {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append a text field if the value is present.
    pub fn text_opt(self, name: impl Into<String>, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.text(name, value.to_string()),
            None => self,
        }
    }

    /// Append an in-memory file.
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(Part::File {
            name: name.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            content: Content::Bytes(bytes.into()),
        });
        self
    }

    /// Append a file read from disk when the request is built.
    ///
    /// The reported file name is the last component of `path`.
    pub fn file_path(
        mut self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        content_type: impl Into<String>,
    ) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.parts.push(Part::File {
            name: name.into(),
            filename,
            content_type: content_type.into(),
            content: Content::Path(path),
        });
        self
    }

    /// The parts in wire order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the form has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Convert to the form `reqwest` puts on the wire, part by part in the
    /// order they were added.
    ///
    /// File parts backed by a path are read now. Fails with
    /// [`Error::Encoding`] if a file cannot be read or a content type is not
    /// a valid MIME type.
    pub fn to_multipart(&self) -> Result<multipart::Form> {
        let mut form = multipart::Form::new();
        for part in &self.parts {
            form = match part {
                Part::Text { name, value } => form.text(name.clone(), value.clone()),
                Part::File {
                    name,
                    filename,
                    content_type,
                    content,
                } => {
                    let bytes = match content {
                        Content::Bytes(bytes) => bytes.to_vec(),
                        Content::Path(path) => std::fs::read(path).map_err(|e| {
                            Error::encoding(format!("failed to read {}: {e}", path.display()))
                        })?,
                    };
                    let file = multipart::Part::bytes(bytes)
                        .file_name(filename.clone())
                        .mime_str(content_type)
                        .map_err(|e| {
                            Error::encoding(format!("invalid content type for {name}: {e}"))
                        })?;
                    form.part(name.clone(), file)
                }
            };
        }
        Ok(form)
    }
}
