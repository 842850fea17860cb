//! Files attached to upload queries.

use bytes::Bytes;
use ncore::Form;
use std::path::PathBuf;

/// A file sent as one part of a multipart query.
#[derive(Debug, Clone)]
pub enum InputFile {
    /// Content already in memory.
    Bytes {
        /// File name reported to the server. The server uses its extension
        /// to detect the format.
        filename: String,
        /// The content.
        data: Bytes,
    },
    /// A file on disk, read when the request is built.
    Path(PathBuf),
}

impl InputFile {
    /// An in-memory file.
    pub fn bytes(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::Bytes {
            filename: filename.into(),
            data: data.into(),
        }
    }

    /// A file on disk.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Append this file to a form under `name`.
    pub(crate) fn append(&self, form: Form, name: &str, content_type: &str) -> Form {
        match self {
            Self::Bytes { filename, data } => {
                form.file(name, filename.as_str(), content_type, data.clone())
            }
            Self::Path(path) => form.file_path(name, path.clone(), content_type),
        }
    }
}
