//! Image generation, edits and variations.
//!
//! Edits and variations upload files, so their queries build multipart
//! forms instead of serializing to JSON.

use crate::InputFile;
use ncore::Form;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How generated images are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageResponseFormat {
    /// A temporary URL.
    Url,
    /// Inline base64 data.
    B64Json,
}

impl fmt::Display for ImageResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Url => "url",
            Self::B64Json => "b64_json",
        })
    }
}

/// Body of `POST /v1/images/generations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesQuery {
    /// Description of the image.
    pub prompt: String,

    /// The model identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Number of images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,

    /// Size such as `1024x1024`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Quality, e.g. `hd`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,

    /// Style, e.g. `vivid` or `natural`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// How images are returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ImageResponseFormat>,

    /// End-user identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl ImagesQuery {
    /// A query with only the prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
            n: None,
            size: None,
            quality: None,
            style: None,
            response_format: None,
            user: None,
        }
    }
}

/// Multipart query of `POST /v1/images/edits`.
#[derive(Debug, Clone)]
pub struct ImageEditsQuery {
    /// The PNG to edit.
    pub image: InputFile,

    /// Transparent areas mark where to edit. Defaults to the image's own
    /// transparency.
    pub mask: Option<InputFile>,

    /// Description of the edited image.
    pub prompt: String,

    /// The model identifier.
    pub model: Option<String>,

    /// Number of images.
    pub n: Option<u32>,

    /// Output size.
    pub size: Option<String>,

    /// How images are returned.
    pub response_format: Option<ImageResponseFormat>,

    /// End-user identifier.
    pub user: Option<String>,
}

impl ImageEditsQuery {
    /// A query with only the required fields.
    pub fn new(image: InputFile, prompt: impl Into<String>) -> Self {
        Self {
            image,
            mask: None,
            prompt: prompt.into(),
            model: None,
            n: None,
            size: None,
            response_format: None,
            user: None,
        }
    }

    /// Set the mask.
    pub fn mask(mut self, mask: InputFile) -> Self {
        self.mask = Some(mask);
        self
    }

    /// The form sent to the server. The image always precedes the mask.
    pub fn form(&self) -> Form {
        let mut form = self.image.append(Form::new(), "image", "image/png");
        if let Some(mask) = &self.mask {
            form = mask.append(form, "mask", "image/png");
        }
        form.text("prompt", self.prompt.as_str())
            .text_opt("model", self.model.as_deref())
            .text_opt("n", self.n)
            .text_opt("size", self.size.as_deref())
            .text_opt("response_format", self.response_format)
            .text_opt("user", self.user.as_deref())
    }
}

/// Multipart query of `POST /v1/images/variations`.
#[derive(Debug, Clone)]
pub struct ImageVariationsQuery {
    /// The PNG to vary.
    pub image: InputFile,

    /// The model identifier.
    pub model: Option<String>,

    /// Number of images.
    pub n: Option<u32>,

    /// Output size.
    pub size: Option<String>,

    /// How images are returned.
    pub response_format: Option<ImageResponseFormat>,

    /// End-user identifier.
    pub user: Option<String>,
}

impl ImageVariationsQuery {
    /// A query with only the image.
    pub fn new(image: InputFile) -> Self {
        Self {
            image,
            model: None,
            n: None,
            size: None,
            response_format: None,
            user: None,
        }
    }

    /// The form sent to the server.
    pub fn form(&self) -> Form {
        self.image
            .append(Form::new(), "image", "image/png")
            .text_opt("model", self.model.as_deref())
            .text_opt("n", self.n)
            .text_opt("size", self.size.as_deref())
            .text_opt("response_format", self.response_format)
            .text_opt("user", self.user.as_deref())
    }
}

/// Result of every image endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesResult {
    /// Creation time in unix seconds.
    #[serde(default)]
    pub created: u64,

    /// The images.
    pub data: Vec<ImageData>,
}

/// One generated image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    /// Temporary URL, for the `url` format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Base64 content, for the `b64_json` format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,

    /// The prompt after the server rewrote it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}
