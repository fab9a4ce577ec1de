use crate::{Error, Result, config::TextParameters};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/png";

#[derive(Debug, Clone, Serialize)]
pub struct TextGenerationPayload<'a> {
    pub inputs: &'a str,
    pub parameters: &'a TextParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationPayload<'a> {
    pub inputs: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedText {
    pub generated_text: String,
}

/// Text endpoints answer with a batch (`[{ generated_text }]`), though some
/// models return the bare object. An `{ error }` object can arrive with a
/// success status.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextGenerationResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
    Failure(UpstreamErrorBody),
}

impl TextGenerationResponse {
    pub fn into_text(self, status: u16) -> Result<String> {
        match self {
            Self::Batch(items) => Ok(items
                .into_iter()
                .next()
                .map(|item| item.generated_text)
                .unwrap_or_default()),
            Self::Single(item) => Ok(item.generated_text),
            Self::Failure(body) => Err(Error::upstream(status, body.error)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub content_type: String,
    pub data: Bytes,
}

impl GeneratedImage {
    pub fn new(content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}
