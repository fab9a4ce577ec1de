use crate::{Error, inference::GeneratedImage};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Text,
    Image,
}

impl FromStr for GenerationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            other => Err(Error::invalid_request(format!(
                "Unknown mode '{}', expected 'text' or 'image'",
                other
            ))),
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Image => write!(f, "image"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub mode: GenerationMode,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, mode: GenerationMode) -> Self {
        Self {
            prompt: prompt.into(),
            mode,
        }
    }

    pub fn text(prompt: impl Into<String>) -> Self {
        Self::new(prompt, GenerationMode::Text)
    }

    pub fn image(prompt: impl Into<String>) -> Self {
        Self::new(prompt, GenerationMode::Image)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutput {
    Text(String),
    Image(GeneratedImage),
}
