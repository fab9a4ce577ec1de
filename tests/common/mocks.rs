use async_trait::async_trait;
use genproxy::{
    Error, Result,
    generation::GenerationMode,
    inference::{GeneratedImage, InferenceClient},
};
use std::sync::{Arc, Mutex};

/// How a mock call should fail
#[derive(Debug, Clone)]
pub enum MockFailure {
    Upstream { status: u16, message: String },
    MissingApiKey,
}

/// Mock inference client that records every prompt it receives
#[derive(Debug, Clone)]
pub struct MockInferenceClient {
    pub text: String,
    pub image: GeneratedImage,
    pub failure: Option<MockFailure>,
    pub calls: Arc<Mutex<Vec<(GenerationMode, String)>>>,
}

impl MockInferenceClient {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            image: GeneratedImage::new("image/png", sample_png()),
            failure: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_image(mut self, image: GeneratedImage) -> Self {
        self.image = image;
        self
    }

    pub fn with_failure(mut self, failure: MockFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn get_calls(&self) -> Vec<(GenerationMode, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, mode: GenerationMode, prompt: &str) -> Result<()> {
        self.calls.lock().unwrap().push((mode, prompt.to_string()));
        match &self.failure {
            Some(MockFailure::Upstream { status, message }) => {
                Err(Error::upstream(*status, message.clone()))
            }
            Some(MockFailure::MissingApiKey) => Err(Error::config(
                "Inference API key is not configured (set inference.api_key or HUGGINGFACE_API_KEY)",
            )),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.record(GenerationMode::Text, prompt)?;
        Ok(self.text.clone())
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage> {
        self.record(GenerationMode::Image, prompt)?;
        Ok(self.image.clone())
    }
}

/// First bytes of a PNG file, enough to tell payloads apart
pub fn sample_png() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]
}
