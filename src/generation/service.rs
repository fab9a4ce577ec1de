use super::types::{GenerationMode, GenerationOutput, GenerationRequest};
use crate::{
    Result,
    config::{CleanupConfig, InferenceConfig},
    inference::{HuggingFaceClient, InferenceClient},
    normalizer::TextNormalizer,
};
use tracing::{debug, info};

/// Dispatches a request to the inference backend and cleans up text output.
pub struct Generator {
    client: Box<dyn InferenceClient>,
    normalizer: TextNormalizer,
    fallback_text: String,
}

impl Generator {
    pub fn new(inference: InferenceConfig, cleanup: &CleanupConfig) -> Result<Self> {
        info!(
            "Initializing generator (text model: {}, image model: {})",
            inference.text_model, inference.image_model
        );
        let client = Box::new(HuggingFaceClient::new(inference)?);
        Self::with_client(client, cleanup)
    }

    pub fn with_client(client: Box<dyn InferenceClient>, cleanup: &CleanupConfig) -> Result<Self> {
        Ok(Self {
            client,
            normalizer: TextNormalizer::new(cleanup)?,
            fallback_text: cleanup.fallback_text.clone(),
        })
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutput> {
        match request.mode {
            GenerationMode::Text => {
                let raw = self.client.generate_text(&request.prompt).await?;
                let cleaned = self.normalizer.normalize(&raw, &request.prompt);
                debug!(
                    "Normalized generated text from {} to {} bytes",
                    raw.len(),
                    cleaned.len()
                );

                if cleaned.is_empty() {
                    info!("Generated text was empty after cleanup, using fallback");
                    return Ok(GenerationOutput::Text(self.fallback_text.clone()));
                }
                Ok(GenerationOutput::Text(cleaned))
            }
            GenerationMode::Image => {
                let image = self.client.generate_image(&request.prompt).await?;
                Ok(GenerationOutput::Image(image))
            }
        }
    }
}
