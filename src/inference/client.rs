use super::types::*;
use crate::{Error, Result, config::InferenceConfig};
use async_trait::async_trait;
use reqwest::{Response, header};
use std::time::Duration;
use tracing::{debug, warn};

#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String>;

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage>;
}

pub struct HuggingFaceClient {
    http: reqwest::Client,
    config: InferenceConfig,
    api_key: Option<String>,
}

impl HuggingFaceClient {
    pub fn new(config: InferenceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            warn!(
                "No inference API key configured (set inference.api_key or {})",
                config.api_key_env
            );
        }

        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            model.trim_start_matches('/')
        )
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            Error::config(format!(
                "Inference API key is not configured (set inference.api_key or {})",
                self.config.api_key_env
            ))
        })
    }

    async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        model: &str,
        payload: &T,
    ) -> Result<Response> {
        let api_key = self.api_key()?;
        let url = self.model_url(model);
        debug!("Posting inference request to {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }
        Ok(response)
    }
}

/// Turns a failed upstream response into `Error::Upstream`, preferring the
/// `error` field of a JSON body over the raw text.
async fn upstream_error(response: Response) -> Error {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return Error::upstream(status, format!("unreadable response body: {}", e)),
    };
    let message = serde_json::from_str::<UpstreamErrorBody>(&body)
        .map(|parsed| parsed.error)
        .unwrap_or(body);
    Error::upstream(status, message)
}

fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase())
}

#[async_trait]
impl InferenceClient for HuggingFaceClient {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let payload = TextGenerationPayload {
            inputs: prompt,
            parameters: &self.config.text_parameters,
        };
        let response = self.post_json(&self.config.text_model, &payload).await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        let parsed: TextGenerationResponse = serde_json::from_slice(&body)?;
        let text = parsed.into_text(status)?;

        debug!("Received {} bytes of generated text", text.len());
        Ok(text)
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage> {
        let payload = ImageGenerationPayload { inputs: prompt };
        let response = self.post_json(&self.config.image_model, &payload).await?;

        let content_type = content_type(&response);
        if content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"))
        {
            return Err(upstream_error(response).await);
        }

        let content_type = content_type
            .filter(|ct| ct.starts_with("image/"))
            .unwrap_or_else(|| DEFAULT_IMAGE_CONTENT_TYPE.to_string());
        let data = response.bytes().await?;

        debug!("Received {} byte image ({})", data.len(), content_type);
        Ok(GeneratedImage::new(content_type, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_config() -> InferenceConfig {
        InferenceConfig {
            base_url: "https://api-inference.huggingface.co/models/".to_string(),
            api_key: Some("test-api-key".to_string()),
            ..InferenceConfig::default()
        }
    }

    #[test]
    fn test_model_url_joins_cleanly() {
        let client = HuggingFaceClient::new(create_test_config()).unwrap();
        assert_eq!(
            client.model_url("google/gemma-7b"),
            "https://api-inference.huggingface.co/models/google/gemma-7b"
        );
        assert_eq!(
            client.model_url("/google/gemma-7b"),
            "https://api-inference.huggingface.co/models/google/gemma-7b"
        );
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = InferenceConfig {
            api_key: Some("   ".to_string()),
            api_key_env: "GENPROXY_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..InferenceConfig::default()
        };
        let client = HuggingFaceClient::new(config).unwrap();
        assert!(matches!(client.api_key(), Err(Error::Config(_))));
    }
}
