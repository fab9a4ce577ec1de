use super::mocks::MockInferenceClient;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use genproxy::{
    config::{CleanupConfig, InferenceConfig},
    generation::{GenerationMode, Generator},
    server::{self, AppState},
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::fs;

/// Inference settings pointing at `base_url` with a fixed test key
pub fn create_test_inference_config(base_url: &str) -> InferenceConfig {
    InferenceConfig {
        base_url: base_url.to_string(),
        api_key: Some("test-api-key".to_string()),
        timeout_secs: 5,
        ..InferenceConfig::default()
    }
}

/// Inference settings with no key anywhere
pub fn create_keyless_inference_config(base_url: &str) -> InferenceConfig {
    InferenceConfig {
        base_url: base_url.to_string(),
        api_key: None,
        api_key_env: "GENPROXY_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
        timeout_secs: 5,
        ..InferenceConfig::default()
    }
}

/// Router backed by a mock client
pub fn create_test_app(client: MockInferenceClient, mode_fallback: Option<GenerationMode>) -> Router {
    let generator = Generator::with_client(Box::new(client), &CleanupConfig::default()).unwrap();
    create_test_app_with_generator(generator, mode_fallback)
}

pub fn create_test_app_with_generator(
    generator: Generator,
    mode_fallback: Option<GenerationMode>,
) -> Router {
    server::router(AppState {
        generator: Arc::new(generator),
        mode_fallback,
    })
}

/// JSON POST to the generation endpoint
pub fn generate_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn read_body(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = read_body(response).await;
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Write `content` to a config.yaml inside a fresh temp dir
pub async fn create_test_config_file(content: &str) -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content).await.unwrap();
    (dir, config_path.to_string_lossy().to_string())
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 3000
  mode_fallback: image
  logs:
    level: "debug"

inference:
  base_url: "http://localhost:4000/models"
  api_key: "hf_test_key"
  text_model: "mistralai/Mistral-7B-Instruct-v0.2"
  image_model: "runwayml/stable-diffusion-v1-5"
  timeout_secs: 30
  text_parameters:
    max_new_tokens: 120
    temperature: 0.5

cleanup:
  rules: [strip_tags, collapse_whitespace, fix_truncation]
  echo_prefix_words: 6
  meta_phrases: ["in summary"]
  fallback_text: "Nothing to say."
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  port: "not-a-number"
cleanup:
  rules: [strip_everything]
"#;
