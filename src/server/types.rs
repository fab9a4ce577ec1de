use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct GenerateRequestBody {
    pub prompt: String,
    /// Left untyped so a non-string mode reaches mode resolution instead of
    /// failing extraction.
    #[serde(default)]
    pub mode: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextResponse {
    pub generated_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
