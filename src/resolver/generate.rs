/// Remote image generation client
///
/// Speaks the prediction API's wire format: a prompt plus a sample count in,
/// a list of base64-encoded images out. One call here is exactly one attempt;
/// the resolver owns the retry loop.
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default generation endpoint (overridable via BREEZEWAY_API_URL)
pub const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/imagen-3.0-generate-002:predict";

/// Why one generation attempt failed. All variants are retryable.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP error! status: {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid response structure from image API")]
    Malformed,
    #[error("prediction payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    instances: Instances,
    parameters: Parameters,
}

#[derive(Debug, Serialize)]
struct Instances {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters {
    sample_count: u32,
}

impl GenerateRequest {
    /// Request exactly one sample for the given prompt
    fn new(prompt: &str) -> Self {
        GenerateRequest {
            instances: Instances {
                prompt: prompt.to_string(),
            },
            parameters: Parameters { sample_count: 1 },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
}

impl GenerateResponse {
    /// Decoded bytes of the first prediction, or Malformed if the expected
    /// structure is missing
    fn into_image_bytes(self) -> Result<Vec<u8>, GenerateError> {
        let encoded = self
            .predictions
            .into_iter()
            .next()
            .and_then(|p| p.bytes_base64_encoded)
            .ok_or(GenerateError::Malformed)?;

        Ok(BASE64.decode(encoded)?)
    }
}

/// Capability: one generation attempt, returning decoded image bytes
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, GenerateError>;
}

/// Endpoint plus the explicitly optional API key.
///
/// A missing key is a supported degraded configuration: the request is still
/// sent, and the remote service's rejection flows through the normal
/// retry/error path.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl GeneratorConfig {
    /// Read the endpoint and key from the environment
    pub fn from_env() -> Self {
        GeneratorConfig {
            endpoint: std::env::var("BREEZEWAY_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_key: std::env::var("BREEZEWAY_API_KEY").ok(),
        }
    }

    /// Full request URL, with the key appended only when configured
    fn url(&self) -> String {
        match &self.api_key {
            Some(key) => format!("{}?key={}", self.endpoint, key),
            None => self.endpoint.clone(),
        }
    }
}

/// Generator backed by the HTTP prediction endpoint
pub struct HttpGenerator {
    client: reqwest::Client,
    config: GeneratorConfig,
}

impl HttpGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        HttpGenerator {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ImageGenerator for HttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, GenerateError> {
        let response = self
            .client
            .post(self.config.url())
            .json(&GenerateRequest::new(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerateError::Status(response.status()));
        }

        // A 2xx body that isn't the expected JSON counts as malformed
        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|_| GenerateError::Malformed)?;

        parsed.into_image_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let request = GenerateRequest::new("a tasty bowl");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "instances": { "prompt": "a tasty bowl" },
                "parameters": { "sampleCount": 1 }
            })
        );
    }

    #[test]
    fn test_response_first_prediction_is_decoded() {
        let body = json!({
            "predictions": [
                { "bytesBase64Encoded": BASE64.encode([0xFF, 0xD8, 0xFF]) },
                { "bytesBase64Encoded": BASE64.encode([1, 2, 3]) }
            ]
        });

        let parsed: GenerateResponse = serde_json::from_value(body).unwrap();
        let bytes = parsed.into_image_bytes().unwrap();
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_empty_predictions_is_malformed() {
        let parsed: GenerateResponse =
            serde_json::from_value(json!({ "predictions": [] })).unwrap();
        assert!(matches!(
            parsed.into_image_bytes(),
            Err(GenerateError::Malformed)
        ));
    }

    #[test]
    fn test_missing_predictions_field_is_malformed() {
        let parsed: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            parsed.into_image_bytes(),
            Err(GenerateError::Malformed)
        ));
    }

    #[test]
    fn test_prediction_without_payload_is_malformed() {
        let parsed: GenerateResponse =
            serde_json::from_value(json!({ "predictions": [{}] })).unwrap();
        assert!(matches!(
            parsed.into_image_bytes(),
            Err(GenerateError::Malformed)
        ));
    }

    #[test]
    fn test_bad_base64_is_an_error() {
        let parsed: GenerateResponse = serde_json::from_value(json!({
            "predictions": [{ "bytesBase64Encoded": "!!! not base64 !!!" }]
        }))
        .unwrap();
        assert!(matches!(
            parsed.into_image_bytes(),
            Err(GenerateError::Base64(_))
        ));
    }

    #[test]
    fn test_url_with_and_without_key() {
        let keyless = GeneratorConfig {
            endpoint: "https://example.test/predict".to_string(),
            api_key: None,
        };
        assert_eq!(keyless.url(), "https://example.test/predict");

        let keyed = GeneratorConfig {
            endpoint: "https://example.test/predict".to_string(),
            api_key: Some("s3cret".to_string()),
        };
        assert_eq!(keyed.url(), "https://example.test/predict?key=s3cret");
    }
}
