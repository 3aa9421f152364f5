use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{CompletionClient, CompletionError, ImagePayload};
use crate::config::GeminiConfig;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    Inline { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Generative Language API client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    text_model: String,
    vision_model: String,
}

impl GeminiClient {
    pub fn new(cfg: &GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: cfg.api_key.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            text_model: cfg.text_model.clone(),
            vision_model: cfg.vision_model.clone(),
        }
    }

    fn url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    #[instrument(skip(self, parts))]
    async fn generate(&self, model: &str, parts: Vec<Part<'_>>) -> Result<String, CompletionError> {
        let body = GenerateRequest {
            contents: vec![Content { parts }],
        };

        let response = self
            .client
            .post(self.url(model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.without_url())?;
        let status = response.status();
        let text = response.text().await.map_err(|e| e.without_url())?;

        if !status.is_success() {
            let message = serde_json::from_str::<GenerateResponse>(&text)
                .ok()
                .and_then(|r| r.error)
                .map_or(text, |e| e.message);
            error!(status = %status, %message, "completion service error");
            return Err(CompletionError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)?;
        let out = extract_text(parsed)?;
        debug!(len = out.len(), "completion received");
        Ok(out)
    }
}

fn extract_text(response: GenerateResponse) -> Result<String, CompletionError> {
    if let Some(err) = response.error {
        return Err(CompletionError::Status {
            status: 200,
            message: err.message,
        });
    }
    let text: String = response
        .candidates
        .into_iter()
        .flatten()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(CompletionError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete_text(&self, prompt: &str) -> Result<String, CompletionError> {
        self.generate(&self.text_model, vec![Part::Text { text: prompt }])
            .await
    }

    async fn complete_vision(
        &self,
        prompt: &str,
        image: &ImagePayload,
    ) -> Result<String, CompletionError> {
        let parts = vec![
            Part::Text { text: prompt },
            Part::Inline {
                inline_data: InlineData {
                    mime_type: image.mime_type.clone(),
                    data: STANDARD.encode(&image.data),
                },
            },
        ];
        self.generate(&self.vision_model, parts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vision_request_serializes_inline_data() {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: "look" },
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type: "image/png".into(),
                            data: STANDARD.encode(b"abc"),
                        },
                    },
                ],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "look");
        assert_eq!(
            json["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/png"
        );
        assert_eq!(json["contents"][0]["parts"][1]["inline_data"]["data"], "YWJj");
    }

    #[test]
    fn extract_text_joins_parts_of_first_candidate() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_text(parsed).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn extract_text_rejects_empty_candidates() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(
            extract_text(parsed),
            Err(CompletionError::EmptyResponse)
        ));
    }

    #[test]
    fn extract_text_surfaces_api_error() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"error":{"message":"quota exceeded"}}"#).unwrap();
        match extract_text(parsed) {
            Err(CompletionError::Status { message, .. }) => assert_eq!(message, "quota exceeded"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    fn client(base_url: &str, api_key: &str) -> GeminiClient {
        GeminiClient::new(&GeminiConfig {
            api_key: api_key.into(),
            base_url: base_url.into(),
            text_model: "t".into(),
            vision_model: "v".into(),
            timeout_secs: 5,
        })
    }

    #[test]
    fn url_names_model_without_key() {
        let client = client("https://example.test/v1beta/", "k-secret");
        let url = client.url("t");
        assert_eq!(url, "https://example.test/v1beta/models/t:generateContent");
        assert!(!url.contains("k-secret"));
    }

    #[tokio::test]
    async fn transport_error_does_not_leak_api_key() {
        // Nothing listens on port 1.
        let client = client("http://127.0.0.1:1/v1beta", "super-secret-key");
        let err = client.complete_text("hi").await.unwrap_err();
        assert!(matches!(err, CompletionError::Http(_)), "{err:?}");
        assert!(!err.to_string().contains("super-secret-key"), "{err}");
        assert!(!format!("{err:?}").contains("super-secret-key"), "{err:?}");
    }
}
