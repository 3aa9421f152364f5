//! Generative text/vision completion service.
//!
//! The service is a black box: a prompt (optionally with one inline image)
//! goes in, free-form text comes out. Nothing about the shape of that text is
//! guaranteed; callers parse it defensively.

pub mod gemini;
pub mod prompts;

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use gemini::GeminiClient;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("completion service returned no text")]
    EmptyResponse,

    #[error("completion timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to decode completion response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// An image sent inline with a vision prompt.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub data: Bytes,
    pub mime_type: String,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete_text(&self, prompt: &str) -> Result<String, CompletionError>;

    async fn complete_vision(
        &self,
        prompt: &str,
        image: &ImagePayload,
    ) -> Result<String, CompletionError>;
}

/// Bounds a completion call; an elapsed deadline is a terminal failure.
pub async fn with_timeout<F>(limit: Duration, call: F) -> Result<String, CompletionError>
where
    F: Future<Output = Result<String, CompletionError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(res) => res,
        Err(_) => Err(CompletionError::Timeout(limit)),
    }
}
