use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
    pub timeout_secs: u64,
}

impl GeminiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub gemini: GeminiConfig,
    pub storage: StorageConfig,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "nutritrack".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "nutritrack-users".into()),
            ttl_minutes: parsed_or("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: parsed_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let gemini = GeminiConfig {
            api_key: std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY")?,
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta".into()
            }),
            text_model: std::env::var("GEMINI_TEXT_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".into()),
            vision_model: std::env::var("GEMINI_VISION_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".into()),
            timeout_secs: parsed_or("COMPLETION_TIMEOUT_SECS", 30),
        };
        let storage = StorageConfig {
            endpoint: std::env::var("MINIO_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000".into()),
            bucket: std::env::var("MINIO_BUCKET").unwrap_or_else(|_| "nutritrack".into()),
            access_key: std::env::var("MINIO_ACCESS_KEY").unwrap_or_default(),
            secret_key: std::env::var("MINIO_SECRET_KEY").unwrap_or_default(),
        };
        Ok(Self {
            database_url,
            jwt,
            gemini,
            storage,
            max_upload_bytes: parsed_or("MAX_UPLOAD_BYTES", 20 * 1024 * 1024),
        })
    }
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
