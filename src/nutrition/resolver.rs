//! Sequences completion calls, parsing, classification and random estimation
//! into one decision for a single food input.
//!
//! Text input gets one completion; an unusable answer is replaced by a
//! generated estimate straight away. Image input gets a vision completion and,
//! if that is unusable, one text completion for a name derived from the file
//! name; if that is unusable too the estimate is generated from that name.
//! Completion failures are terminal and never retried.

use std::time::Duration;

use bytes::Bytes;
use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info, instrument};

use super::{
    generator,
    parser::{self, DEFAULT_FOOD_NAME},
    record::{NutritionRecord, ResolutionSource},
    validity::is_unusable,
};
use crate::ai::{prompts, with_timeout, CompletionClient, CompletionError, ImagePayload};

#[derive(Debug, Clone)]
pub enum FoodInput {
    Text(String),
    Image {
        data: Bytes,
        mime_type: String,
        file_name: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub record: NutritionRecord,
    pub source: ResolutionSource,
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    CompletionRequested,
    Parsed,
    NeedsFallback,
    FallbackRequested,
    FallbackParsed,
    Resolved,
}

lazy_static! {
    static ref EXTENSION_RE: Regex = Regex::new(r"\.[^/.]+$").unwrap();
    static ref SEPARATOR_RE: Regex = Regex::new(r"[-_]").unwrap();
}

/// Human-readable food name from an upload's file name:
/// `grilled_chicken-salad.jpg` becomes `grilled chicken salad`.
pub fn food_name_from_file_name(file_name: &str) -> String {
    let stem = EXTENSION_RE.replace(file_name, "");
    let name = SEPARATOR_RE.replace_all(&stem, " ").trim().to_string();
    if name.is_empty() {
        DEFAULT_FOOD_NAME.to_string()
    } else {
        name
    }
}

/// Name for a generated estimate; a parsed "unknown" name is not worth keeping.
fn estimate_name<'a>(parsed: &'a NutritionRecord, fallback: &'a str) -> &'a str {
    let name = parsed.food_name.trim();
    if name.is_empty() || name.to_lowercase().contains("unknown") {
        fallback
    } else {
        name
    }
}

pub struct Resolver<'a> {
    client: &'a dyn CompletionClient,
    timeout: Duration,
}

impl<'a> Resolver<'a> {
    pub fn new(client: &'a dyn CompletionClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    async fn text_completion(&self, food_name: &str) -> Result<String, CompletionError> {
        let prompt = prompts::nutrition_for_food(food_name);
        with_timeout(self.timeout, self.client.complete_text(&prompt)).await
    }

    #[instrument(skip_all)]
    pub async fn resolve<R>(&self, input: &FoodInput, rng: &mut R) -> Result<Resolution, ResolveError>
    where
        R: Rng + Send + ?Sized,
    {
        let resolution = match input {
            FoodInput::Text(food_name) => self.resolve_text(food_name, rng).await?,
            FoodInput::Image {
                data,
                mime_type,
                file_name,
            } => {
                let image = ImagePayload {
                    data: data.clone(),
                    mime_type: mime_type.clone(),
                };
                self.resolve_image(&image, file_name, rng).await?
            }
        };
        debug!(stage = ?Stage::Resolved, "resolution finished");
        info!(
            food = %resolution.record.food_name,
            calories = resolution.record.calories,
            source = %resolution.source,
            "food resolved"
        );
        Ok(resolution)
    }

    async fn resolve_text<R>(&self, food_name: &str, rng: &mut R) -> Result<Resolution, ResolveError>
    where
        R: Rng + Send + ?Sized,
    {
        debug!(stage = ?Stage::CompletionRequested, input = "text");
        let raw = self.text_completion(food_name).await?;
        let parsed = parser::parse_response(&raw, food_name);
        debug!(stage = ?Stage::Parsed, unusable = is_unusable(&parsed));

        if !is_unusable(&parsed) {
            return Ok(Resolution {
                record: parsed,
                source: ResolutionSource::Predicted,
            });
        }
        debug!(stage = ?Stage::NeedsFallback, "generating estimate");
        Ok(Resolution {
            record: generator::generate(estimate_name(&parsed, food_name), rng),
            source: ResolutionSource::Generated,
        })
    }

    async fn resolve_image<R>(
        &self,
        image: &ImagePayload,
        file_name: &str,
        rng: &mut R,
    ) -> Result<Resolution, ResolveError>
    where
        R: Rng + Send + ?Sized,
    {
        let derived = food_name_from_file_name(file_name);

        debug!(stage = ?Stage::CompletionRequested, input = "image", %derived);
        let raw = with_timeout(
            self.timeout,
            self.client
                .complete_vision(prompts::nutrition_for_image(), image),
        )
        .await?;
        let parsed = parser::parse_response(&raw, &derived);
        debug!(stage = ?Stage::Parsed, unusable = is_unusable(&parsed));
        if !is_unusable(&parsed) {
            return Ok(Resolution {
                record: parsed,
                source: ResolutionSource::Predicted,
            });
        }

        debug!(stage = ?Stage::FallbackRequested, %derived);
        let raw = self.text_completion(&derived).await?;
        let parsed = parser::parse_response(&raw, &derived);
        debug!(stage = ?Stage::FallbackParsed, unusable = is_unusable(&parsed));
        if !is_unusable(&parsed) {
            return Ok(Resolution {
                record: parsed,
                source: ResolutionSource::FilenameFallback,
            });
        }

        debug!(stage = ?Stage::NeedsFallback, "generating estimate");
        Ok(Resolution {
            record: generator::generate(&derived, rng),
            source: ResolutionSource::Generated,
        })
    }
}
