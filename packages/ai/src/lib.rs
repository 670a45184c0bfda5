#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Location-scouting query builder and LLM provider abstraction.
//!
//! Turns [`SearchParams`] into a natural-language prompt plus a fixed
//! structured-output schema, submits both to a generative model, and
//! parses the returned JSON array into [`Area`] records with freshly
//! generated identifiers.
//!
//! Supports Google Gemini (the default), `OpenAI` and any
//! OpenAI-compatible server (via `AI_BASE_URL`), and Anthropic Claude.
//! Every failure on the way (transport, provider error, empty or
//! malformed output) reaches the caller as a single [`SearchFailed`].

pub mod prompt;
pub mod providers;
pub mod schema;
pub mod scout;

use scenebay_scout_models::{Area, InvalidArea, SearchParams};
use thiserror::Error;

pub use scout::Scout;

/// Errors that can occur while talking to a model or reading its output.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request to the LLM provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },

    /// The model returned no text.
    #[error("Model returned an empty response")]
    EmptyResponse,

    /// The output parsed but holds values the schema cannot rule out.
    #[error("Invalid area in response: {0}")]
    InvalidArea(#[from] InvalidArea),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },

    /// The caller went away before the model answered.
    #[error("Search was cancelled")]
    Cancelled,
}

/// A search could not produce results.
///
/// This is the only failure callers of [`AreaFinder::find_areas`] see. The
/// underlying [`AiError`] is available through
/// [`std::error::Error::source`] for logging.
#[derive(Debug, Error)]
#[error("Failed to generate areas from AI service")]
pub struct SearchFailed {
    #[source]
    source: AiError,
}

impl SearchFailed {
    /// The underlying cause.
    #[must_use]
    pub const fn cause(&self) -> &AiError {
        &self.source
    }
}

impl From<AiError> for SearchFailed {
    fn from(source: AiError) -> Self {
        Self { source }
    }
}

/// Something that can answer a location search.
#[async_trait::async_trait]
pub trait AreaFinder: Send + Sync {
    /// Finds candidate areas for `params`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchFailed`] if no result list could be produced.
    async fn find_areas(&self, params: &SearchParams) -> Result<Vec<Area>, SearchFailed>;
}
