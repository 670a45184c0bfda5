//! Location search against a generative model.

use scenebay_scout_models::{Area, AreaDraft, SearchParams};

use crate::providers::{GenerationRequest, LlmProvider};
use crate::{AiError, AreaFinder, SearchFailed, prompt, schema};

/// Default sampling temperature for searches.
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Parses the model's raw output into validated drafts.
///
/// # Errors
///
/// Returns [`AiError::EmptyResponse`] for blank output, [`AiError::Json`]
/// if the text is not a JSON array of areas, and [`AiError::InvalidArea`]
/// if an area carries out-of-range values.
pub fn parse_areas(text: &str) -> Result<Vec<AreaDraft>, AiError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AiError::EmptyResponse);
    }

    let drafts: Vec<AreaDraft> = serde_json::from_str(text)?;

    drafts
        .into_iter()
        .map(|draft| draft.normalized().map_err(AiError::from))
        .collect()
}

/// Answers location searches by prompting an [`LlmProvider`].
pub struct Scout {
    provider: Box<dyn LlmProvider>,
    temperature: f32,
}

impl Scout {
    /// Creates a scout over `provider` with the default temperature.
    #[must_use]
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self {
            provider,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Overrides the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Builds the request for `params`.
    #[must_use]
    pub fn request_for(&self, params: &SearchParams) -> GenerationRequest {
        GenerationRequest {
            prompt: prompt::build_prompt(params),
            schema: schema::response_schema(),
            temperature: self.temperature,
        }
    }

    async fn try_find(&self, params: &SearchParams) -> Result<Vec<Area>, AiError> {
        let request = self.request_for(params);
        log::info!(
            "Searching {} {} around {:?} via {}",
            params.radius,
            params.unit,
            params.location,
            self.provider.name()
        );

        let text = self.provider.generate(&request).await?;
        let drafts = parse_areas(&text)?;
        log::info!("Model returned {} area(s)", drafts.len());

        Ok(drafts
            .into_iter()
            .map(|draft| draft.into_area(uuid::Uuid::new_v4().to_string()))
            .collect())
    }
}

#[async_trait::async_trait]
impl AreaFinder for Scout {
    async fn find_areas(&self, params: &SearchParams) -> Result<Vec<Area>, SearchFailed> {
        self.try_find(params).await.map_err(|e| {
            log::error!("Error calling {} API: {e}", self.provider.name());
            SearchFailed::from(e)
        })
    }
}
