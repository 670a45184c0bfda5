#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the SceneBay server.
//!
//! These types are serialized to JSON for the REST API. They wrap the view
//! models so the API contract can evolve independently of the session
//! internals.

use scenebay_scout_models::{DistanceUnit, SearchParams};
use scenebay_session::{SearchSession, SearchStatus, ViewMode};
use scenebay_theme::Theme;
use scenebay_view::{
    DetailsView, MapLayers, ResultsView, details_view, map_layers, results_view,
};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable error message.
    pub error: String,
}

impl ApiError {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// A selectable radius unit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUnitOption {
    /// Form value (`km` or `miles`).
    pub value: DistanceUnit,
    /// Display label.
    pub label: &'static str,
}

/// Initial values for the search form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFormDefaults {
    /// Prefilled search parameters.
    pub params: SearchParams,
    /// Radius unit choices, in display order.
    pub units: Vec<ApiUnitOption>,
}

impl Default for ApiFormDefaults {
    fn default() -> Self {
        Self {
            params: SearchParams::default(),
            units: [DistanceUnit::Km, DistanceUnit::Miles]
                .into_iter()
                .map(|unit| ApiUnitOption {
                    value: unit,
                    label: unit.label(),
                })
                .collect(),
        }
    }
}

/// Current theme.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTheme {
    pub theme: Theme,
}

/// Everything the frontend needs to redraw after a state change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSessionSnapshot {
    pub status: SearchStatus,
    pub view_mode: ViewMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<SearchParams>,
    pub results: ResultsView,
    /// Present while an area is selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<DetailsView>,
    pub map: MapLayers,
    pub theme: Theme,
}

impl ApiSessionSnapshot {
    /// Captures `session` as seen under `theme`.
    #[must_use]
    pub fn new(session: &SearchSession, theme: Theme) -> Self {
        Self {
            status: session.status(),
            view_mode: session.view_mode(),
            params: session.params().cloned(),
            results: results_view(session),
            details: session
                .selected()
                .map(|area| details_view(area, session.catering_shown())),
            map: map_layers(session, theme),
            theme,
        }
    }
}
