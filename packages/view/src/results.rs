//! Results list panel.

use scenebay_scout_models::{Area, FeatureAnalysis};
use scenebay_session::SearchSession;
use serde::Serialize;

/// Number of placeholder rows shown while a search is in flight.
pub const SKELETON_ROWS: usize = 3;

/// Heading of the empty state.
pub const EMPTY_TITLE: &str = "No locations found";

/// Hint under the empty state heading.
pub const EMPTY_HINT: &str = "Try adjusting your search criteria or starting a new analysis.";

/// Shown in place of the checklist when no features were requested.
pub const NO_FEATURES_PLACEHOLDER: &str =
    "No specific features requested. Click to see details.";

/// What the results panel shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ResultsView {
    /// A search is in flight.
    #[serde(rename_all = "camelCase")]
    Loading { skeleton_rows: usize },
    /// The last search failed.
    Error { message: String },
    /// Nothing to show yet, or the search returned no areas.
    Empty {
        title: &'static str,
        hint: &'static str,
    },
    /// One row per returned area, in model order.
    List { rows: Vec<ResultRow> },
}

/// A single selectable row in the results list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    pub id: String,
    pub name: String,
    pub selected: bool,
    pub features: Vec<FeatureAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
}

impl ResultRow {
    fn new(area: &Area, selected_id: Option<&str>) -> Self {
        let placeholder = area
            .feature_analysis
            .is_empty()
            .then_some(NO_FEATURES_PLACEHOLDER);

        Self {
            id: area.id.clone(),
            name: area.name.clone(),
            selected: selected_id == Some(area.id.as_str()),
            features: area.feature_analysis.clone(),
            placeholder,
        }
    }
}

/// Builds the results panel for the current session state.
///
/// Loading wins over an error, and an error wins over the result list.
#[must_use]
pub fn results_view(session: &SearchSession) -> ResultsView {
    if session.is_loading() {
        return ResultsView::Loading {
            skeleton_rows: SKELETON_ROWS,
        };
    }

    if let Some(message) = session.error() {
        return ResultsView::Error {
            message: message.to_string(),
        };
    }

    if session.areas().is_empty() {
        return ResultsView::Empty {
            title: EMPTY_TITLE,
            hint: EMPTY_HINT,
        };
    }

    let selected_id = session.selected_id();
    ResultsView::List {
        rows: session
            .areas()
            .iter()
            .map(|area| ResultRow::new(area, selected_id))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use scenebay_ai::AiError;
    use scenebay_session::{SEARCH_ERROR_MESSAGE, SearchSession};

    use super::*;
    use crate::test_support::{area, params, session_with};

    #[test]
    fn idle_session_shows_empty_state() {
        assert_eq!(
            results_view(&SearchSession::new()),
            ResultsView::Empty {
                title: EMPTY_TITLE,
                hint: EMPTY_HINT,
            }
        );
    }

    #[test]
    fn loading_shows_three_skeleton_rows() {
        let mut session = SearchSession::new();
        session.begin_search(params()).unwrap();
        assert_eq!(
            results_view(&session),
            ResultsView::Loading { skeleton_rows: 3 }
        );
    }

    #[test]
    fn failure_shows_fixed_message() {
        let mut session = SearchSession::new();
        let ticket = session.begin_search(params()).unwrap();
        session
            .complete_search(ticket, Err(AiError::EmptyResponse.into()))
            .unwrap();

        assert_eq!(
            results_view(&session),
            ResultsView::Error {
                message: SEARCH_ERROR_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn rows_follow_model_order_and_mark_selection() {
        let mut session = session_with(vec![area("a", 48.0, 2.0), area("b", 49.0, 3.0)]);
        session.select_area("b").unwrap();

        let ResultsView::List { rows } = results_view(&session) else {
            panic!("expected a list");
        };
        assert_eq!(
            rows.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            ["a", "b"]
        );
        assert!(!rows[0].selected);
        assert!(rows[1].selected);
        assert_eq!(rows[0].features.len(), 2);
        assert!(rows[0].placeholder.is_none());
    }

    #[test]
    fn rows_without_features_use_placeholder() {
        let mut bare = area("a", 48.0, 2.0);
        bare.feature_analysis.clear();
        let session = session_with(vec![bare]);

        let ResultsView::List { rows } = results_view(&session) else {
            panic!("expected a list");
        };
        assert_eq!(rows[0].placeholder, Some(NO_FEATURES_PLACEHOLDER));
    }

    #[test]
    fn serializes_with_state_tag() {
        let json = serde_json::to_value(ResultsView::Loading { skeleton_rows: 3 }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "state": "loading", "skeletonRows": 3 })
        );
    }
}
