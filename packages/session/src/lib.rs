#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Search session state machine.
//!
//! A [`SearchSession`] owns everything the presentation layer shows: the
//! search status, the result list, the selected area, the error message,
//! the map camera and the derived search circle.
//!
//! ```text
//! Idle/Success/Error --begin_search--> Loading --complete_search--> Success | Error
//! ```
//!
//! Only one search may be in flight. [`SearchSession::begin_search`]
//! hands out a [`SearchTicket`] and rejects further submissions with
//! [`SessionError::Busy`] until that ticket is completed, so callers that
//! must not hold the session across an `.await` (the HTTP server) can
//! release it while the model is working.

pub mod geometry;

use scenebay_ai::{AreaFinder, SearchFailed};
use scenebay_scout_models::{
    Area, InvalidSearchParams, MapViewState, SearchCircle, SearchParams,
};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};
use thiserror::Error;

/// Message shown when a search fails, whatever the cause.
pub const SEARCH_ERROR_MESSAGE: &str =
    "Failed to fetch areas. Please check your query or API key.";

/// Where the session is in the search lifecycle.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchStatus {
    /// No search has been submitted.
    #[default]
    Idle,
    /// A search is in flight.
    Loading,
    /// The last search returned a result list (possibly empty).
    Success,
    /// The last search failed.
    Error,
}

/// Which side panel is showing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ViewMode {
    /// Search form and results list.
    #[default]
    Search,
    /// Details of the selected area.
    Details,
}

/// Proof that a search was started; required to complete it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// Errors from session transitions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The submitted parameters cannot be searched.
    #[error("Invalid search: {0}")]
    InvalidParams(#[from] InvalidSearchParams),

    /// Another search is still in flight.
    #[error("A search is already in progress")]
    Busy,

    /// The ticket does not belong to the in-flight search.
    #[error("Search ticket is not the one in flight")]
    StaleTicket,

    /// No area with this id is in the current results.
    #[error("No area with id {id}")]
    UnknownArea {
        /// The requested id.
        id: String,
    },
}

/// All presentation state for one scout.
#[derive(Debug, Clone)]
pub struct SearchSession {
    status: SearchStatus,
    view_mode: ViewMode,
    params: Option<SearchParams>,
    areas: Vec<Area>,
    selected_id: Option<String>,
    error: Option<String>,
    map_view: MapViewState,
    search_circle: Option<SearchCircle>,
    catering_shown: bool,
    in_flight: Option<SearchTicket>,
    next_ticket: u64,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    /// Creates an idle session with the default map view.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: SearchStatus::Idle,
            view_mode: ViewMode::Search,
            params: None,
            areas: Vec::new(),
            selected_id: None,
            error: None,
            map_view: MapViewState::default(),
            search_circle: None,
            catering_shown: true,
            in_flight: None,
            next_ticket: 0,
        }
    }

    /// Starts a search.
    ///
    /// Clears the previous results, error, selection and search circle and
    /// returns to the search view.
    ///
    /// # Errors
    ///
    /// * [`SessionError::InvalidParams`] if `params` fail validation.
    /// * [`SessionError::Busy`] if a search is already in flight.
    pub fn begin_search(&mut self, params: SearchParams) -> Result<SearchTicket, SessionError> {
        params.validate()?;
        if self.in_flight.is_some() {
            log::debug!("Rejecting search for {:?}: busy", params.location);
            return Err(SessionError::Busy);
        }

        let ticket = SearchTicket(self.next_ticket);
        self.next_ticket += 1;

        self.status = SearchStatus::Loading;
        self.view_mode = ViewMode::Search;
        self.areas.clear();
        self.selected_id = None;
        self.error = None;
        self.search_circle = None;
        self.params = Some(params);
        self.in_flight = Some(ticket);

        Ok(ticket)
    }

    /// Records the outcome of the search identified by `ticket`.
    ///
    /// On success with results, the search circle is centered on the
    /// centroid of the results and the map is framed on it. An empty
    /// result list leaves the circle and map untouched. A failure stores
    /// [`SEARCH_ERROR_MESSAGE`] and logs the cause.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::StaleTicket`] if `ticket` is not the search
    /// in flight.
    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<Vec<Area>, SearchFailed>,
    ) -> Result<(), SessionError> {
        if self.in_flight != Some(ticket) {
            return Err(SessionError::StaleTicket);
        }
        self.in_flight = None;

        match outcome {
            Ok(areas) => {
                if let Some(params) = &self.params
                    && let Some(circle) = geometry::search_circle(&areas, params)
                {
                    self.map_view = geometry::search_view(&circle);
                    self.search_circle = Some(circle);
                }
                log::info!("Search completed with {} area(s)", areas.len());
                self.areas = areas;
                self.status = SearchStatus::Success;
            }
            Err(e) => {
                log::error!("Search failed: {e}: {}", e.cause());
                self.areas.clear();
                self.error = Some(SEARCH_ERROR_MESSAGE.to_string());
                self.status = SearchStatus::Error;
            }
        }

        Ok(())
    }

    /// Runs a whole search against `finder`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the search cannot be started. A failed
    /// search is not an error here; it leaves the session in
    /// [`SearchStatus::Error`].
    pub async fn search(
        &mut self,
        finder: &dyn AreaFinder,
        params: SearchParams,
    ) -> Result<(), SessionError> {
        let ticket = self.begin_search(params.clone())?;
        let outcome = finder.find_areas(&params).await;
        self.complete_search(ticket, outcome)
    }

    /// Selects the area with `id`, focuses the map on it and switches to
    /// the details view. Results and search circle are left as they are.
    ///
    /// Opening the details view shows the catering section; switching areas
    /// while it is already open keeps the current toggle.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownArea`] if no current result has `id`.
    pub fn select_area(&mut self, id: &str) -> Result<&Area, SessionError> {
        let Some(index) = self.areas.iter().position(|a| a.id == id) else {
            return Err(SessionError::UnknownArea { id: id.to_string() });
        };

        if self.view_mode != ViewMode::Details {
            self.catering_shown = true;
        }

        let area = &self.areas[index];
        self.map_view = geometry::detail_view(area);
        self.selected_id = Some(area.id.clone());
        self.view_mode = ViewMode::Details;

        Ok(&self.areas[index])
    }

    /// Returns to the search view, keeping results and selection.
    pub const fn back_to_search(&mut self) {
        self.view_mode = ViewMode::Search;
    }

    /// Shows or hides the catering section of the details view.
    pub const fn toggle_catering(&mut self) -> bool {
        self.catering_shown = !self.catering_shown;
        self.catering_shown
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> SearchStatus {
        self.status
    }

    /// Whether a search is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, SearchStatus::Loading)
    }

    /// Current side panel.
    #[must_use]
    pub const fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Parameters of the most recent search.
    #[must_use]
    pub const fn params(&self) -> Option<&SearchParams> {
        self.params.as_ref()
    }

    /// Results of the most recent search.
    #[must_use]
    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// The selected area, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&Area> {
        let id = self.selected_id.as_deref()?;
        self.areas.iter().find(|a| a.id == id)
    }

    /// Id of the selected area, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Error message of the last failed search.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current map camera.
    #[must_use]
    pub const fn map_view(&self) -> MapViewState {
        self.map_view
    }

    /// Search extent of the last successful search with results.
    #[must_use]
    pub const fn search_circle(&self) -> Option<SearchCircle> {
        self.search_circle
    }

    /// Whether the catering section of the details view is shown.
    #[must_use]
    pub const fn catering_shown(&self) -> bool {
        self.catering_shown
    }
}

#[cfg(test)]
mod tests {
    use scenebay_ai::AiError;
    use scenebay_scout_models::DistanceUnit;

    use super::geometry::tests::area;
    use super::*;

    struct FixedFinder(Vec<Area>);

    #[async_trait::async_trait]
    impl AreaFinder for FixedFinder {
        async fn find_areas(&self, _params: &SearchParams) -> Result<Vec<Area>, SearchFailed> {
            Ok(self.0.clone())
        }
    }

    struct FailingFinder;

    #[async_trait::async_trait]
    impl AreaFinder for FailingFinder {
        async fn find_areas(&self, _params: &SearchParams) -> Result<Vec<Area>, SearchFailed> {
            Err(AiError::EmptyResponse.into())
        }
    }

    fn paris() -> SearchParams {
        SearchParams {
            location: "Paris, France".to_string(),
            radius: 5.0,
            unit: DistanceUnit::Km,
            desired_features: String::new(),
            crew_size: 50,
        }
    }

    #[tokio::test]
    async fn paris_search_frames_single_result() {
        let mut session = SearchSession::new();
        let finder = FixedFinder(vec![area("a", 48.86, 2.35, 800.0)]);

        session.search(&finder, paris()).await.unwrap();

        assert_eq!(session.status(), SearchStatus::Success);
        let circle = session.search_circle().unwrap();
        assert!((circle.center.0 - 48.86).abs() < 1e-9);
        assert!((circle.center.1 - 2.35).abs() < 1e-9);
        assert!((circle.radius_m - 5000.0).abs() < 1e-9);
        assert_eq!(session.map_view().zoom, 13);
        assert_eq!(session.map_view().center, circle.center);
    }

    #[tokio::test]
    async fn miles_search_converts_radius() {
        let mut session = SearchSession::new();
        let finder = FixedFinder(vec![area("a", 34.0, -118.0, 800.0)]);
        let params = SearchParams {
            radius: 3.0,
            unit: DistanceUnit::Miles,
            ..paris()
        };

        session.search(&finder, params).await.unwrap();

        let circle = session.search_circle().unwrap();
        assert!((circle.radius_m - 3.0 * 1609.34).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_results_leave_circle_unset() {
        let mut session = SearchSession::new();
        let before = session.map_view();

        session.search(&FixedFinder(Vec::new()), paris()).await.unwrap();

        assert_eq!(session.status(), SearchStatus::Success);
        assert!(session.areas().is_empty());
        assert!(session.search_circle().is_none());
        assert!(session.error().is_none());
        assert_eq!(session.map_view(), before);
    }

    #[tokio::test]
    async fn failure_sets_static_message() {
        let mut session = SearchSession::new();
        session.search(&FailingFinder, paris()).await.unwrap();

        assert_eq!(session.status(), SearchStatus::Error);
        assert_eq!(session.error(), Some(SEARCH_ERROR_MESSAGE));
        assert!(session.areas().is_empty());
        assert!(session.search_circle().is_none());
    }

    #[test]
    fn second_submission_while_loading_is_busy() {
        let mut session = SearchSession::new();
        let ticket = session.begin_search(paris()).unwrap();
        assert!(session.is_loading());

        assert!(matches!(
            session.begin_search(paris()),
            Err(SessionError::Busy)
        ));

        session.complete_search(ticket, Ok(Vec::new())).unwrap();
        assert!(session.begin_search(paris()).is_ok());
    }

    #[test]
    fn completed_ticket_cannot_complete_again() {
        let mut session = SearchSession::new();
        let ticket = session.begin_search(paris()).unwrap();
        session.complete_search(ticket, Ok(Vec::new())).unwrap();

        assert!(matches!(
            session.complete_search(ticket, Ok(Vec::new())),
            Err(SessionError::StaleTicket)
        ));
    }

    #[test]
    fn invalid_params_do_not_start_loading() {
        let mut session = SearchSession::new();
        let params = SearchParams {
            crew_size: 0,
            ..paris()
        };
        assert!(matches!(
            session.begin_search(params),
            Err(SessionError::InvalidParams(_))
        ));
        assert_eq!(session.status(), SearchStatus::Idle);
    }

    #[tokio::test]
    async fn selecting_focuses_area_without_touching_results() {
        let mut session = SearchSession::new();
        let finder = FixedFinder(vec![
            area("a", 48.0, 2.0, 100.0),
            area("b", 50.0, 4.0, 100.0),
        ]);
        session.search(&finder, paris()).await.unwrap();
        let circle = session.search_circle();
        let areas = session.areas().to_vec();

        let selected = session.select_area("b").unwrap();
        assert_eq!(selected.id, "b");

        assert_eq!(session.view_mode(), ViewMode::Details);
        assert_eq!(session.map_view().center, (50.0, 4.0));
        assert_eq!(session.map_view().zoom, 14);
        assert_eq!(session.areas(), areas.as_slice());
        assert_eq!(session.search_circle(), circle);
    }

    #[tokio::test]
    async fn back_keeps_results_and_selection() {
        let mut session = SearchSession::new();
        session
            .search(&FixedFinder(vec![area("a", 48.0, 2.0, 100.0)]), paris())
            .await
            .unwrap();
        session.select_area("a").unwrap();

        session.back_to_search();

        assert_eq!(session.view_mode(), ViewMode::Search);
        assert_eq!(session.selected_id(), Some("a"));
        assert_eq!(session.areas().len(), 1);
    }

    #[tokio::test]
    async fn new_search_clears_selection_and_view() {
        let mut session = SearchSession::new();
        let finder = FixedFinder(vec![area("a", 48.0, 2.0, 100.0)]);
        session.search(&finder, paris()).await.unwrap();
        session.select_area("a").unwrap();

        session.begin_search(paris()).unwrap();

        assert_eq!(session.view_mode(), ViewMode::Search);
        assert!(session.selected().is_none());
        assert!(session.areas().is_empty());
        assert!(session.search_circle().is_none());
    }

    #[test]
    fn unknown_area_is_rejected() {
        let mut session = SearchSession::new();
        assert!(matches!(
            session.select_area("missing"),
            Err(SessionError::UnknownArea { .. })
        ));
        assert_eq!(session.view_mode(), ViewMode::Search);
    }

    #[tokio::test]
    async fn catering_toggle_survives_switching_areas_in_details() {
        let mut session = SearchSession::new();
        let finder = FixedFinder(vec![
            area("a", 48.0, 2.0, 100.0),
            area("b", 49.0, 3.0, 100.0),
        ]);
        session.search(&finder, paris()).await.unwrap();
        session.select_area("a").unwrap();
        assert!(session.catering_shown());
        assert!(!session.toggle_catering());

        session.select_area("b").unwrap();
        assert!(!session.catering_shown());
        assert_eq!(session.selected_id(), Some("b"));
    }

    #[tokio::test]
    async fn reopening_details_shows_catering_again() {
        let mut session = SearchSession::new();
        session
            .search(&FixedFinder(vec![area("a", 48.0, 2.0, 100.0)]), paris())
            .await
            .unwrap();
        session.select_area("a").unwrap();
        session.toggle_catering();
        session.back_to_search();

        session.select_area("a").unwrap();
        assert!(session.catering_shown());
    }
}
