//! HTTP handler functions for the SceneBay API.

use actix_web::{HttpResponse, web};
use scenebay_ai::AiError;
use scenebay_scout_models::SearchParams;
use scenebay_server_models::{
    ApiError, ApiFormDefaults, ApiHealth, ApiSessionSnapshot, ApiTheme,
};
use scenebay_session::{SearchSession, SearchTicket, SessionError};
use scenebay_view::{details_view, map_layers, results_view};

use crate::AppState;

fn snapshot(state: &AppState, session: &SearchSession) -> HttpResponse {
    HttpResponse::Ok().json(ApiSessionSnapshot::new(session, state.theme()))
}

fn session_error(e: &SessionError) -> HttpResponse {
    let body = ApiError::new(e.to_string());
    match e {
        SessionError::InvalidParams(_) => HttpResponse::BadRequest().json(body),
        SessionError::Busy | SessionError::StaleTicket => HttpResponse::Conflict().json(body),
        SessionError::UnknownArea { .. } => HttpResponse::NotFound().json(body),
    }
}

/// Fails the in-flight search if the request future is dropped while the
/// model call is pending, so the session does not stay busy.
struct PendingSearch {
    state: web::Data<AppState>,
    ticket: SearchTicket,
    armed: bool,
}

impl PendingSearch {
    const fn new(state: web::Data<AppState>, ticket: SearchTicket) -> Self {
        Self {
            state,
            ticket,
            armed: true,
        }
    }

    fn disarm(mut self) -> SearchTicket {
        self.armed = false;
        self.ticket
    }
}

impl Drop for PendingSearch {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        log::warn!("Search request dropped before the model answered");
        let result = self
            .state
            .session()
            .complete_search(self.ticket, Err(AiError::Cancelled.into()));
        if let Err(e) = result {
            log::debug!("Cancelled search was already settled: {e}");
        }
    }
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/form`
///
/// Returns the prefilled search form and the unit choices.
pub async fn form() -> HttpResponse {
    HttpResponse::Ok().json(ApiFormDefaults::default())
}

/// `POST /api/search`
///
/// Runs a search and returns the resulting snapshot. A failed search is
/// still a 200: the failure is shown in the results panel.
pub async fn search(state: web::Data<AppState>, body: web::Json<SearchParams>) -> HttpResponse {
    let params = body.into_inner();

    let ticket = match state.session().begin_search(params.clone()) {
        Ok(ticket) => ticket,
        Err(e) => {
            log::warn!("Rejected search: {e}");
            return session_error(&e);
        }
    };

    let pending = PendingSearch::new(state.clone(), ticket);
    let outcome = state.finder.find_areas(&params).await;
    let ticket = pending.disarm();

    let mut session = state.session();
    if let Err(e) = session.complete_search(ticket, outcome) {
        log::error!("Failed to complete search: {e}");
        return session_error(&e);
    }

    snapshot(&state, &session)
}

/// `GET /api/session`
pub async fn session(state: web::Data<AppState>) -> HttpResponse {
    let session = state.session();
    snapshot(&state, &session)
}

/// `GET /api/results`
pub async fn results(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(results_view(&state.session()))
}

/// `GET /api/details`
///
/// Details of the selected area, or 404 when nothing is selected.
pub async fn details(state: web::Data<AppState>) -> HttpResponse {
    let session = state.session();
    session.selected().map_or_else(
        || HttpResponse::NotFound().json(ApiError::new("No area selected")),
        |area| HttpResponse::Ok().json(details_view(area, session.catering_shown())),
    )
}

/// `GET /api/map`
pub async fn map(state: web::Data<AppState>) -> HttpResponse {
    let theme = state.theme();
    HttpResponse::Ok().json(map_layers(&state.session(), theme))
}

/// `POST /api/areas/{id}/select`
pub async fn select_area(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    let mut session = state.session();

    if let Err(e) = session.select_area(&id) {
        log::debug!("Select failed: {e}");
        return session_error(&e);
    }

    snapshot(&state, &session)
}

/// `POST /api/back`
pub async fn back(state: web::Data<AppState>) -> HttpResponse {
    let mut session = state.session();
    session.back_to_search();
    snapshot(&state, &session)
}

/// `POST /api/details/catering`
///
/// Shows or hides the catering section of the details panel.
pub async fn toggle_catering(state: web::Data<AppState>) -> HttpResponse {
    let mut session = state.session();
    if session.selected().is_none() {
        return HttpResponse::NotFound().json(ApiError::new("No area selected"));
    }
    session.toggle_catering();
    snapshot(&state, &session)
}

/// `GET /api/theme`
pub async fn theme(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiTheme {
        theme: state.theme(),
    })
}

/// `POST /api/theme/toggle`
///
/// Flips the theme and persists it.
pub async fn toggle_theme(state: web::Data<AppState>) -> HttpResponse {
    let result = state.theme_controller().toggle();
    match result {
        Ok(theme) => {
            log::info!("Theme switched to {theme}");
            HttpResponse::Ok().json(ApiTheme { theme })
        }
        Err(e) => {
            log::error!("Failed to persist theme: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to persist theme"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use actix_web::{App, test};
    use scenebay_ai::{AreaFinder, SearchFailed};
    use scenebay_session::SearchStatus;
    use scenebay_scout_models::{Area, AreaScores, Availability, DistanceUnit};
    use scenebay_theme::{MemoryThemeStore, Theme, ThemeController};
    use serde_json::{Value, json};

    use super::*;
    use crate::configure;

    struct FixedFinder(Result<Vec<Area>, ()>);

    #[async_trait::async_trait]
    impl AreaFinder for FixedFinder {
        async fn find_areas(&self, _params: &SearchParams) -> Result<Vec<Area>, SearchFailed> {
            self.0
                .clone()
                .map_err(|()| SearchFailed::from(AiError::EmptyResponse))
        }
    }

    /// Never answers the first search; answers later ones with one area.
    struct StallsOnceFinder {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl AreaFinder for StallsOnceFinder {
        async fn find_areas(&self, _params: &SearchParams) -> Result<Vec<Area>, SearchFailed> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                std::future::pending::<()>().await;
            }
            Ok(vec![area("a", 48.86, 2.35)])
        }
    }

    fn area(id: &str, lat: f64, lng: f64) -> Area {
        Area {
            id: id.to_string(),
            name: format!("Area {id}"),
            summary: String::new(),
            feature_analysis: Vec::new(),
            lat,
            lng,
            area_radius: 900.0,
            scores: AreaScores {
                accommodation: Availability::new(50.0, 100.0),
                catering: Availability::new(1.0, 2.0),
                parking: Availability::new(3.0, 4.0),
                accommodation_capacity: String::new(),
                example_hotels: None,
                example_catering: None,
                example_parking: None,
            },
        }
    }

    fn state(outcome: Result<Vec<Area>, ()>) -> web::Data<AppState> {
        let store = Arc::new(MemoryThemeStore::new(None));
        web::Data::new(AppState::new(
            Arc::new(FixedFinder(outcome)),
            ThemeController::new(store, false),
        ))
    }

    fn paris() -> Value {
        json!({
            "location": "Paris, France",
            "radius": 5,
            "unit": "km",
            "desiredFeatures": "",
            "crewSize": 50
        })
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).configure(configure)).await
        };
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = app!(state(Ok(Vec::new())));
        let resp: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/health").to_request())
                .await;
        assert_eq!(resp["healthy"], true);
    }

    #[actix_web::test]
    async fn search_returns_framed_snapshot() {
        let app = app!(state(Ok(vec![area("a", 48.86, 2.35)])));
        let req = test::TestRequest::post()
            .uri("/api/search")
            .set_json(paris())
            .to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp["status"], "success");
        assert_eq!(resp["results"]["state"], "list");
        assert_eq!(resp["map"]["camera"]["zoom"], 13);
        assert_eq!(resp["map"]["searchCircle"]["radiusM"], 5000.0);
    }

    #[actix_web::test]
    async fn failed_search_is_a_presentation_state() {
        let app = app!(state(Err(())));
        let req = test::TestRequest::post()
            .uri("/api/search")
            .set_json(paris())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "error");
        assert_eq!(
            body["results"]["message"],
            "Failed to fetch areas. Please check your query or API key."
        );
    }

    #[actix_web::test]
    async fn invalid_params_are_bad_requests() {
        let app = app!(state(Ok(Vec::new())));
        let mut params = paris();
        params["crewSize"] = json!(0);
        let req = test::TestRequest::post()
            .uri("/api/search")
            .set_json(params)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);
    }

    #[actix_web::test]
    async fn search_while_loading_conflicts() {
        let state = state(Ok(Vec::new()));
        let app = app!(state);
        let params: SearchParams = serde_json::from_value(paris()).unwrap();
        state.session().begin_search(params).unwrap();

        let req = test::TestRequest::post()
            .uri("/api/search")
            .set_json(paris())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 409);
    }

    #[actix_web::test]
    async fn abandoned_search_does_not_block_the_next_one() {
        let store = Arc::new(MemoryThemeStore::new(None));
        let state = web::Data::new(AppState::new(
            Arc::new(StallsOnceFinder {
                calls: AtomicUsize::new(0),
            }),
            ThemeController::new(store, false),
        ));
        let app = app!(state);

        let first = test::TestRequest::post()
            .uri("/api/search")
            .set_json(paris())
            .to_request();
        let abandoned = actix_web::rt::time::timeout(
            Duration::from_millis(50),
            test::call_service(&app, first),
        )
        .await;
        assert!(abandoned.is_err());
        assert_eq!(state.session().status(), SearchStatus::Error);

        let second = test::TestRequest::post()
            .uri("/api/search")
            .set_json(paris())
            .to_request();
        let resp = test::call_service(&app, second).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "success");
    }

    #[actix_web::test]
    async fn select_then_back_round_trip() {
        let state = state(Ok(vec![area("a", 48.0, 2.0), area("b", 49.0, 3.0)]));
        let app = app!(state);
        let params = SearchParams {
            unit: DistanceUnit::Miles,
            ..SearchParams::default()
        };
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/search")
                .set_json(&params)
                .to_request(),
        )
        .await;

        let selected: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/areas/b/select")
                .to_request(),
        )
        .await;
        assert_eq!(selected["viewMode"], "details");
        assert_eq!(selected["details"]["id"], "b");
        assert_eq!(selected["map"]["camera"]["zoom"], 14);

        let catering: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/details/catering")
                .to_request(),
        )
        .await;
        assert_eq!(catering["details"]["catering"]["shown"], false);

        let back: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post().uri("/api/back").to_request(),
        )
        .await;
        assert_eq!(back["viewMode"], "search");
        assert_eq!(back["results"]["rows"][1]["selected"], true);
    }

    #[actix_web::test]
    async fn unknown_area_and_missing_selection_are_not_found() {
        let app = app!(state(Ok(Vec::new())));
        let select = test::TestRequest::post()
            .uri("/api/areas/nope/select")
            .to_request();
        assert_eq!(test::call_service(&app, select).await.status(), 404);

        let details = test::TestRequest::get().uri("/api/details").to_request();
        assert_eq!(test::call_service(&app, details).await.status(), 404);
    }

    #[actix_web::test]
    async fn theme_toggle_switches_map_tiles() {
        let state = state(Ok(Vec::new()));
        let app = app!(state);

        let toggled: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/theme/toggle")
                .to_request(),
        )
        .await;
        assert_eq!(toggled["theme"], "dark");
        assert_eq!(state.theme(), Theme::Dark);

        let map: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/map").to_request(),
        )
        .await;
        assert_eq!(map["popupClass"], "dark-theme-popup");
    }
}
