#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the SceneBay location scout.
//!
//! Serves the REST API that drives the single-page frontend and the
//! compiled frontend itself from the configured static directory. The
//! server owns one [`SearchSession`] and one [`ThemeController`]; every
//! mutating endpoint answers with a fresh session snapshot so the frontend
//! can redraw the panels and the map from a single response.

mod handlers;
pub mod interactive;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use scenebay_ai::{AreaFinder, Scout, providers::create_provider};
use scenebay_config::AppConfig;
use scenebay_session::SearchSession;
use scenebay_theme::{Theme, ThemeController};

/// Shared application state.
pub struct AppState {
    /// The scout's search session. Never held across an `.await`.
    pub session: Mutex<SearchSession>,
    /// Answers searches.
    pub finder: Arc<dyn AreaFinder>,
    /// Persisted light/dark preference.
    pub theme: Mutex<ThemeController>,
}

impl AppState {
    #[must_use]
    pub fn new(finder: Arc<dyn AreaFinder>, theme: ThemeController) -> Self {
        Self {
            session: Mutex::new(SearchSession::new()),
            finder,
            theme: Mutex::new(theme),
        }
    }

    /// Builds the state described by `config`: a [`Scout`] over the
    /// configured provider and a file-backed theme.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let scout = Scout::new(create_provider(&config.ai)).with_temperature(config.ai.temperature);
        Self::new(Arc::new(scout), ThemeController::from_settings(&config.theme))
    }

    /// Locks the session. A poisoned lock still holds a consistent session
    /// since no transition panics midway.
    pub fn session(&self) -> MutexGuard<'_, SearchSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the theme controller.
    pub fn theme_controller(&self) -> MutexGuard<'_, ThemeController> {
        self.theme.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The current theme.
    pub fn theme(&self) -> Theme {
        self.theme_controller().theme()
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/form", web::get().to(handlers::form))
            .route("/search", web::post().to(handlers::search))
            .route("/session", web::get().to(handlers::session))
            .route("/results", web::get().to(handlers::results))
            .route("/details", web::get().to(handlers::details))
            .route("/map", web::get().to(handlers::map))
            .route("/areas/{id}/select", web::post().to(handlers::select_area))
            .route("/back", web::post().to(handlers::back))
            .route(
                "/details/catering",
                web::post().to(handlers::toggle_catering),
            )
            .route("/theme", web::get().to(handlers::theme))
            .route("/theme/toggle", web::post().to(handlers::toggle_theme)),
    );
}

/// Starts the SceneBay API server.
///
/// Builds the application state from `config` and starts the Actix-Web
/// HTTP server. This is a regular async function; the caller provides the
/// async runtime (e.g. via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let state = web::Data::new(AppState::from_config(&config));
    log::info!("Initial theme: {}", state.theme());

    let bind_addr = config.server.bind_addr;
    let port = config.server.port;
    let static_dir = config.server.static_dir;

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
            // Serve frontend static files (production)
            .service(Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
