//! One-shot search against the configured provider.

use scenebay_ai::{Scout, providers::create_provider};
use scenebay_cli_utils::{MultiProgress, spinner};
use scenebay_config::AppConfig;
use scenebay_scout_models::SearchParams;
use scenebay_session::{SearchSession, SessionError};

/// Builds a [`Scout`] for the configured provider and temperature.
pub fn scout(config: &AppConfig) -> Scout {
    Scout::new(create_provider(&config.ai)).with_temperature(config.ai.temperature)
}

/// Runs `params` in a fresh session with a spinner while the model works.
///
/// A failed search is returned as a session in the error state.
pub async fn run(
    config: &AppConfig,
    multi: &MultiProgress,
    params: SearchParams,
) -> Result<SearchSession, SessionError> {
    let mut session = SearchSession::new();
    search_in(&mut session, config, multi, params).await?;
    Ok(session)
}

/// Runs `params` in an existing session.
pub async fn search_in(
    session: &mut SearchSession,
    config: &AppConfig,
    multi: &MultiProgress,
    params: SearchParams,
) -> Result<(), SessionError> {
    let finder = scout(config);
    let bar = spinner(
        multi,
        &format!(
            "Scouting {} within {} {}",
            params.location, params.radius, params.unit
        ),
    );

    log::debug!("Submitting search: {params:?}");
    let result = session.search(&finder, params).await;
    bar.finish_and_clear();

    match &result {
        Ok(()) => log::info!(
            "Search finished as {} with {} area(s)",
            session.status(),
            session.areas().len()
        ),
        Err(e) => log::warn!("Search rejected: {e}"),
    }
    result
}
