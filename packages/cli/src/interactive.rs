//! Interactive mode: prompts for each search form field, then lets the
//! user browse results and details until they quit.

use dialoguer::{Input, Select};
use scenebay_cli_utils::MultiProgress;
use scenebay_config::AppConfig;
use scenebay_scout_models::{DistanceUnit, SearchParams};
use scenebay_session::{SearchSession, SearchStatus};
use scenebay_theme::ThemeController;
use scenebay_view::{details_view, results_view, text};

use crate::search;

/// Top-level actions.
enum Action {
    Search,
    Server,
    ToggleTheme,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[Self::Search, Self::Server, Self::ToggleTheme, Self::Quit];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Search => "Scout locations",
            Self::Server => "Start server",
            Self::ToggleTheme => "Toggle theme",
            Self::Quit => "Quit",
        }
    }
}

const UNITS: [DistanceUnit; 2] = [DistanceUnit::Km, DistanceUnit::Miles];

fn prompt_params(previous: &SearchParams) -> Result<SearchParams, dialoguer::Error> {
    let location: String = Input::new()
        .with_prompt("Location")
        .default(previous.location.clone())
        .interact_text()?;

    let radius: f64 = Input::new()
        .with_prompt("Radius")
        .default(previous.radius)
        .validate_with(|r: &f64| {
            if r.is_finite() && *r > 0.0 {
                Ok(())
            } else {
                Err("Radius must be a positive number")
            }
        })
        .interact_text()?;

    let labels: Vec<&str> = UNITS.iter().map(|u| u.label()).collect();
    let unit_idx = Select::new()
        .with_prompt("Unit")
        .items(&labels)
        .default(UNITS.iter().position(|u| *u == previous.unit).unwrap_or(0))
        .interact()?;

    let desired_features: String = Input::new()
        .with_prompt("Desired features (leave blank for none)")
        .default(previous.desired_features.clone())
        .allow_empty(true)
        .interact_text()?;

    let crew_size: u32 = Input::new()
        .with_prompt("Crew size")
        .default(previous.crew_size)
        .validate_with(|n: &u32| if *n > 0 { Ok(()) } else { Err("Crew size must be at least 1") })
        .interact_text()?;

    Ok(SearchParams {
        location,
        radius,
        unit: UNITS[unit_idx],
        desired_features,
        crew_size,
    })
}

/// Shows the details panel for the selected area until the user goes back.
fn browse_details(session: &mut SearchSession) -> Result<(), dialoguer::Error> {
    loop {
        let Some(area) = session.selected() else {
            return Ok(());
        };
        println!();
        print!(
            "{}",
            text::render_details(&details_view(area, session.catering_shown()))
        );

        let catering = if session.catering_shown() {
            "Hide catering options"
        } else {
            "Show catering options"
        };
        let choice = Select::new()
            .items(&["Back to results", catering])
            .default(0)
            .interact()?;

        if choice == 0 {
            session.back_to_search();
            return Ok(());
        }
        session.toggle_catering();
    }
}

/// Lets the user pick results to inspect until they choose "Done".
fn browse_results(session: &mut SearchSession) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        println!();
        print!("{}", text::render_results(&results_view(session)));

        if session.status() != SearchStatus::Success || session.areas().is_empty() {
            return Ok(());
        }

        let mut items: Vec<String> = session.areas().iter().map(|a| a.name.clone()).collect();
        items.push("Done".to_string());

        let idx = Select::new()
            .with_prompt("View details")
            .items(&items)
            .default(0)
            .interact()?;

        let Some(id) = session.areas().get(idx).map(|a| a.id.clone()) else {
            return Ok(());
        };
        session.select_area(&id)?;
        browse_details(session)?;
    }
}

/// Runs the interactive scout.
///
/// # Errors
///
/// Returns an error if a prompt fails, the theme cannot be persisted, or
/// the server fails to start.
pub async fn run(config: AppConfig, multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("SceneBay");
    println!();

    let mut session = SearchSession::new();
    let mut last = SearchParams::default();

    loop {
        let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::Search => {
                let params = prompt_params(&last)?;
                last = params.clone();
                if let Err(e) = search::search_in(&mut session, &config, multi, params).await {
                    eprintln!("{e}");
                    continue;
                }
                browse_results(&mut session)?;
            }
            Action::Server => {
                let config = config.clone();
                tokio::task::spawn_blocking(move || {
                    actix_web::rt::System::new()
                        .block_on(scenebay_server::interactive::run(config))
                })
                .await??;
                return Ok(());
            }
            Action::ToggleTheme => {
                let theme = ThemeController::from_settings(&config.theme).toggle()?;
                println!("Theme is now {theme}");
            }
            Action::Quit => return Ok(()),
        }
    }
}
