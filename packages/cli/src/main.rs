#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the SceneBay location scout.
//!
//! ```text
//! scenebay search --location "Lisbon, Portugal" --radius 3 --unit miles
//! scenebay search --features "" --crew-size 120 --details 2
//! scenebay serve [--interactive]
//! scenebay theme show|toggle
//! ```
//!
//! Running `scenebay` with no subcommand enters interactive mode.
//!
//! Uses `indicatif-log-bridge` (via [`scenebay_cli_utils::init_logger`])
//! so that log lines and the search spinner never fight for the terminal.

mod interactive;
mod search;

use clap::{Args, Parser, Subcommand};
use scenebay_config::AppConfig;
use scenebay_scout_models::{DistanceUnit, SearchParams};
use scenebay_session::SearchStatus;
use scenebay_theme::ThemeController;
use scenebay_view::{details_view, results_view, text};

#[derive(Parser)]
#[command(
    name = "scenebay",
    about = "Scout film shoot locations with a generative model"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for candidate filming areas
    Search(SearchArgs),
    /// Start the API server
    Serve {
        /// Prompt for bind address and port first
        #[arg(long)]
        interactive: bool,
    },
    /// Show or toggle the light/dark theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between light and dark and persist the choice
    Toggle,
}

/// Search form fields; anything omitted takes the form default.
#[derive(Args)]
struct SearchArgs {
    /// Base location, e.g. "Paris, France"
    #[arg(long)]
    location: Option<String>,
    /// Search radius
    #[arg(long)]
    radius: Option<f64>,
    /// Radius unit (km or miles)
    #[arg(long)]
    unit: Option<DistanceUnit>,
    /// Desired scene features; pass "" for none
    #[arg(long)]
    features: Option<String>,
    /// Approximate crew size
    #[arg(long)]
    crew_size: Option<u32>,
    /// Print the areas as JSON
    #[arg(long)]
    json: bool,
    /// Also show details for the Nth result (1-based)
    #[arg(long, value_name = "N")]
    details: Option<usize>,
}

impl SearchArgs {
    fn params(&self) -> SearchParams {
        let defaults = SearchParams::default();
        SearchParams {
            location: self.location.clone().unwrap_or(defaults.location),
            radius: self.radius.unwrap_or(defaults.radius),
            unit: self.unit.unwrap_or(defaults.unit),
            desired_features: self
                .features
                .clone()
                .unwrap_or(defaults.desired_features),
            crew_size: self.crew_size.unwrap_or(defaults.crew_size),
        }
    }
}

async fn run_search(
    config: &AppConfig,
    multi: &scenebay_cli_utils::MultiProgress,
    args: &SearchArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = search::run(config, multi, args.params()).await?;

    if session.status() == SearchStatus::Error {
        eprintln!("{}", session.error().unwrap_or_default());
        std::process::exit(1);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(session.areas())?);
    } else {
        print!("{}", text::render_results(&results_view(&session)));
    }

    if let Some(n) = args.details {
        let Some(id) = n
            .checked_sub(1)
            .and_then(|i| session.areas().get(i))
            .map(|area| area.id.clone())
        else {
            eprintln!("No result #{n}");
            std::process::exit(1);
        };
        let area = session.select_area(&id)?.clone();
        println!();
        print!(
            "{}",
            text::render_details(&details_view(&area, session.catering_shown()))
        );
    }

    Ok(())
}

/// Runs the server on actix-web's own runtime.
async fn serve(config: AppConfig, interactive: bool) -> Result<(), Box<dyn std::error::Error>> {
    // The server uses actix-web's runtime, so we need to run it in a
    // blocking task to avoid nesting tokio runtimes.
    tokio::task::spawn_blocking(move || {
        let system = actix_web::rt::System::new();
        if interactive {
            system.block_on(scenebay_server::interactive::run(config))
        } else {
            system.block_on(scenebay_server::run_server(config))
        }
    })
    .await??;
    Ok(())
}

fn theme(config: &AppConfig, action: &ThemeAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = ThemeController::from_settings(&config.theme);
    match action {
        ThemeAction::Show => println!("{}", controller.theme()),
        ThemeAction::Toggle => println!("{}", controller.toggle()?),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = scenebay_cli_utils::init_logger();
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    let Some(command) = cli.command else {
        return interactive::run(config, &multi).await;
    };

    match command {
        Commands::Search(args) => run_search(&config, &multi, &args).await?,
        Commands::Serve { interactive } => serve(config, interactive).await?,
        Commands::Theme { action } => theme(&config, &action)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_flags_take_form_defaults() {
        let cli = Cli::parse_from(["scenebay", "search", "--unit", "miles", "--features", ""]);
        let Some(Commands::Search(args)) = cli.command else {
            panic!("expected search");
        };
        let params = args.params();
        assert_eq!(params.location, "Paris, France");
        assert_eq!(params.unit, DistanceUnit::Miles);
        assert!(!params.has_desired_features());
        assert_eq!(params.crew_size, 50);
    }

    #[test]
    fn theme_requires_an_action() {
        assert!(Cli::try_parse_from(["scenebay", "theme"]).is_err());
        assert!(Cli::try_parse_from(["scenebay", "theme", "toggle"]).is_ok());
    }

    #[test]
    fn no_subcommand_is_interactive() {
        assert!(Cli::parse_from(["scenebay"]).command.is_none());
    }
}
