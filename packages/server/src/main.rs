#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the SceneBay location scout.
//!
//! Configuration comes from `scenebay.toml` (or `SCENEBAY_CONFIG`) plus
//! environment overrides; see [`scenebay_config::AppConfig::load`].

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = scenebay_config::AppConfig::load()?;
    scenebay_server::run_server(config).await?;

    Ok(())
}
