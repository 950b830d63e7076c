mod bot;
mod config;
mod data;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod state;

use crate::{
    config::Config, error::AppError, service::catalog::KnownAppRegistry, state::BotState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    startup::import_legacy_settings(&db, &config).await?;

    let http_client = startup::setup_reqwest_client(&config)?;

    let registry = KnownAppRegistry::new();
    match registry.load(&db).await {
        Ok(count) => tracing::info!("Loaded {} known application IDs", count),
        Err(e) => tracing::error!("Failed to load known application IDs: {:?}", e),
    }

    let state = BotState::new(db, http_client, config, registry);

    bot::start::start_bot(state).await
}
