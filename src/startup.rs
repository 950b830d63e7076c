use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    data::legacy::{LegacyImportRepository, LegacySettings},
    error::{config::ConfigError, AppError},
};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Installs the tracing subscriber, defaulting to `info` unless `RUST_LOG` is set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Connects to the Sqlite database and runs pending migrations.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Builds the HTTP client used for the players catalog and the release listing.
///
/// Every request is bounded by the configured timeout. GitHub rejects requests without
/// a user agent.
pub fn setup_reqwest_client(config: &Config) -> Result<reqwest::Client, AppError> {
    Ok(reqwest::Client::builder()
        .timeout(config.http_timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Imports the legacy settings document into an empty database.
///
/// Skipped when no path is configured or the database already holds listener roles or
/// overrides, so restarting with the same path does not import twice.
pub async fn import_legacy_settings(
    db: &DatabaseConnection,
    config: &Config,
) -> Result<(), AppError> {
    let Some(path) = &config.legacy_settings_path else {
        return Ok(());
    };

    let repo = LegacyImportRepository::new(db);
    if !repo.is_empty().await? {
        tracing::debug!("Database already populated, skipping legacy import of {}", path);
        return Ok(());
    }

    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::ReadLegacySettings {
            path: path.clone(),
            source,
        })?;
    let settings =
        LegacySettings::from_json(&json).map_err(|source| ConfigError::DecodeLegacySettings {
            path: path.clone(),
            source,
        })?;

    let summary = repo.import(&settings).await?;

    tracing::info!(
        "Imported legacy settings from {}: {} app IDs, {} user app IDs, {} listener roles, {} autolog channels, {} sponsor guilds",
        path,
        summary.known_apps,
        summary.user_apps,
        summary.listener_roles,
        summary.autolog_channels,
        summary.sponsor_guilds
    );

    Ok(())
}
