use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// The bot requires this environment variable to be defined. Check the
    /// documentation or `.env.example` file for required configuration variables.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable is set but cannot be parsed.
    #[error("Invalid value for environment variable {name}: {value}")]
    InvalidEnvVar { name: String, value: String },

    /// Legacy settings document could not be read.
    #[error("Failed to read legacy settings {path}: {source}")]
    ReadLegacySettings {
        path: String,
        source: std::io::Error,
    },

    /// Legacy settings document is not valid JSON of the expected shape.
    #[error("Failed to decode legacy settings {path}: {source}")]
    DecodeLegacySettings {
        path: String,
        source: serde_json::Error,
    },
}
