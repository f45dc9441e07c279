use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error(
        "Missing configuration values: {}. Set them in the environment or provide an .env file.",
        .0.join(", ")
    )]
    Missing(Vec<String>),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    #[error("Failed to read env file '{path}': {source}")]
    EnvFile {
        path: String,
        #[source]
        source: dotenvy::Error,
    },
}
