use crate::error::ConfigError;
use config::{Environment, File};
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::{LogLevel, init_tracing};
pub use settings::{ClientSettings, Credentials, RawSettings, Settings, mask};

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "translator.toml";

/// Loads variables from an `.env` file into the process environment.
///
/// An explicitly named file that exists must be readable; otherwise the usual
/// `.env` lookup is attempted and a missing file is not an error.
pub fn load_env_file(path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(path) if path.exists() => {
            dotenvy::from_path(path).map_err(|source| ConfigError::EnvFile {
                path: path.display().to_string(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "Loaded env file.");
        }
        _ => {
            if let Ok(found) = dotenvy::dotenv() {
                tracing::debug!(path = %found.display(), "Loaded env file.");
            }
        }
    }
    Ok(())
}

/// Loads and validates the application settings.
///
/// Values come from the optional TOML file first and are then overridden by
/// `THREECOMMAS_*` environment variables. Missing credentials fail here, before
/// any instruction is looked at.
pub fn load_settings(config_file: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match config_file {
        Some(path) => File::from(path).required(false),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(Environment::with_prefix(settings::ENV_PREFIX))
        .build()?;

    let raw = builder.try_deserialize::<RawSettings>()?;
    let settings = raw.validate()?;
    tracing::debug!(credentials = ?settings.credentials, base_url = %settings.client.base_url, "Configuration loaded.");

    Ok(settings)
}
