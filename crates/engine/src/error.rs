use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] configuration::error::ConfigError),

    #[error("Could not set up the API client: {0}")]
    ClientSetup(#[source] api_client::error::ApiError),

    #[error("Failed to parse instruction: {0}")]
    Parse(#[from] parser::error::ParseError),

    #[error("Failed to execute instruction: {0}")]
    ApiClient(#[from] api_client::error::ApiError),
}

impl EngineError {
    /// Process exit status for this failure: 1 for configuration (including a
    /// client that cannot be built from it), 2 for an unusable instruction,
    /// 3 when the request could not be executed.
    pub fn exit_code(&self) -> u8 {
        match self {
            EngineError::Configuration(_) | EngineError::ClientSetup(_) => 1,
            EngineError::Parse(_) => 2,
            EngineError::ApiClient(_) => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::error::ConfigError;

    #[test]
    fn display_names_the_cause_once() {
        let error = EngineError::from(ConfigError::Missing(vec!["THREECOMMAS_API_SECRET".to_string()]));
        let rendered = error.to_string();
        assert_eq!(rendered.matches("THREECOMMAS_API_SECRET").count(), 1, "{rendered}");
        assert_eq!(error.exit_code(), 1);
    }
}
