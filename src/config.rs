use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Runtime settings pulled from the environment after `dotenv` has run.
///
/// API keys are loaded lazily per mode so that the direct variant does not
/// require a Qdrant or Gemini key and vice versa. A key that the selected
/// mode needs but the environment lacks is a fatal startup error.
#[derive(Debug, Clone)]
pub struct Config {
    pub qdrant_url: String,
    pub collection_name: String,
    pub gemini_model: String,
    pub mistral_model: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let chunk_size = parse_env("CHUNK_SIZE", 500)?;
        let chunk_overlap = parse_env("CHUNK_OVERLAP", 20)?;
        if chunk_overlap >= chunk_size {
            return Err(ConfigError::InvalidValue(
                "CHUNK_OVERLAP",
                format!("overlap {} must be smaller than chunk size {}", chunk_overlap, chunk_size),
            ));
        }

        Ok(Self {
            qdrant_url: env::var("QDRANT_URL")
                .unwrap_or_else(|_| "http://localhost:6333".to_string()),
            collection_name: env::var("QDRANT_COLLECTION")
                .unwrap_or_else(|_| "medicalbot".to_string()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            mistral_model: env::var("MISTRAL_MODEL")
                .unwrap_or_else(|_| "mistral-medium".to_string()),
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn gemini_api_key() -> Result<String, ConfigError> {
        env::var("GEMINI_API_KEY").map_err(|_| ConfigError::MissingEnv("GEMINI_API_KEY"))
    }

    pub fn mistral_api_key() -> Result<String, ConfigError> {
        env::var("MISTRAL_API_KEY").map_err(|_| ConfigError::MissingEnv("MISTRAL_API_KEY"))
    }
}

fn parse_env(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are process-global and tests run in parallel,
    // so every assertion touching a given variable lives in one test.

    #[test]
    fn chunk_settings_default_and_reject_bad_values() {
        env::remove_var("CHUNK_SIZE");
        env::remove_var("CHUNK_OVERLAP");
        env::remove_var("QDRANT_COLLECTION");
        let config = Config::from_env().unwrap();
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.chunk_overlap, 20);
        assert_eq!(config.collection_name, "medicalbot");

        env::set_var("CHUNK_SIZE", "100");
        env::set_var("CHUNK_OVERLAP", "100");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("CHUNK_OVERLAP", _)), "got {:?}", err);

        env::set_var("CHUNK_SIZE", "five hundred");
        env::remove_var("CHUNK_OVERLAP");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("CHUNK_SIZE", _)), "got {:?}", err);

        env::remove_var("CHUNK_SIZE");
    }

    #[test]
    fn missing_api_keys_are_fatal_for_the_selected_mode() {
        env::remove_var("GEMINI_API_KEY");
        let err = Config::gemini_api_key().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv("GEMINI_API_KEY")), "got {:?}", err);
        assert_eq!(err.to_string(), "Missing required environment variable: GEMINI_API_KEY");

        env::remove_var("MISTRAL_API_KEY");
        let err = Config::mistral_api_key().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv("MISTRAL_API_KEY")), "got {:?}", err);

        env::set_var("GEMINI_API_KEY", "k-local-test");
        assert_eq!(Config::gemini_api_key().unwrap(), "k-local-test");
        env::remove_var("GEMINI_API_KEY");
    }
}
