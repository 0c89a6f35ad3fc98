//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::PassthroughConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<PassthroughConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<PassthroughConfig, ConfigError> {
    let config: PassthroughConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Engine;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [server]
            bind_address = "127.0.0.1:9000"
            engine = "hyper"
            max_body_bytes = 4096

            [upstream]
            url = "http://127.0.0.1:5005/"
            env_var = "RIPPLED_URL"

            [timeouts]
            upstream_secs = 3

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
        assert_eq!(config.server.engine, Engine::Hyper);
        assert_eq!(config.server.max_body_bytes, 4096);
        assert_eq!(config.upstream.default_url(), "http://127.0.0.1:5005/");
        assert_eq!(config.upstream.env_var, "RIPPLED_URL");
        assert_eq!(config.timeouts.upstream_secs, 3);
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[server\nengine = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_message() {
        let err = parse_config("[timeouts]\nrequest_secs = 0\nconnect_secs = 0\n").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("timeouts.connect_secs"));
        assert!(message.contains("timeouts.request_secs"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
