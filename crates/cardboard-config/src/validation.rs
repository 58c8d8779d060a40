//! Configuration validation logic.

use crate::errors::ConfigError;
use crate::types::CardboardConfig;

/// Validate a CardboardConfig, returning an error if any values are invalid.
///
/// # Validation Rules
///
/// - `base_interval_ms` must be greater than zero
/// - `max_interval_ms` must not be below `base_interval_ms`
/// - `endpoint` must be an `http(s)://` URL, or a `/path` with `base_url` set
/// - `base_url`, if set, must be an `http(s)://` URL
pub fn validate_config(config: &CardboardConfig) -> Result<(), ConfigError> {
    let base = config.poll.base_interval();
    let max = config.poll.max_interval();

    if base.is_zero() {
        return Err(ConfigError::InvalidConfiguration {
            message: "poll.base_interval_ms must be > 0".to_string(),
        });
    }

    if max < base {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "poll.max_interval_ms ({}) must be >= poll.base_interval_ms ({})",
                max.as_millis(),
                base.as_millis()
            ),
        });
    }

    if let Some(ref base_url) = config.source.base_url
        && !is_http_url(base_url)
    {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "source.base_url '{}' must start with http:// or https://",
                base_url
            ),
        });
    }

    if let Some(ref endpoint) = config.source.endpoint {
        if endpoint.starts_with('/') {
            if config.source.base_url.is_none() {
                return Err(ConfigError::InvalidConfiguration {
                    message: format!(
                        "source.endpoint '{}' is a path; set source.base_url to resolve it",
                        endpoint
                    ),
                });
            }
        } else if !is_http_url(endpoint) {
            return Err(ConfigError::InvalidConfiguration {
                message: format!(
                    "source.endpoint '{}' must be an http(s) URL or start with '/'",
                    endpoint
                ),
            });
        }
    }

    Ok(())
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PollSettings, SourceConfig};

    #[test]
    fn test_validate_defaults_ok() {
        assert!(validate_config(&CardboardConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_zero_base_interval_fails() {
        let mut config = CardboardConfig::default();
        config.poll.base_interval_ms = Some(0);
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("base_interval_ms"));
    }

    #[test]
    fn test_validate_max_below_base_fails() {
        let config = CardboardConfig {
            poll: PollSettings {
                base_interval_ms: Some(5_000),
                max_interval_ms: Some(1_000),
                request_timeout_ms: None,
            },
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("max_interval_ms"));
    }

    #[test]
    fn test_validate_max_equal_base_ok() {
        let mut config = CardboardConfig::default();
        config.poll.base_interval_ms = Some(3_000);
        config.poll.max_interval_ms = Some(3_000);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_absolute_endpoint_ok() {
        let mut config = CardboardConfig::default();
        config.source.endpoint = Some("http://localhost:8080/my/dashboard".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_path_endpoint_requires_base_url() {
        let mut config = CardboardConfig::default();
        config.source.endpoint = Some("/my/dashboard".to_string());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("base_url"));

        config.source.base_url = Some("http://localhost:8080".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_bad_scheme_fails() {
        let config = CardboardConfig {
            source: SourceConfig {
                endpoint: Some("ftp://cards".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_bad_base_url_fails() {
        let mut config = CardboardConfig::default();
        config.source.base_url = Some("localhost:8080".to_string());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("source.base_url"));
    }
}
