//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts bounded)
//! - Check proxy URLs and header names/values are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before a config is turned into a client

use reqwest::header::{HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::schema::{ClientConfig, ProxyPolicy};

/// Upper bound for any configured timeout: one day.
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

/// A single semantic problem in a config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("timeouts.{field} must be at most {max} seconds, got {value}")]
    TimeoutTooLarge {
        field: &'static str,
        value: u64,
        max: u64,
    },

    #[error("transport.proxy is not a valid URL: {0}")]
    InvalidProxy(String),

    #[error("invalid header name '{0}'")]
    InvalidHeaderName(String),

    #[error("invalid value for header '{0}'")]
    InvalidHeaderValue(String),

    #[error("dump.output must not be empty")]
    EmptyDumpOutput,
}

/// Check `config` and collect every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let timeouts = [
        ("request_secs", config.timeouts.request_secs),
        ("connect_secs", config.timeouts.connect_secs),
        ("idle_secs", config.timeouts.idle_secs),
    ];
    for (field, value) in timeouts {
        if value > MAX_TIMEOUT_SECS {
            errors.push(ValidationError::TimeoutTooLarge {
                field,
                value,
                max: MAX_TIMEOUT_SECS,
            });
        }
    }

    if let ProxyPolicy::Url(raw) = &config.transport.proxy {
        if url::Url::parse(raw).is_err() {
            errors.push(ValidationError::InvalidProxy(raw.clone()));
        }
    }

    for (name, value) in &config.headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeaderName(name.clone()));
        } else if HeaderValue::from_str(value).is_err() {
            errors.push(ValidationError::InvalidHeaderValue(name.clone()));
        }
    }

    if let Some(ua) = &config.user_agent {
        if HeaderValue::from_str(ua).is_err() {
            errors.push(ValidationError::InvalidHeaderValue("User-Agent".to_string()));
        }
    }

    if config.dump.output.trim().is_empty() {
        errors.push(ValidationError::EmptyDumpOutput);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = ClientConfig::default();
        config.timeouts.request_secs = MAX_TIMEOUT_SECS + 1;
        config.transport.proxy = ProxyPolicy::Url("not a url".into());
        config.headers.insert("bad header".into(), "x".into());
        config.headers.insert("X-Ok".into(), "line\nbreak".into());
        config.dump.output = "  ".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::InvalidProxy("not a url".into())));
        assert!(errors.contains(&ValidationError::InvalidHeaderName("bad header".into())));
        assert!(errors.contains(&ValidationError::InvalidHeaderValue("X-Ok".into())));
        assert!(errors.contains(&ValidationError::EmptyDumpOutput));
    }

    #[test]
    fn timeout_error_message() {
        let err = ValidationError::TimeoutTooLarge {
            field: "idle_secs",
            value: 100_000,
            max: MAX_TIMEOUT_SECS,
        };
        assert_eq!(
            err.to_string(),
            "timeouts.idle_secs must be at most 86400 seconds, got 100000"
        );
    }
}
