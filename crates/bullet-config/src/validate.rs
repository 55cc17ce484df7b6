//! Post-merge configuration validation.

use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Accepted values for `logging.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Accepted values for `logging.format`.
pub const LOG_FORMATS: &[&str] = &["pretty", "compact", "json", "full"];

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_dispatcher(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_dispatcher(config: &Config) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    for (idx, name) in config.dispatcher.declared_events.iter().enumerate() {
        if name.is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("dispatcher.declared_events[{idx}]"),
                message: "event names must not be empty".to_owned(),
            });
        }
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::ValidationError {
                field: format!("dispatcher.declared_events[{idx}]"),
                message: format!("event '{name}' is declared more than once"),
            });
        }
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;

    if !LOG_LEVELS.contains(&l.level.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: format!(
                "invalid log level '{}'; expected one of: {}",
                l.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if !LOG_FORMATS.contains(&l.format.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "invalid log format '{}'; expected one of: {}",
                l.format,
                LOG_FORMATS.join(", ")
            ),
        });
    }

    if let Some(idx) = l.directives.iter().position(|d| d.trim().is_empty()) {
        return Err(ConfigError::ValidationError {
            field: format!("logging.directives[{idx}]"),
            message: "directives must not be empty".to_owned(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: ConfigError) -> String {
        match err {
            ConfigError::ValidationError { field, .. } => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_declared_event() {
        let mut config = Config::default();
        config.dispatcher.declared_events = vec!["ping".to_owned(), String::new()];
        assert_eq!(
            field_of(validate(&config).unwrap_err()),
            "dispatcher.declared_events[1]"
        );
    }

    #[test]
    fn test_duplicate_declared_event() {
        let mut config = Config::default();
        config.dispatcher.declared_events = vec!["ping".to_owned(), "ping".to_owned()];
        assert_eq!(
            field_of(validate(&config).unwrap_err()),
            "dispatcher.declared_events[1]"
        );
    }

    #[test]
    fn test_invalid_level_and_format() {
        let mut config = Config::default();
        config.logging.level = "loud".to_owned();
        assert_eq!(field_of(validate(&config).unwrap_err()), "logging.level");

        let mut config = Config::default();
        config.logging.format = "xml".to_owned();
        assert_eq!(field_of(validate(&config).unwrap_err()), "logging.format");
    }

    #[test]
    fn test_blank_directive() {
        let mut config = Config::default();
        config.logging.directives = vec!["  ".to_owned()];
        assert_eq!(
            field_of(validate(&config).unwrap_err()),
            "logging.directives[0]"
        );
    }
}
