//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("limits.{0} must be greater than zero")]
    ZeroLimit(&'static str),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    }

    // Zero capacities would panic in tokio::sync::mpsc::channel
    let limits = &config.limits;
    for (name, value) in [
        ("sendq", limits.sendq),
        ("command_queue", limits.command_queue),
        ("max_line_length", limits.max_line_length),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroLimit(name));
        }
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
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn zero_limits_are_rejected() {
        let mut config = Config::default();
        config.limits.sendq = 0;
        config.limits.command_queue = 0;
        config.server.name.clear();

        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[1].to_string(), "limits.sendq must be greater than zero");
    }
}
