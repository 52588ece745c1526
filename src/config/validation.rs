//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (coercion already handled types)
//! - Validate value ranges (connection counts and hash sizes > 0)
//! - Check that every upstream a server block proxies to has an address
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs after the merge and before rendering; the merge itself never
//!   rejects a well-typed value

use thiserror::Error;

use crate::config::schema::RouterConfig;

/// Severities nginx accepts for `error_log`.
pub const ERROR_LOG_LEVELS: &[&str] = &[
    "debug", "info", "notice", "warn", "error", "crit", "alert", "emerg",
];

/// A semantic problem with a merged configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("worker_processes must be \"auto\" or a positive integer, got {0:?}")]
    WorkerProcesses(String),

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: i64 },

    #[error("HSTS max-age must not be negative, got {0}")]
    NegativeHstsMaxAge(i64),

    #[error("unknown error log level {0:?}")]
    ErrorLogLevel(String),

    #[error("builder passthrough is configured without a service address")]
    MissingBuilderAddress,

    #[error("app serving {domains:?} is available but has no service address")]
    MissingAppAddress { domains: Vec<String> },
}

/// Validate a merged configuration, collecting every problem.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let workers = config.worker_processes.as_str();
    if workers != "auto" && !workers.parse::<u32>().is_ok_and(|n| n > 0) {
        errors.push(ValidationError::WorkerProcesses(workers.to_string()));
    }

    for (field, value) in [
        ("max_worker_connections", config.max_worker_connections),
        ("server_name_hash_max_size", config.server_name_hash_max_size),
        ("server_name_hash_bucket_size", config.server_name_hash_bucket_size),
    ] {
        if value <= 0 {
            errors.push(ValidationError::NotPositive { field, value });
        }
    }

    if config.ssl.hsts.max_age < 0 {
        errors.push(ValidationError::NegativeHstsMaxAge(config.ssl.hsts.max_age));
    }

    if !ERROR_LOG_LEVELS.contains(&config.error_log_level.as_str()) {
        errors.push(ValidationError::ErrorLogLevel(config.error_log_level.clone()));
    }

    if let Some(builder) = &config.builder {
        if builder.service_ip.trim().is_empty() {
            errors.push(ValidationError::MissingBuilderAddress);
        }
    }

    for app in &config.apps {
        if app.available && app.service_ip.trim().is_empty() {
            errors.push(ValidationError::MissingAppAddress {
                domains: app.domains.clone(),
            });
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
    use crate::config::schema::{AppConfig, BuilderConfig};

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(validate_config(&RouterConfig::default()), Ok(()));
    }

    #[test]
    fn test_worker_processes() {
        let mut config = RouterConfig::default();
        config.worker_processes = "4".into();
        assert!(validate_config(&config).is_ok());

        config.worker_processes = "0".into();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::WorkerProcesses("0".into())])
        );
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RouterConfig::default();
        config.max_worker_connections = 0;
        config.server_name_hash_bucket_size = -1;
        config.ssl.hsts.max_age = -10;
        config.error_log_level = "verbose".into();
        config.builder = Some(BuilderConfig::default());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::NotPositive {
                    field: "max_worker_connections",
                    value: 0
                },
                ValidationError::NotPositive {
                    field: "server_name_hash_bucket_size",
                    value: -1
                },
                ValidationError::NegativeHstsMaxAge(-10),
                ValidationError::ErrorLogLevel("verbose".into()),
                ValidationError::MissingBuilderAddress,
            ]
        );
    }

    #[test]
    fn test_unavailable_app_needs_no_address() {
        let config = RouterConfig::default().with_apps(vec![
            AppConfig {
                service_ip: String::new(),
                available: false,
                domains: vec!["down.example.com".into()],
            },
            AppConfig {
                service_ip: " ".into(),
                available: true,
                domains: vec!["up.example.com".into()],
            },
        ]);

        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::MissingAppAddress {
                domains: vec!["up.example.com".into()]
            }])
        );
    }
}
