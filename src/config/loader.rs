//! Configuration loading from disk and environment.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding the listener port.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
    #[error("Invalid environment override {name}={value}")]
    Env { name: &'static str, value: String },
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    load_from_str(&content)
}

/// Parse and validate configuration from TOML text.
pub fn load_from_str(content: &str) -> Result<ServiceConfig, ConfigError> {
    let config: ServiceConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

impl ServiceConfig {
    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// `PORT` replaces the port of `listener.bind_address`, keeping its host.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(PORT_ENV) {
            let invalid = || ConfigError::Env {
                name: PORT_ENV,
                value: value.clone(),
            };
            let port: u16 = value.trim().parse().map_err(|_| invalid())?;
            let mut addr: SocketAddr = self
                .listener
                .bind_address
                .parse()
                .map_err(|_| {
                    ConfigError::Validation(vec![ValidationError::InvalidBindAddress(
                        self.listener.bind_address.clone(),
                    )])
                })?;
            addr.set_port(port);
            self.listener.bind_address = addr.to_string();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;

    #[test]
    fn empty_document_yields_defaults() {
        let config = load_from_str("").unwrap();
        assert_eq!(config.service.name, "user-service");
        assert!(config.service.seed_defaults);
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = load_from_str(
            r#"
[service]
seed_defaults = false

[observability]
log_format = "pretty"
metrics_enabled = false
"#,
        )
        .unwrap();
        assert_eq!(config.service.name, "user-service");
        assert!(!config.service.seed_defaults);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
        assert!(!config.observability.metrics_enabled);
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = load_from_str("[listener]\nbind_adress = \"0.0.0.0:1\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let err = load_from_str("[observability]\nlog_format = \"xml\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn semantic_errors_surface_as_validation() {
        let err = load_from_str("[timeouts]\nrequest_secs = 0\n").unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::ZeroRequestTimeout])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn port_env_overrides_listener_port() {
        let mut config = ServiceConfig::default();
        config
            .apply_env(|name| (name == PORT_ENV).then(|| "8088".to_string()))
            .unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8088");
    }

    #[test]
    fn absent_port_env_leaves_config_alone() {
        let mut config = ServiceConfig::default();
        config.apply_env(|_| None).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
    }

    #[test]
    fn non_numeric_port_env_is_an_error() {
        let mut config = ServiceConfig::default();
        let err = config
            .apply_env(|_| Some("http".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: PORT_ENV, .. }));
    }

    #[test]
    fn bundled_example_config_is_valid() {
        let config = load_from_str(include_str!("../../config/user-service.toml")).unwrap();
        assert_eq!(config.security.max_body_size, 100 * 1024);
    }

    #[test]
    fn load_config_reports_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
