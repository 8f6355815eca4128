//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that parse fine but
//! would make the gateway misbehave. All problems are reported at once.

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid base URL '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("aggregation.max_experiences ({max}) exceeds aggregation.experience_page_size ({page})")]
    ExperienceLimitAbovePage { max: usize, page: usize },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),

    #[error("listener.bind_host must not be empty")]
    EmptyBindHost,
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_host.trim().is_empty() {
        errors.push(ValidationError::EmptyBindHost);
    }

    let upstream = &config.upstream;
    for (field, value) in [
        ("upstream.users_base_url", &upstream.users_base_url),
        ("upstream.games_base_url", &upstream.games_base_url),
        ("upstream.apis_base_url", &upstream.apis_base_url),
    ] {
        if let Err(reason) = check_base_url(value) {
            errors.push(ValidationError::InvalidUrl {
                field,
                value: value.clone(),
                reason,
            });
        }
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("timeouts.connect_secs", timeouts.connect_secs),
        ("timeouts.upstream_secs", timeouts.upstream_secs),
        ("timeouts.request_secs", timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero(field));
        }
    }

    let aggregation = &config.aggregation;
    for (field, value) in [
        ("aggregation.max_experiences", aggregation.max_experiences),
        ("aggregation.experience_page_size", aggregation.experience_page_size),
        ("aggregation.gamepass_page_size", aggregation.gamepass_page_size),
        ("aggregation.max_pages", aggregation.max_pages),
        ("aggregation.detail_concurrency", aggregation.detail_concurrency),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero(field));
        }
    }
    if aggregation.max_experiences > aggregation.experience_page_size {
        errors.push(ValidationError::ExperienceLimitAbovePage {
            max: aggregation.max_experiences,
            page: aggregation.experience_page_size,
        });
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_socket_addr().is_none() {
        errors.push(ValidationError::MetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{other}'")),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.upstream.games_base_url = "not a url".to_string();
        config.upstream.apis_base_url = "ftp://apis.example.com".to_string();
        config.timeouts.upstream_secs = 0;
        config.aggregation.detail_concurrency = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero("timeouts.upstream_secs")));
        assert!(errors.contains(&ValidationError::Zero("aggregation.detail_concurrency")));
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("unsupported scheme 'ftp'")));
    }

    #[test]
    fn test_experience_limit_cannot_exceed_page_size() {
        let mut config = GatewayConfig::default();
        config.aggregation.max_experiences = 11;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::ExperienceLimitAbovePage { max: 11, page: 10 }]
        );
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "nowhere".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
