//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (window > 0, threshold within percent bounds)
//! - Check every port spec expands cleanly
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::ports::{expand_spec, PortSpecError};
use crate::config::schema::MonitorConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("virtual_ip must not be empty")]
    EmptyVirtualIp,

    #[error("at least one backend must be configured")]
    NoBackends,

    #[error("backend address must not be empty")]
    EmptyBackend,

    #[error("no TCP or UDP service ports configured")]
    NoPorts,

    #[error("health.loss_threshold must be a percentage <= 100, got {0}")]
    ThresholdOutOfRange(u8),

    #[error("health.window_seconds must be greater than zero")]
    ZeroWindow,

    #[error("health.interval_secs must be greater than zero")]
    ZeroInterval,

    #[error("health.ping_count must be greater than zero")]
    ZeroPingCount,

    #[error("{field}: {source}")]
    BadPortSpec {
        field: &'static str,
        source: PortSpecError,
    },
}

/// Validate a loaded configuration, collecting every error found.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.virtual_ip.trim().is_empty() {
        errors.push(ValidationError::EmptyVirtualIp);
    }

    if config.backends.is_empty() {
        errors.push(ValidationError::NoBackends);
    } else if config.backends.iter().any(|b| b.trim().is_empty()) {
        errors.push(ValidationError::EmptyBackend);
    }

    if config.tcp_ports.is_empty() && config.udp_ports.is_empty() {
        errors.push(ValidationError::NoPorts);
    }

    for spec in &config.tcp_ports {
        if let Err(source) = expand_spec(spec) {
            errors.push(ValidationError::BadPortSpec {
                field: "tcp_ports",
                source,
            });
        }
    }
    for spec in &config.udp_ports {
        if let Err(source) = expand_spec(spec) {
            errors.push(ValidationError::BadPortSpec {
                field: "udp_ports",
                source,
            });
        }
    }

    if config.health.loss_threshold > 100 {
        errors.push(ValidationError::ThresholdOutOfRange(
            config.health.loss_threshold,
        ));
    }
    if config.health.window_seconds == 0 {
        errors.push(ValidationError::ZeroWindow);
    }
    if config.health.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.health.ping_count == 0 {
        errors.push(ValidationError::ZeroPingCount);
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

    fn valid_config() -> MonitorConfig {
        MonitorConfig {
            virtual_ip: "10.1.1.1".to_string(),
            backends: vec!["10.1.1.2".to_string()],
            tcp_ports: vec!["80".to_string()],
            udp_ports: vec![],
            ..MonitorConfig::default()
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn empty_config_reports_every_problem() {
        let errors = validate_config(&MonitorConfig::default()).unwrap_err();
        assert!(errors.contains(&ValidationError::EmptyVirtualIp));
        assert!(errors.contains(&ValidationError::NoBackends));
        assert!(errors.contains(&ValidationError::NoPorts));
    }

    #[test]
    fn bad_port_specs_are_reported_per_field() {
        let mut config = valid_config();
        config.tcp_ports.push("9000-8000".to_string());
        config.udp_ports.push("nope".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::BadPortSpec { field: "tcp_ports", .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::BadPortSpec { field: "udp_ports", .. })));
    }

    #[test]
    fn zero_window_and_interval_are_rejected() {
        let mut config = valid_config();
        config.health.window_seconds = 0;
        config.health.interval_secs = 0;
        config.health.ping_count = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::ZeroWindow));
        assert!(errors.contains(&ValidationError::ZeroInterval));
        assert!(errors.contains(&ValidationError::ZeroPingCount));
    }

    #[test]
    fn threshold_above_100_is_rejected() {
        let mut config = valid_config();
        config.health.loss_threshold = 101;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::ThresholdOutOfRange(101)));
    }
}
