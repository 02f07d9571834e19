//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the LVS health monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Virtual IP the LVS director listens on.
    pub virtual_ip: String,

    /// Backend node addresses to monitor.
    pub backends: Vec<String>,

    /// TCP port specs: single ports ("80") or inclusive ranges ("11000-12000").
    pub tcp_ports: Vec<String>,

    /// UDP port specs, same forms as `tcp_ports`.
    pub udp_ports: Vec<String>,

    /// Probe and state-machine settings.
    pub health: HealthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Probe cadence, smoothing window, and transition threshold.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Average loss percentage at or above which a backend is marked DOWN.
    pub loss_threshold: u8,

    /// Sliding window capacity in samples (one sample per interval).
    pub window_seconds: usize,

    /// Probe interval in seconds.
    pub interval_secs: u64,

    /// Per-probe timeout in seconds.
    pub ping_timeout_secs: u64,

    /// Echo requests sent per probe.
    pub ping_count: u32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            loss_threshold: 5,
            window_seconds: 60,
            interval_secs: 1,
            ping_timeout_secs: 1,
            ping_count: 1,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = MonitorConfig::default();
        assert_eq!(config.health.loss_threshold, 5);
        assert_eq!(config.health.window_seconds, 60);
        assert_eq!(config.health.interval_secs, 1);
        assert_eq!(config.health.ping_timeout_secs, 1);
        assert_eq!(config.observability.log_level, "info");
        assert!(config.backends.is_empty());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: MonitorConfig = toml::from_str(
            r#"
            virtual_ip = "10.1.1.1"
            backends = ["10.1.1.2", "10.1.1.3"]
            tcp_ports = ["80", "11000-12000"]

            [health]
            loss_threshold = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.virtual_ip, "10.1.1.1");
        assert_eq!(config.backends.len(), 2);
        assert_eq!(config.health.loss_threshold, 10);
        // Unspecified fields fall back to defaults.
        assert_eq!(config.health.window_seconds, 60);
        assert!(config.udp_ports.is_empty());
    }
}
