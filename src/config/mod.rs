//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! TOML file → loader.rs (read + parse)
//!     → validation.rs (semantic checks, all errors collected)
//!     → ports.rs (expand port specs once, before the scheduler starts)
//!     → immutable MonitorConfig for the process lifetime
//! ```
//!
//! # Design Decisions
//! - Configuration is loaded once at startup; no hot reload
//! - Every section has serde defaults so minimal files stay minimal
//! - Port expansion is pure data transformation, kept out of the core loop

pub mod loader;
pub mod ports;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{HealthConfig, MonitorConfig, ObservabilityConfig};
