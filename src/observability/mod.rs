//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - One log line per probe cycle per target; one per membership mutation
//! - Metrics are cheap (atomic increments) and optional
//! - Exact log text is not load-bearing, only the triggering conditions

pub mod logging;
pub mod metrics;
