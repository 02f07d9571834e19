//! LVS Health Monitor Library

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod lvs;
pub mod observability;
pub mod probe;
pub mod scheduler;

pub use config::MonitorConfig;
pub use lifecycle::Shutdown;
pub use scheduler::ProbeScheduler;
