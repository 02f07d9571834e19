//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Expand ports → Start probe loops
//!
//! Shutdown (shutdown.rs):
//!     SIGINT received → Broadcast signal → Probe loops exit → Process ends
//! ```
//!
//! # Design Decisions
//! - Probe loops run for the process lifetime; the shutdown signal exists
//!   so tests can stop cycles deterministically
//! - No drain phase: an in-flight probe is simply abandoned

pub mod shutdown;

pub use shutdown::Shutdown;
