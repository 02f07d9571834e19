//! Health evaluation subsystem.
//!
//! # Data Flow
//! ```text
//! Probe result (loss %)
//!     → window.rs (record into sliding window, compute integer average)
//!     → state.rs (compare average to threshold, decide transition)
//!     → reconciler (only on transition)
//! ```
//!
//! # Design Decisions
//! - Window and state machine are pure data structures; the scheduler owns
//!   the lock that makes record → average → evaluate atomic per target
//! - A probe that cannot be measured counts as 100% loss, so probe failure
//!   and true total loss are indistinguishable by design

pub mod state;
pub mod window;

pub use state::{evaluate, HealthState};
pub use window::LossWindow;
