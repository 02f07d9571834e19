//! Reachability probing.
//!
//! # Responsibilities
//! - Define the probe contract the scheduler consumes
//! - Provide the production ICMP ping implementation (ping.rs)
//!
//! # Design Decisions
//! - A probe never fails: timeout, unresolvable name, and unparseable
//!   output all collapse to the full-loss sentinel
//! - The trait seam keeps the core independent of the probing mechanism
//!   (subprocess today; a raw-socket or library probe would slot in)

use async_trait::async_trait;

pub mod ping;

pub use ping::PingProber;

/// Sentinel loss value: total loss, or the probe could not be measured.
pub const FULL_LOSS: u8 = 100;

/// One reachability measurement for a single target.
///
/// Implementations must be infallible: any error condition is reported as
/// [`FULL_LOSS`], never as a panic or an `Err`.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe `target` once and return its packet loss percentage in [0, 100].
    async fn probe(&self, target: &str) -> u8;
}
