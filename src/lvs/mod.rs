//! LVS membership subsystem.
//!
//! # Data Flow
//! ```text
//! Health transition (scheduler)
//!     → reconcile.rs (translate transition into membership mutations)
//!     → LbController trait
//!         → ipvsadm.rs (production: shell out to ipvsadm)
//!         → test doubles (integration tests)
//! ```
//!
//! # Design Decisions
//! - The controller trait only specifies call contracts; whether the
//!   implementation is a subprocess, a netlink binding, or a remote API is
//!   its own business
//! - All mutations are fire-and-forget: results are logged, never retried
//! - The kernel IPVS table is the source of truth; the local registry is
//!   only a cache to avoid duplicate create calls

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

pub mod ipvsadm;
pub mod reconcile;

pub use ipvsadm::IpvsadmController;
pub use reconcile::Reconciler;

/// Transport protocol of a virtual service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
        })
    }
}

/// One (protocol, port) pair exposed by the director.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServicePort {
    pub protocol: Protocol,
    pub port: u16,
}

impl ServicePort {
    pub fn tcp(port: u16) -> Self {
        Self {
            protocol: Protocol::Tcp,
            port,
        }
    }

    pub fn udp(port: u16) -> Self {
        Self {
            protocol: Protocol::Udp,
            port,
        }
    }

    /// Composite registry key, e.g. `TCP:443`.
    pub fn key(&self) -> String {
        format!("{}:{}", self.protocol, self.port)
    }
}

/// Scheduling algorithm assigned when a virtual service is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingPolicy {
    /// Plain round-robin, the director default the monitor mirrors.
    RoundRobin,
}

/// Packet forwarding method for a real server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardMode {
    /// NAT / masquerading.
    Masquerade,
}

/// Error from a load-balancer administrative call.
#[derive(Debug, Error)]
pub enum LvsError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {code:?}: {stderr}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Administrative interface of the external load balancer.
///
/// Implementations must make create/add idempotent in effect: re-creating an
/// existing service or re-adding a present real server is a no-op, not an
/// error surfaced to the caller.
#[async_trait]
pub trait LbController: Send + Sync {
    /// Whether the director already exposes this virtual service.
    async fn service_exists(&self, service: ServicePort) -> Result<bool, LvsError>;

    /// Create a virtual service with the given scheduling policy.
    async fn create_service(
        &self,
        service: ServicePort,
        policy: SchedulingPolicy,
    ) -> Result<(), LvsError>;

    /// Register `target` as a real server behind the service.
    async fn add_real_server(
        &self,
        service: ServicePort,
        target: &str,
        mode: ForwardMode,
    ) -> Result<(), LvsError>;

    /// Deregister `target` from the service.
    async fn remove_real_server(&self, service: ServicePort, target: &str)
        -> Result<(), LvsError>;
}
