//! Membership reconciliation.
//!
//! # Responsibilities
//! - Translate a health transition into add/remove calls across the whole
//!   configured service set
//! - Guarantee idempotent service creation via the service registry
//!
//! # Design Decisions
//! - Every call is best-effort: a failure on one (protocol, port) is logged
//!   and never aborts the remaining calls
//! - The registry is consulted first, but the live table is re-checked
//!   before any create, so a desynced registry (crash, restart) only costs
//!   one extra existence query, never a duplicate service
//! - ensure_service holds the registry lock across check + create, making
//!   racing creates for the same service impossible

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::lvs::{ForwardMode, LbController, LvsError, SchedulingPolicy, ServicePort};
use crate::observability::metrics;

/// Applies health transitions to the external load balancer.
pub struct Reconciler {
    lb: Arc<dyn LbController>,
    ports: Vec<ServicePort>,
    /// Services this process believes exist, keyed `PROTO:port`. A cache,
    /// not the source of truth; the kernel table is.
    registry: Mutex<HashSet<String>>,
}

impl Reconciler {
    pub fn new(lb: Arc<dyn LbController>, ports: Vec<ServicePort>) -> Self {
        Self {
            lb,
            ports,
            registry: Mutex::new(HashSet::new()),
        }
    }

    /// The configured (protocol, port) set, expanded and immutable.
    pub fn ports(&self) -> &[ServicePort] {
        &self.ports
    }

    /// Registry keys recorded so far, sorted. Exposed for tests and the
    /// startup summary log.
    pub async fn registered_services(&self) -> Vec<String> {
        let registry = self.registry.lock().await;
        let mut keys: Vec<String> = registry.iter().cloned().collect();
        keys.sort();
        keys
    }

    /// Target became healthy: ensure every service exists, then register
    /// the target behind each one.
    pub async fn target_up(&self, target: &str) {
        for service in &self.ports {
            if let Err(e) = self.ensure_service(*service).await {
                tracing::warn!(
                    target = %target,
                    service = %service.key(),
                    error = %e,
                    "Failed to ensure virtual service"
                );
                metrics::record_reconcile_failure("ensure_service");
                // Without the service the add cannot be ordered after it;
                // skip this port and let a later transition retry.
                continue;
            }
            if let Err(e) = self
                .lb
                .add_real_server(*service, target, ForwardMode::Masquerade)
                .await
            {
                tracing::warn!(
                    target = %target,
                    service = %service.key(),
                    error = %e,
                    "Failed to add real server"
                );
                metrics::record_reconcile_failure("add_real_server");
            }
        }
        tracing::info!(target = %target, services = self.ports.len(), "Added target to LVS pool");
    }

    /// Target became unreachable: best-effort removal from every service.
    pub async fn target_down(&self, target: &str) {
        for service in &self.ports {
            if let Err(e) = self.lb.remove_real_server(*service, target).await {
                tracing::warn!(
                    target = %target,
                    service = %service.key(),
                    error = %e,
                    "Failed to remove real server"
                );
                metrics::record_reconcile_failure("remove_real_server");
            }
        }
        tracing::warn!(target = %target, services = self.ports.len(), "Removed target from LVS pool");
    }

    async fn ensure_service(&self, service: ServicePort) -> Result<(), LvsError> {
        let mut registry = self.registry.lock().await;
        if registry.contains(&service.key()) {
            return Ok(());
        }
        // The registry may be stale after a restart; ask the director before
        // creating.
        if !self.lb.service_exists(service).await? {
            self.lb
                .create_service(service, SchedulingPolicy::RoundRobin)
                .await?;
            tracing::info!(service = %service.key(), "Created virtual service");
        }
        registry.insert(service.key());
        Ok(())
    }
}
