//! Shared mock collaborators for integration tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use lvs_monitor::lvs::{ForwardMode, LbController, LvsError, SchedulingPolicy, ServicePort};
use lvs_monitor::probe::Prober;

/// Records every administrative call in order. Supports pre-existing
/// services, per-service remove failures, and rejection of duplicate adds.
#[derive(Default)]
pub struct RecordingLb {
    calls: Mutex<Vec<String>>,
    existing: Mutex<HashSet<String>>,
    fail_removes: Mutex<HashSet<String>>,
    added: Mutex<HashSet<String>>,
    reject_duplicate_adds: bool,
}

#[allow(dead_code)]
impl RecordingLb {
    pub fn new() -> Self {
        Self::default()
    }

    /// A controller that errors when the same (service, target) pair is
    /// added twice, the way ipvsadm rejects duplicate destinations.
    pub fn rejecting_duplicate_adds() -> Self {
        Self {
            reject_duplicate_adds: true,
            ..Self::default()
        }
    }

    /// Seed a service that "the kernel" already has but the registry does not.
    pub async fn mark_existing(&self, service: ServicePort) {
        self.existing.lock().await.insert(service.key());
    }

    /// Make removes for this service fail.
    pub async fn fail_removes_for(&self, service: ServicePort) {
        self.fail_removes.lock().await.insert(service.key());
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub async fn count_calls(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl LbController for RecordingLb {
    async fn service_exists(&self, service: ServicePort) -> Result<bool, LvsError> {
        self.calls
            .lock()
            .await
            .push(format!("exists {}", service.key()));
        Ok(self.existing.lock().await.contains(&service.key()))
    }

    async fn create_service(
        &self,
        service: ServicePort,
        _policy: SchedulingPolicy,
    ) -> Result<(), LvsError> {
        self.calls
            .lock()
            .await
            .push(format!("create {}", service.key()));
        self.existing.lock().await.insert(service.key());
        Ok(())
    }

    async fn add_real_server(
        &self,
        service: ServicePort,
        target: &str,
        _mode: ForwardMode,
    ) -> Result<(), LvsError> {
        self.calls
            .lock()
            .await
            .push(format!("add {} {}", service.key(), target));
        if self.reject_duplicate_adds {
            let pair = format!("{} {}", service.key(), target);
            if !self.added.lock().await.insert(pair) {
                return Err(LvsError::CommandFailed {
                    program: "ipvsadm".to_string(),
                    code: Some(255),
                    stderr: "Destination already exists".to_string(),
                });
            }
        }
        Ok(())
    }

    async fn remove_real_server(
        &self,
        service: ServicePort,
        target: &str,
    ) -> Result<(), LvsError> {
        self.calls
            .lock()
            .await
            .push(format!("remove {} {}", service.key(), target));
        if self.fail_removes.lock().await.contains(&service.key()) {
            return Err(LvsError::CommandFailed {
                program: "ipvsadm".to_string(),
                code: Some(2),
                stderr: "Operation not permitted".to_string(),
            });
        }
        Ok(())
    }
}

/// Prober that replays a scripted sample sequence per target, with optional
/// artificial latency jitter. Once a script is exhausted the probe parks
/// until the loop is shut down, so tests see a deterministic history.
#[derive(Default)]
pub struct ScriptedProber {
    scripts: Mutex<HashMap<String, VecDeque<u8>>>,
    jitter_ms: u64,
    probes_started: AtomicU64,
}

#[allow(dead_code)]
impl ScriptedProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jitter(jitter_ms: u64) -> Self {
        Self {
            jitter_ms,
            ..Self::default()
        }
    }

    pub async fn script(&self, target: &str, samples: &[u8]) {
        self.scripts
            .lock()
            .await
            .insert(target.to_string(), samples.iter().copied().collect());
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, target: &str) -> u8 {
        let next = self
            .scripts
            .lock()
            .await
            .get_mut(target)
            .and_then(|queue| queue.pop_front());

        match next {
            Some(sample) => {
                if self.jitter_ms > 0 {
                    let n = self.probes_started.fetch_add(1, Ordering::Relaxed);
                    let delay = (n * 13) % self.jitter_ms + 1;
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                sample
            }
            None => std::future::pending().await,
        }
    }
}
