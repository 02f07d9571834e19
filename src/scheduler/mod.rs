//! Probe scheduling.
//!
//! # Data Flow
//! ```text
//! One loop per target, every interval tick:
//!     Prober.probe()            (no lock held; only blocking point)
//!     → lock per-target state
//!     → LossWindow.record() → average() → evaluate()
//!     → [on transition] Reconciler.target_up/target_down()
//!     → unlock
//! ```
//!
//! # Design Decisions
//! - Degree of parallelism equals the number of targets; no pooling
//! - The tick interval self-corrects: a slow cycle starts the next one
//!   immediately instead of bursting to catch up
//! - Reconciliation runs while the per-target lock is held, so two
//!   transitions for the same target can never race each other into an
//!   inconsistent LVS state; different targets reconcile in parallel

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinSet;
use tokio::time::{self, MissedTickBehavior};

use crate::config::HealthConfig;
use crate::health::{evaluate, HealthState, LossWindow};
use crate::lifecycle::Shutdown;
use crate::lvs::Reconciler;
use crate::observability::metrics;
use crate::probe::Prober;

/// Mutable per-target record: loss history plus committed health state.
struct TargetState {
    window: LossWindow,
    state: HealthState,
}

/// Point-in-time view of one target's health.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSnapshot {
    pub samples: usize,
    pub average: u8,
    pub state: HealthState,
}

/// Drives one independent probe-evaluate-reconcile loop per target.
pub struct ProbeScheduler {
    prober: Arc<dyn Prober>,
    reconciler: Arc<Reconciler>,
    settings: HealthConfig,
    targets: HashMap<String, Arc<Mutex<TargetState>>>,
}

impl ProbeScheduler {
    pub fn new(
        prober: Arc<dyn Prober>,
        reconciler: Arc<Reconciler>,
        settings: HealthConfig,
        backends: &[String],
    ) -> Self {
        let targets = backends
            .iter()
            .map(|backend| {
                let state = TargetState {
                    window: LossWindow::new(settings.window_seconds),
                    state: HealthState::Unknown,
                };
                (backend.clone(), Arc::new(Mutex::new(state)))
            })
            .collect();

        Self {
            prober,
            reconciler,
            settings,
            targets,
        }
    }

    /// Run every target loop until the shutdown signal fires.
    pub async fn run(&self, shutdown: &Shutdown) {
        let mut loops = JoinSet::new();
        for (target, state) in &self.targets {
            loops.spawn(Self::run_target(
                self.prober.clone(),
                self.reconciler.clone(),
                self.settings.clone(),
                target.clone(),
                state.clone(),
                shutdown.subscribe(),
            ));
        }
        tracing::info!(
            targets = self.targets.len(),
            interval_secs = self.settings.interval_secs,
            "Probe scheduler started"
        );
        while loops.join_next().await.is_some() {}
    }

    /// Current history length, average, and state for a target.
    pub async fn snapshot(&self, target: &str) -> Option<TargetSnapshot> {
        let state = self.targets.get(target)?;
        let guard = state.lock().await;
        Some(TargetSnapshot {
            samples: guard.window.len(),
            average: guard.window.average(),
            state: guard.state,
        })
    }

    async fn run_target(
        prober: Arc<dyn Prober>,
        reconciler: Arc<Reconciler>,
        settings: HealthConfig,
        target: String,
        state: Arc<Mutex<TargetState>>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        let cycles = async {
            let mut ticker = time::interval(Duration::from_secs(settings.interval_secs));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                Self::cycle(prober.as_ref(), &reconciler, &settings, &target, &state).await;
            }
        };

        tokio::select! {
            _ = cycles => {}
            _ = shutdown.recv() => {
                tracing::debug!(target = %target, "Probe loop stopping");
            }
        }
    }

    async fn cycle(
        prober: &dyn Prober,
        reconciler: &Reconciler,
        settings: &HealthConfig,
        target: &str,
        state: &Mutex<TargetState>,
    ) {
        // Probe before taking the lock; the slow external call must not
        // serialize against this target's own bookkeeping.
        let loss = prober.probe(target).await;
        metrics::record_probe(target);

        let mut guard = state.lock().await;
        guard.window.record(loss);
        let average = guard.window.average();

        tracing::info!(
            target = %target,
            latest = loss,
            average = average,
            window = settings.window_seconds,
            state = %guard.state,
            "Probe cycle"
        );

        let (next, transitioned) = evaluate(average, guard.state, settings.loss_threshold);
        if !transitioned {
            return;
        }

        guard.state = next;
        metrics::record_backend_health(target, next == HealthState::Up);

        // Reconcile while still holding the lock: the state commit and the
        // membership mutation form one critical section per target.
        match next {
            HealthState::Up => reconciler.target_up(target).await,
            HealthState::Down => reconciler.target_down(target).await,
            // evaluate never yields Unknown as a next state.
            HealthState::Unknown => {}
        }
    }
}
