//! LVS Health Monitor daemon.
//!
//! Keeps the kernel IPVS real-server set consistent with the observed
//! reachability of the configured backend nodes.
//!
//! # Architecture Overview
//!
//! ```text
//!              ┌──────────────────────────────────────────────────────┐
//!              │                    LVS MONITOR                        │
//!              │                                                       │
//!   Backends   │  ┌─────────┐    ┌──────────┐    ┌────────────────┐   │
//!   ◀── ping ──┼──│  probe  │───▶│  health  │───▶│   scheduler    │   │
//!              │  │ (ping)  │    │window+fsm│    │ loop per target│   │
//!              │  └─────────┘    └──────────┘    └───────┬────────┘   │
//!              │                                          │ transition │
//!              │                                          ▼            │
//!              │                                  ┌──────────────┐     │
//!   IPVS table │                                  │ lvs/reconcile│     │
//!   ◀─ipvsadm──┼──────────────────────────────────│ + registry   │     │
//!              │                                  └──────────────┘     │
//!              │  ┌────────────────────────────────────────────────┐   │
//!              │  │  config  │  lifecycle  │  observability        │   │
//!              │  └────────────────────────────────────────────────┘   │
//!              └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use lvs_monitor::config::{load_config, ports};
use lvs_monitor::lifecycle::Shutdown;
use lvs_monitor::lvs::{IpvsadmController, Reconciler, ServicePort};
use lvs_monitor::observability::{logging, metrics};
use lvs_monitor::probe::PingProber;
use lvs_monitor::scheduler::ProbeScheduler;

/// Health monitor that reconciles LVS membership with backend reachability.
#[derive(Parser, Debug)]
#[command(name = "lvs-monitor", version)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "lvs-monitor.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        virtual_ip = %config.virtual_ip,
        backends = config.backends.len(),
        loss_threshold = config.health.loss_threshold,
        window_seconds = config.health.window_seconds,
        "lvs-monitor starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Expand port specs once; the service set is immutable for the
    // process lifetime.
    let mut services: Vec<ServicePort> = Vec::new();
    for port in ports::expand_specs(&config.tcp_ports)? {
        services.push(ServicePort::tcp(port));
    }
    for port in ports::expand_specs(&config.udp_ports)? {
        services.push(ServicePort::udp(port));
    }
    tracing::info!(services = services.len(), "Service set expanded");

    let prober = Arc::new(PingProber::new(
        config.health.ping_count,
        config.health.ping_timeout_secs,
    ));
    let lb = Arc::new(IpvsadmController::new(config.virtual_ip.clone()));
    let reconciler = Arc::new(Reconciler::new(lb, services));
    let scheduler = ProbeScheduler::new(prober, reconciler, config.health.clone(), &config.backends);

    let shutdown = Shutdown::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            signal_shutdown.trigger();
        }
    });

    scheduler.run(&shutdown).await;

    tracing::info!("Shutdown complete");
    Ok(())
}
