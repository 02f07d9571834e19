//! ipvsadm-backed load-balancer controller.
//!
//! # Responsibilities
//! - Translate controller calls into ipvsadm invocations against the
//!   configured virtual IP
//! - Tolerate benign failures so add/create/remove stay idempotent
//!
//! # Design Decisions
//! - "already exists" and "no such" outcomes are success: the table is
//!   already in the desired state
//! - Existence checks parse `ipvsadm -Ln` rather than trusting any cache

use async_trait::async_trait;
use tokio::process::Command;

use crate::lvs::{ForwardMode, LbController, LvsError, Protocol, SchedulingPolicy, ServicePort};

const IPVSADM: &str = "ipvsadm";

fn protocol_flag(protocol: Protocol) -> &'static str {
    match protocol {
        Protocol::Tcp => "-t",
        Protocol::Udp => "-u",
    }
}

fn policy_arg(policy: SchedulingPolicy) -> &'static str {
    match policy {
        SchedulingPolicy::RoundRobin => "rr",
    }
}

fn mode_flag(mode: ForwardMode) -> &'static str {
    match mode {
        ForwardMode::Masquerade => "-m",
    }
}

/// Whether stderr describes a state the table is already in.
fn is_benign(stderr: &str, benign_markers: &[&str]) -> bool {
    benign_markers.iter().any(|marker| stderr.contains(marker))
}

/// Whether an `ipvsadm -Ln` listing contains the given virtual service.
fn table_has_service(listing: &str, protocol: Protocol, virtual_addr: &str) -> bool {
    let proto = protocol.to_string();
    listing.lines().any(|line| {
        let mut fields = line.split_whitespace();
        fields.next() == Some(proto.as_str()) && fields.next() == Some(virtual_addr)
    })
}

/// Drives the kernel IPVS table through the `ipvsadm` CLI.
pub struct IpvsadmController {
    virtual_ip: String,
}

impl IpvsadmController {
    pub fn new(virtual_ip: impl Into<String>) -> Self {
        Self {
            virtual_ip: virtual_ip.into(),
        }
    }

    fn virtual_addr(&self, port: u16) -> String {
        format!("{}:{}", self.virtual_ip, port)
    }

    async fn run(&self, args: &[&str]) -> Result<std::process::Output, LvsError> {
        Command::new(IPVSADM)
            .args(args)
            .output()
            .await
            .map_err(|source| LvsError::Spawn {
                program: IPVSADM.to_string(),
                source,
            })
    }

    /// Run a mutation, treating listed stderr markers as success.
    async fn run_tolerant(&self, args: &[&str], benign_markers: &[&str]) -> Result<(), LvsError> {
        let output = self.run(args).await?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if is_benign(&stderr, benign_markers) {
            tracing::debug!(args = ?args, stderr = %stderr.trim(), "ipvsadm call was a no-op");
            return Ok(());
        }
        Err(LvsError::CommandFailed {
            program: IPVSADM.to_string(),
            code: output.status.code(),
            stderr,
        })
    }
}

#[async_trait]
impl LbController for IpvsadmController {
    async fn service_exists(&self, service: ServicePort) -> Result<bool, LvsError> {
        let output = self.run(&["-Ln"]).await?;
        if !output.status.success() {
            return Err(LvsError::CommandFailed {
                program: IPVSADM.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        let listing = String::from_utf8_lossy(&output.stdout);
        Ok(table_has_service(
            &listing,
            service.protocol,
            &self.virtual_addr(service.port),
        ))
    }

    async fn create_service(
        &self,
        service: ServicePort,
        policy: SchedulingPolicy,
    ) -> Result<(), LvsError> {
        let addr = self.virtual_addr(service.port);
        self.run_tolerant(
            &[
                "-A",
                protocol_flag(service.protocol),
                &addr,
                "-s",
                policy_arg(policy),
            ],
            &["already exists", "File exists"],
        )
        .await
    }

    async fn add_real_server(
        &self,
        service: ServicePort,
        target: &str,
        mode: ForwardMode,
    ) -> Result<(), LvsError> {
        let addr = self.virtual_addr(service.port);
        let real = format!("{}:{}", target, service.port);
        self.run_tolerant(
            &[
                "-a",
                protocol_flag(service.protocol),
                &addr,
                "-r",
                &real,
                mode_flag(mode),
            ],
            &["already exists", "File exists"],
        )
        .await
    }

    async fn remove_real_server(
        &self,
        service: ServicePort,
        target: &str,
    ) -> Result<(), LvsError> {
        let addr = self.virtual_addr(service.port);
        let real = format!("{}:{}", target, service.port);
        self.run_tolerant(
            &["-d", protocol_flag(service.protocol), &addr, "-r", &real],
            &["No such service", "No such destination"],
        )
        .await
    }
}
