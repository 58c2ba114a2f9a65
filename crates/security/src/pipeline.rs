// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! The 7-step Security Pipeline. Each step consults a marker file on
//! the remote host before doing any work, making the pipeline
//! idempotent end to end (spec.md §4.I / §4.J "Idempotence"). Grounded
//! on `original_source/core/security_manager.py::SecurityManager`'s
//! seven public methods, with marker-file bookkeeping added here
//! since the original relies on ansible's own task idempotence rather
//! than an explicit marker.

use fleet_core::{Host, SecurityHostConfig};
use fleet_remote::{RemoteError, SessionAdapter};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const MARKER_DIR: &str = "/etc/quants-security";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityStep {
    Initial,
    FirewallBase,
    SshHardening,
    Fail2ban,
    VpnFirewall,
    ServiceFirewall,
    Verify,
}

impl SecurityStep {
    fn marker_name(self) -> Option<&'static str> {
        match self {
            SecurityStep::Initial => Some("initial_security_complete"),
            SecurityStep::FirewallBase => Some("firewall_configured"),
            SecurityStep::SshHardening => Some("ssh_hardened"),
            SecurityStep::Fail2ban => Some("fail2ban_installed"),
            SecurityStep::VpnFirewall => Some("tailscale_firewall_adjusted"),
            // Service firewall adjustment is keyed per service kind, not
            // a single marker, and Verify is never itself skippable.
            SecurityStep::ServiceFirewall => None,
            SecurityStep::Verify => None,
        }
    }

    fn playbook_file(self) -> &'static str {
        match self {
            SecurityStep::Initial => "01_initial_security.yml",
            SecurityStep::FirewallBase => "02_setup_firewall.yml",
            SecurityStep::SshHardening => "03_ssh_hardening.yml",
            SecurityStep::Fail2ban => "04_install_fail2ban.yml",
            SecurityStep::VpnFirewall => "05_adjust_for_vpn.yml",
            SecurityStep::ServiceFirewall => "06_adjust_for_service.yml",
            SecurityStep::Verify => "99_verify_security.yml",
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Rules(#[from] crate::rules::RulesProfileError),
    #[error("step {step:?} playbook failed (rc={rc}): {stderr}")]
    PlaybookFailed {
        step: SecurityStep,
        rc: i32,
        stderr: String,
    },
}

/// Outcome of one step invocation: whether work actually ran, or the
/// step short-circuited because its marker was already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Ran,
    SkippedAlreadyComplete,
}

/// Structured result of step 7 (Verify).
#[derive(Debug, Clone)]
pub struct SecurityReport {
    pub initial_security_complete: bool,
    pub firewall_configured: bool,
    pub ssh_hardened: bool,
    pub fail2ban_installed: bool,
}

/// Drives the 7-step hardening state machine against one host.
pub struct SecurityPipeline<A: SessionAdapter> {
    adapter: A,
    playbook_dir: PathBuf,
    rules_dir: PathBuf,
}

impl<A: SessionAdapter> SecurityPipeline<A> {
    pub fn new(adapter: A, playbook_dir: impl Into<PathBuf>, rules_dir: impl Into<PathBuf>) -> Self {
        Self {
            adapter,
            playbook_dir: playbook_dir.into(),
            rules_dir: rules_dir.into(),
        }
    }

    fn playbook_path(&self, step: SecurityStep) -> PathBuf {
        self.playbook_dir.join(step.playbook_file())
    }

    fn probe(host: &Host, ssh_port: u16) -> Host {
        let mut probe = host.clone();
        probe.ssh_port = ssh_port;
        probe
    }

    async fn marker_exists(
        &self,
        host: &Host,
        ssh_port: u16,
        marker: &str,
    ) -> Result<bool, PipelineError> {
        let probe = Self::probe(host, ssh_port);
        let (code, _, _) = self
            .adapter
            .exec(&probe, &format!("test -f {MARKER_DIR}/{marker}"))
            .await?;
        Ok(code == 0)
    }

    async fn write_marker(
        &self,
        host: &Host,
        ssh_port: u16,
        marker: &str,
    ) -> Result<(), PipelineError> {
        let probe = Self::probe(host, ssh_port);
        self.adapter
            .exec(&probe, &format!("mkdir -p {MARKER_DIR} && touch {MARKER_DIR}/{marker}"))
            .await?;
        Ok(())
    }

    fn base_vars(config: &SecurityHostConfig) -> HashMap<String, serde_json::Value> {
        let mut vars = HashMap::new();
        vars.insert("ssh_port".to_string(), config.target_ssh_port.into());
        vars.insert("wireguard_port".to_string(), config.wireguard_port.into());
        vars.insert("vpn_network".to_string(), config.vpn_network.clone().into());
        vars.insert("log_dropped".to_string(), config.log_dropped.into());
        vars
    }

    async fn run_marker_guarded_step(
        &self,
        host: &Host,
        connect_port: u16,
        marker_port: u16,
        step: SecurityStep,
        extra_vars: HashMap<String, serde_json::Value>,
    ) -> Result<StepOutcome, PipelineError> {
        let Some(marker) = step.marker_name() else {
            return Err(PipelineError::PlaybookFailed {
                step,
                rc: -1,
                stderr: "step carries no marker name".to_string(),
            });
        };

        if self.marker_exists(host, marker_port, marker).await? {
            return Ok(StepOutcome::SkippedAlreadyComplete);
        }

        let result = self
            .adapter
            .run_playbook(host, connect_port, &self.playbook_path(step), &extra_vars)
            .await?;

        if !result.success() {
            return Err(PipelineError::PlaybookFailed {
                step,
                rc: result.return_code,
                stderr: result.stderr,
            });
        }

        self.write_marker(host, marker_port, marker).await?;
        Ok(StepOutcome::Ran)
    }

    /// Step 1: wait for TCP reachability (assumed already established
    /// by the caller's Provision phase) and install base security
    /// tooling.
    pub async fn step1_initial(
        &self,
        host: &Host,
        config: &SecurityHostConfig,
    ) -> Result<StepOutcome, PipelineError> {
        self.run_marker_guarded_step(
            host,
            config.current_ssh_port,
            config.current_ssh_port,
            SecurityStep::Initial,
            Self::base_vars(config),
        )
        .await
    }

    /// Step 2: default-deny firewall base, opening the *target* SSH
    /// port (which may not be live yet).
    pub async fn step2_firewall_base(
        &self,
        host: &Host,
        config: &SecurityHostConfig,
    ) -> Result<StepOutcome, PipelineError> {
        self.run_marker_guarded_step(
            host,
            config.current_ssh_port,
            config.current_ssh_port,
            SecurityStep::FirewallBase,
            Self::base_vars(config),
        )
        .await
    }

    /// Step 3: atomic SSH port migration. The playbook connects on
    /// `current_ssh_port`; on success the marker and all subsequent
    /// probes use `target_ssh_port`. Returns the port the caller
    /// should now commit to its host registry.
    // Allow expect here: `SecurityStep::SshHardening` is a fixed
    // variant that always carries a marker name (see `marker_name`).
    #[allow(clippy::expect_used)]
    pub async fn step3_ssh_hardening(
        &self,
        host: &Host,
        config: &SecurityHostConfig,
    ) -> Result<(StepOutcome, u16), PipelineError> {
        let marker = SecurityStep::SshHardening.marker_name().expect("marked step");

        if self
            .marker_exists(host, config.target_ssh_port, marker)
            .await?
        {
            return Ok((StepOutcome::SkippedAlreadyComplete, config.target_ssh_port));
        }

        let result = self
            .adapter
            .run_playbook(
                host,
                config.current_ssh_port,
                &self.playbook_path(SecurityStep::SshHardening),
                &Self::base_vars(config),
            )
            .await?;

        if !result.success() {
            return Err(PipelineError::PlaybookFailed {
                step: SecurityStep::SshHardening,
                rc: result.return_code,
                stderr: result.stderr,
            });
        }

        self.write_marker(host, config.target_ssh_port, marker).await?;
        Ok((StepOutcome::Ran, config.target_ssh_port))
    }

    /// Step 4: fail2ban, connecting on the now-live target port.
    pub async fn step4_fail2ban(
        &self,
        host: &Host,
        config: &SecurityHostConfig,
    ) -> Result<StepOutcome, PipelineError> {
        self.run_marker_guarded_step(
            host,
            config.target_ssh_port,
            config.target_ssh_port,
            SecurityStep::Fail2ban,
            Self::base_vars(config),
        )
        .await
    }

    /// Step 5: VPN-aware firewall adjustment. Not gated on a
    /// per-invocation marker beyond the shared one -- re-running is
    /// an idempotent ansible task set in the original, preserved here
    /// the same way.
    pub async fn step5_vpn_firewall(
        &self,
        host: &Host,
        config: &SecurityHostConfig,
    ) -> Result<StepOutcome, PipelineError> {
        self.run_marker_guarded_step(
            host,
            config.target_ssh_port,
            config.target_ssh_port,
            SecurityStep::VpnFirewall,
            Self::base_vars(config),
        )
        .await
    }

    /// Step 6: service-kind-specific firewall merge. The instance's
    /// live SSH port always overrides any `ssh_port` the rules file
    /// carries (spec.md §4.I) -- an operator lockout must not be
    /// possible via a rules-profile typo.
    pub async fn step6_service_firewall(
        &self,
        host: &Host,
        config: &SecurityHostConfig,
        service_kind_slug: &str,
    ) -> Result<StepOutcome, PipelineError> {
        let rules = crate::rules::RulesProfile::load(&self.rules_dir, service_kind_slug)?;

        let mut vars = Self::base_vars(config);
        vars.insert("service_type".to_string(), service_kind_slug.into());
        vars.insert(
            "vpn_only_ports".to_string(),
            serde_json::to_value(&rules.vpn_only_ports).unwrap_or_default(),
        );
        vars.insert(
            "public_ports".to_string(),
            serde_json::to_value(&rules.public_ports).unwrap_or_default(),
        );
        // rules.ssh_port is intentionally discarded: the live port
        // from `config` was already set into `vars` by `base_vars`
        // and must not be overwritten by the profile file.

        let result = self
            .adapter
            .run_playbook(
                host,
                config.target_ssh_port,
                &self.playbook_path(SecurityStep::ServiceFirewall),
                &vars,
            )
            .await?;

        if !result.success() {
            return Err(PipelineError::PlaybookFailed {
                step: SecurityStep::ServiceFirewall,
                rc: result.return_code,
                stderr: result.stderr,
            });
        }
        Ok(StepOutcome::Ran)
    }

    /// Step 7: re-inspect every marker and return a structured
    /// report. Always runs, even if every marker is already present.
    pub async fn step7_verify(
        &self,
        host: &Host,
        config: &SecurityHostConfig,
    ) -> Result<SecurityReport, PipelineError> {
        let port = config.target_ssh_port;
        Ok(SecurityReport {
            initial_security_complete: self
                .marker_exists(host, port, "initial_security_complete")
                .await
                .unwrap_or(false),
            firewall_configured: self
                .marker_exists(host, port, "firewall_configured")
                .await
                .unwrap_or(false),
            ssh_hardened: self.marker_exists(host, port, "ssh_hardened").await?,
            fail2ban_installed: self
                .marker_exists(host, port, "fail2ban_installed")
                .await
                .unwrap_or(false),
        })
    }
}

/// Path under which a marker is expected to exist, exposed for tests
/// and diagnostics that need to assert on the same convention the
/// pipeline itself uses.
pub fn marker_path(marker: &str) -> PathBuf {
    Path::new(MARKER_DIR).join(marker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::{Host, SecurityHostConfig};
    use fleet_remote::fake::FakeSessionAdapter;
    use tempfile::tempdir;

    fn sample_host() -> Host {
        let mut host = Host::new("bot-1", "203.0.113.10");
        host.ssh_port = 22;
        host
    }

    fn sample_config() -> SecurityHostConfig {
        SecurityHostConfig {
            instance_ip: "203.0.113.10".to_string(),
            current_ssh_port: 22,
            target_ssh_port: 6677,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn step1_runs_playbook_and_writes_marker_when_absent() {
        let adapter = FakeSessionAdapter::new();
        adapter.set_exec_response("bot-1", 1, "", "");
        let playbooks = tempdir().expect("tempdir");
        let rules = tempdir().expect("tempdir");
        let pipeline = SecurityPipeline::new(adapter.clone(), playbooks.path(), rules.path());
        let host = sample_host();
        let config = sample_config();

        let outcome = pipeline.step1_initial(&host, &config).await.expect("step1");
        assert_eq!(outcome, StepOutcome::Ran);

        let calls = adapter.calls();
        let wrote_marker = calls.iter().any(|call| matches!(
            call,
            fleet_remote::fake::SessionCall::Exec { command, .. }
                if command.contains("initial_security_complete")
        ));
        assert!(wrote_marker);
    }

    #[tokio::test]
    async fn step_is_skipped_when_marker_already_present() {
        let adapter = FakeSessionAdapter::new();
        adapter.set_exec_response("bot-1", 0, "", "");
        let playbooks = tempdir().expect("tempdir");
        let rules = tempdir().expect("tempdir");
        let pipeline = SecurityPipeline::new(adapter.clone(), playbooks.path(), rules.path());
        let host = sample_host();
        let config = sample_config();

        let outcome = pipeline.step1_initial(&host, &config).await.expect("step1");
        assert_eq!(outcome, StepOutcome::SkippedAlreadyComplete);

        let ran_playbook = adapter
            .calls()
            .iter()
            .any(|call| matches!(call, fleet_remote::fake::SessionCall::RunPlaybook { .. }));
        assert!(!ran_playbook);
    }

    #[tokio::test]
    async fn step3_returns_target_port_on_success() {
        let adapter = FakeSessionAdapter::new();
        adapter.set_exec_response("bot-1", 1, "", "");
        let playbooks = tempdir().expect("tempdir");
        let rules = tempdir().expect("tempdir");
        let pipeline = SecurityPipeline::new(adapter, playbooks.path(), rules.path());
        let host = sample_host();
        let config = sample_config();

        let (outcome, port) = pipeline.step3_ssh_hardening(&host, &config).await.expect("step3");
        assert_eq!(outcome, StepOutcome::Ran);
        assert_eq!(port, 6677);
    }

    #[tokio::test]
    async fn step6_overrides_profile_ssh_port_with_live_port() {
        let adapter = FakeSessionAdapter::new();
        let playbooks = tempdir().expect("tempdir");
        let rules = tempdir().expect("tempdir");
        std::fs::write(
            rules.path().join("monitor.yml"),
            "ssh_port: 1\npublic_ports:\n  - port: 3000\n",
        )
        .expect("write");
        let pipeline = SecurityPipeline::new(adapter, playbooks.path(), rules.path());
        let host = sample_host();
        let config = sample_config();

        let outcome = pipeline
            .step6_service_firewall(&host, &config, "monitor")
            .await
            .expect("step6");
        assert_eq!(outcome, StepOutcome::Ran);
    }
}
