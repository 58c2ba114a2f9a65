// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! The declarative Environment Spec: the root input to one Orchestrator
//! run, and the Service Work Item it owns.

use crate::security::SecurityHostConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The kind of service a Service Work Item deploys. New kinds are
/// added here and in `fleet-services`'s registry together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    Monitor,
    DataCollector,
    Freqtrade,
}

impl ServiceKind {
    /// The slug used for security-rules-profile filenames and
    /// `adjust_firewall_for_service` invocations (spec.md §4.I step 6).
    pub fn profile_slug(self) -> &'static str {
        match self {
            ServiceKind::Monitor => "monitor",
            ServiceKind::DataCollector => "data-collector",
            ServiceKind::Freqtrade => "execution",
        }
    }
}

/// A single infrastructure host spec inside `infrastructure:` -
/// consumed by the provisioner hook (external collaborator); the
/// Orchestrator only needs the logical name and blueprint/bundle
/// tags to hand to that hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfrastructureHostSpec {
    pub name: String,
    pub blueprint: String,
    pub bundle: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub static_ip: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// One {kind, target, config} triple consumed by exactly one Service
/// Deployer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceWorkItem {
    #[serde(rename = "type")]
    pub kind: ServiceKind,
    pub target: String,
    #[serde(default)]
    pub config: serde_json::Value,
}

/// The declarative root of one Orchestrator run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub region: String,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    pub infrastructure: Vec<InfrastructureHostSpec>,
    pub security: SecuritySection,
    #[serde(default)]
    pub services: Vec<ServiceWorkItem>,
}

/// The `security:` block: which hosts to harden plus the shared
/// SSH/VPN knobs applied to all of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecuritySection {
    pub instances: Vec<String>,
    pub ssh: SshConfig,
    #[serde(default)]
    pub vpn_network: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshConfig {
    pub port: u16,
    pub key_path: String,
    pub user: String,
}

impl EnvironmentSpec {
    /// Resolve a host spec by name, returning `None` if the security
    /// or service sections reference a host absent from
    /// `infrastructure`.
    pub fn find_infrastructure_host(&self, name: &str) -> Option<&InfrastructureHostSpec> {
        self.infrastructure.iter().find(|h| h.name == name)
    }

    /// Build the per-host `SecurityHostConfig` for a named host,
    /// carrying this spec's shared SSH/VPN knobs.
    pub fn security_config_for(&self, instance_ip: &str) -> SecurityHostConfig {
        SecurityHostConfig {
            instance_ip: instance_ip.to_string(),
            ssh_user: self.security.ssh.user.clone(),
            ssh_key_path: self.security.ssh.key_path.clone().into(),
            current_ssh_port: 22,
            target_ssh_port: self.security.ssh.port,
            vpn_network: self
                .security
                .vpn_network
                .clone()
                .unwrap_or_else(|| "10.0.0.0/24".to_string()),
            wireguard_port: 51820,
            log_dropped: false,
        }
    }
}
