// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! Per-host security configuration, grounded on
//! `original_source/core/security_manager.py::_get_base_vars` /
//! `_validate_config`.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SecurityHostConfig {
    pub instance_ip: String,
    pub ssh_user: String,
    pub ssh_key_path: PathBuf,
    /// The port the current connection must use to drive a step.
    pub current_ssh_port: u16,
    /// The port Secure.3 (SSH hardening) migrates the daemon to.
    pub target_ssh_port: u16,
    pub vpn_network: String,
    pub wireguard_port: u16,
    pub log_dropped: bool,
}

impl Default for SecurityHostConfig {
    fn default() -> Self {
        Self {
            instance_ip: String::new(),
            ssh_user: "ubuntu".to_string(),
            ssh_key_path: PathBuf::new(),
            current_ssh_port: 22,
            target_ssh_port: 6677,
            vpn_network: "10.0.0.0/24".to_string(),
            wireguard_port: 51820,
            log_dropped: false,
        }
    }
}
