// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! JSON ansible inventory generation. Grounded on
//! `ansible_manager.py::_generate_inventory_for_security`, translated
//! from the INI form it emits there into the JSON dynamic-inventory
//! form ansible-runner / ansible-playbook both accept, since this
//! engine shells out to `ansible-playbook -i <file>.json` rather than
//! driving `ansible_runner` in-process.

use fleet_core::Host;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryHost {
    pub ansible_host: String,
    pub ansible_user: String,
    pub ansible_ssh_private_key_file: String,
    pub ansible_port: u16,
    pub ansible_python_interpreter: String,
    pub ansible_ssh_common_args: String,
}

impl InventoryHost {
    fn from_host(host: &Host, ssh_port: u16) -> Self {
        Self {
            ansible_host: host.public_address.clone(),
            ansible_user: host.ssh_user.clone(),
            ansible_ssh_private_key_file: host.ssh_key_path.display().to_string(),
            ansible_port: ssh_port,
            ansible_python_interpreter: "/usr/bin/python3".to_string(),
            ansible_ssh_common_args: "-o StrictHostKeyChecking=no -o UserKnownHostsFile=/dev/null"
                .to_string(),
        }
    }
}

/// A JSON ansible dynamic inventory with a single group, `target`,
/// nested under `all` per the original's `[all.hosts]` structure
/// (`ssh_manager.py::_initialize_virtual_ssh`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub all: AllGroup,
    pub target: TargetGroup,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllGroup {
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetGroup {
    pub hosts: HashMap<String, InventoryHost>,
}

impl Inventory {
    /// Build a single-target inventory for a playbook run against one
    /// host, using `ssh_port` rather than `host.ssh_port` so callers
    /// mid-Security-Pipeline-step-3 can address the host by its
    /// pre-migration port.
    pub fn single_target(host: &Host, ssh_port: u16) -> Self {
        let mut hosts = HashMap::new();
        hosts.insert(host.name.clone(), InventoryHost::from_host(host, ssh_port));
        Self {
            all: AllGroup {
                children: vec!["target".to_string()],
            },
            target: TargetGroup { hosts },
        }
    }

    /// Build a multi-host inventory for fan-out playbooks (the
    /// Service Deployers' health-check and config-push plays).
    pub fn multi_target(hosts: &[(&Host, u16)]) -> Self {
        let mut group = HashMap::new();
        for (host, ssh_port) in hosts {
            group.insert(host.name.clone(), InventoryHost::from_host(host, *ssh_port));
        }
        Self {
            all: AllGroup {
                children: vec!["target".to_string()],
            },
            target: TargetGroup { hosts: group },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_host() -> Host {
        let mut host = Host::new("bot-1", "203.0.113.10");
        host.ssh_key_path = "/home/deploy/.ssh/id_ed25519".into();
        host
    }

    #[test]
    fn single_target_nests_under_all_and_target() {
        let inventory = Inventory::single_target(&sample_host(), 6677);
        assert_eq!(inventory.all.children, vec!["target".to_string()]);
        let entry = inventory.target.hosts.get("bot-1").expect("host present");
        assert_eq!(entry.ansible_port, 6677);
        assert_eq!(entry.ansible_host, "203.0.113.10");
    }

    #[test]
    fn single_target_uses_passed_port_not_host_port() {
        let mut host = sample_host();
        host.ssh_port = 22;
        let inventory = Inventory::single_target(&host, 6677);
        assert_eq!(inventory.target.hosts["bot-1"].ansible_port, 6677);
    }
}
