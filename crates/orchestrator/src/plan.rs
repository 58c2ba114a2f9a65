// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! Phase 1, Plan: a pure function from an `EnvironmentSpec` to the
//! ordered list of work items every later phase will execute. Grounded
//! on `oj-daemon::lifecycle/reconcile.rs`'s "enumerate everything
//! up-front, then act" shape, here applied to dry-run emission instead
//! of crash recovery (spec.md §4.J phase 1: "emit the plan and stop").

use fleet_core::EnvironmentSpec;
use serde::Serialize;

/// One row of the emitted plan: which phase an item belongs to, plus a
/// human-readable description of the work.
#[derive(Debug, Clone, Serialize)]
pub struct PlanItem {
    pub phase: &'static str,
    pub description: String,
}

/// The full ordered plan for one Orchestrator run -- phases in
/// execution order, items within a phase in spec order.
#[derive(Debug, Clone, Serialize, Default)]
pub struct Plan {
    pub items: Vec<PlanItem>,
}

/// Enumerate every work item the later phases will act on, without
/// performing any of it. Pure function of the spec: no I/O, no clock.
pub fn build_plan(spec: &EnvironmentSpec) -> Plan {
    let mut items = Vec::new();

    for host in &spec.infrastructure {
        items.push(PlanItem {
            phase: "provision",
            description: format!(
                "provision host '{}' (blueprint={}, bundle={})",
                host.name, host.blueprint, host.bundle
            ),
        });
    }

    for instance in &spec.security.instances {
        items.push(PlanItem {
            phase: "secure",
            description: format!(
                "harden host '{}' (target ssh port {})",
                instance, spec.security.ssh.port
            ),
        });
    }
    if spec.security.vpn_network.is_some() {
        for instance in &spec.security.instances {
            items.push(PlanItem {
                phase: "secure",
                description: format!("apply VPN firewall adjustment to host '{instance}'"),
            });
        }
    }

    for item in &spec.services {
        items.push(PlanItem {
            phase: "service",
            description: format!("deploy {:?} to host '{}'", item.kind, item.target),
        });
    }

    items.push(PlanItem {
        phase: "summarize",
        description: "aggregate per-host, per-phase results".to_string(),
    });

    Plan { items }
}
