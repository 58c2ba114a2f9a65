// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! Loads the Environment Spec YAML document (spec.md §6 "Environment")
//! into `fleet_core::EnvironmentSpec`, then runs the cross-reference
//! validation the original's `DeploymentOrchestrator` performed ad hoc
//! at the top of `deploy()` before fanning out to any manager
//! (`original_source/tests/acceptance/test_environment_deployment.py`):
//! every `security.instances` entry and every service's `target` must
//! name a host declared under `infrastructure`.

use fleet_core::EnvironmentSpec;
use std::path::Path;

use crate::error::ConfigError;

/// Parse and validate an Environment Spec from a YAML file.
pub fn load(path: &Path) -> Result<EnvironmentSpec, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let spec: EnvironmentSpec =
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    validate(&spec)?;
    Ok(spec)
}

/// Cross-reference validation: every host name the `security` and
/// `services` sections mention must be declared in `infrastructure`.
pub fn validate(spec: &EnvironmentSpec) -> Result<(), ConfigError> {
    if spec.name.trim().is_empty() {
        return Err(ConfigError::Invalid("environment name is required".to_string()));
    }

    for instance in &spec.security.instances {
        if spec.find_infrastructure_host(instance).is_none() {
            return Err(ConfigError::Invalid(format!(
                "security.instances references unknown host '{instance}'"
            )));
        }
    }

    for item in &spec.services {
        if spec.find_infrastructure_host(&item.target).is_none() {
            return Err(ConfigError::Invalid(format!(
                "service {:?} targets unknown host '{}'",
                item.kind, item.target
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_yaml(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("environment.yml");
        std::fs::write(&path, body).expect("write");
        path
    }

    const VALID: &str = r#"
name: prod-fleet
region: ap-northeast-1
infrastructure:
  - name: bot-1
    blueprint: ubuntu-22
    bundle: medium
security:
  instances: [bot-1]
  ssh:
    port: 6677
    key_path: /home/deploy/.ssh/id_ed25519
    user: ubuntu
services:
  - type: monitor
    target: bot-1
"#;

    #[test]
    fn loads_well_formed_environment() {
        let dir = tempdir().expect("tempdir");
        let path = write_yaml(dir.path(), VALID);
        let spec = load(&path).expect("load");
        assert_eq!(spec.name, "prod-fleet");
        assert_eq!(spec.infrastructure.len(), 1);
    }

    #[test]
    fn rejects_security_instance_with_no_matching_host() {
        let dir = tempdir().expect("tempdir");
        let body = VALID.replace("instances: [bot-1]", "instances: [bot-2]");
        let path = write_yaml(dir.path(), &body);
        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_service_targeting_unknown_host() {
        let dir = tempdir().expect("tempdir");
        let body = VALID.replace("target: bot-1", "target: bot-2");
        let path = write_yaml(dir.path(), &body);
        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load(Path::new("/nonexistent/environment.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
