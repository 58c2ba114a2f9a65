//! Test helpers for the fleet CLI's black-box acceptance specs.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Resolves the path to the `fleet` binary built alongside these tests.
fn binary_path() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let standard = manifest_dir.join("target/debug/fleet");
    if standard.exists() {
        return standard;
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join("fleet");
            if fallback.exists() {
                return fallback;
            }
        }
    }
    standard
}

pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

pub struct CliBuilder {
    args: Vec<String>,
    dir: Option<PathBuf>,
}

impl CliBuilder {
    fn new() -> Self {
        Self { args: Vec::new(), dir: None }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    fn command(self) -> Command {
        let mut cmd = Command::new(binary_path());
        cmd.args(&self.args);
        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    pub fn run(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("fleet binary should run");
        RunAssert { output }
    }

    pub fn passes(self) -> RunAssert {
        let assert = self.run();
        assert!(
            assert.output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            assert.output.status.code(),
            assert.stdout(),
            assert.stderr()
        );
        assert
    }

    pub fn fails(self) -> RunAssert {
        let assert = self.run();
        assert!(
            !assert.output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            assert.stdout(),
            assert.stderr()
        );
        assert
    }

    pub fn fails_with_code(self, code: i32) -> RunAssert {
        let assert = self.fails();
        assert_eq!(
            assert.output.status.code(),
            Some(code),
            "stdout: {}\nstderr: {}",
            assert.stdout(),
            assert.stderr()
        );
        assert
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(expected), "stdout does not contain '{expected}'\nstdout: {stdout}");
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(expected), "stderr does not contain '{expected}'\nstderr: {stderr}");
        self
    }
}

/// A well-formed Environment Spec with one host, security targeting
/// it, and one monitor service -- the minimal shape every phase
/// enumerates something for.
pub const VALID_ENVIRONMENT: &str = r#"
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

/// A minimal, valid data-lake config with one enabled profile.
pub const VALID_DATA_LAKE: &str = r#"
data_lake:
  root_dir: "{ROOT}"
  profiles:
    gate-io:
      enabled: true
      source:
        type: ssh
        host: 127.0.0.1
        port: 1
        user: ubuntu
        ssh_key: /tmp/nonexistent-key
        remote_root: /data/ticks
      local_subdir: gate_io
      retention_days: 30
"#;

/// Writes a no-op provisioner script that always reports the same
/// fixed host, so `infra create`/`destroy`/security/service commands
/// can resolve a host without any real cloud-SDK or SSH dependency.
pub fn write_fake_provisioner(dir: &Path) -> PathBuf {
    let path = dir.join("fake-provisioner.sh");
    std::fs::write(
        &path,
        r#"#!/bin/sh
cat >/dev/null
if [ "$1" = "provision" ]; then
  echo '{"public_address":"10.0.0.9","ssh_user":"ubuntu","ssh_key_path":"/tmp/key","ssh_port":22}'
fi
exit 0
"#,
    )
    .expect("write provisioner script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    }
    path
}
