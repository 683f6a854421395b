// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness: a temporary pipeline fixture plus background `pf`
//! processes, the way the teacher's CLI specs drive a temporary project
//! directory against a background daemon.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::fs;
use std::io::{Read, Write};
use std::os::unix::fs::PermissionsExt;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

pub const SPEC_POLL_INTERVAL_MS: u64 = 20;
pub const SPEC_WAIT_MAX_MS: u64 = 5_000;

/// Poll `condition` until it returns true or `timeout_ms` elapses.
pub fn wait_for<F: FnMut() -> bool>(timeout_ms: u64, mut condition: F) -> bool {
    let start = Instant::now();
    let timeout = Duration::from_millis(timeout_ms);
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(SPEC_POLL_INTERVAL_MS));
    }
    false
}

/// Locate the `pf` binary built alongside this test binary. Resolved
/// relative to the test binary itself (`target/debug/deps/specs-<hash>`'s
/// grandparent is `target/debug/`) rather than via `CARGO_BIN_EXE_pf`,
/// since the root spec package has no direct dependency on the `pf`
/// package for Cargo to set that variable from.
fn pf_binary() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let standard = manifest_dir.join("target/debug/pf");
    if standard.exists() {
        return standard;
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join("pf");
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

/// A temporary pipeline fixture: a `pipeline/` tree of stage directories, a
/// `processes/` directory for processor scripts, a `pipeline_storage/`
/// audit root, a dashboard socket, and the `pipeline.toml` tying them
/// together. Configure with [`Pipeline::stage`]/[`Pipeline::processor`]
/// before calling [`Pipeline::spawn_dashboard`]/[`Pipeline::spawn_watcher`].
pub struct Pipeline {
    root: tempfile::TempDir,
    poll_frequency_secs: u64,
    stability_checks: u32,
    stability_interval_ms: u64,
    sweep_interval_secs: u64,
    timeout_secs: u64,
    watcher: Option<Child>,
    dashboard: Option<Child>,
}

impl Pipeline {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        for dir in ["pipeline", "pipeline_storage", "processes"] {
            fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        Self {
            root,
            poll_frequency_secs: 1,
            stability_checks: 2,
            stability_interval_ms: 50,
            sweep_interval_secs: 1,
            timeout_secs: 2,
            watcher: None,
            dashboard: None,
        }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn pipeline_dir(&self) -> PathBuf {
        self.path().join("pipeline")
    }

    pub fn processes_dir(&self) -> PathBuf {
        self.path().join("processes")
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.path().join("pipeline_storage")
    }

    pub fn socket_path(&self) -> PathBuf {
        self.path().join("dashboard.sock")
    }

    fn config_path(&self) -> PathBuf {
        self.path().join("pipeline.toml")
    }

    /// Override the staleness timeout the dashboard sweeper applies
    /// (default 2s, for the timeout-sweep scenario).
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_sweep_interval_secs(mut self, secs: u64) -> Self {
        self.sweep_interval_secs = secs;
        self
    }

    pub fn with_poll_frequency_secs(mut self, secs: u64) -> Self {
        self.poll_frequency_secs = secs;
        self
    }

    /// Create stage directory `name` under `pipeline/`. Stages are ordered
    /// lexicographically by this name, not by creation order.
    pub fn stage(&self, name: &str) -> PathBuf {
        let dir = self.pipeline_dir().join(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Drop a file straight into a stage's root directory.
    pub fn drop_file(&self, stage: &str, file_name: &str, contents: &[u8]) -> PathBuf {
        let path = self.stage(stage).join(file_name);
        fs::write(&path, contents).unwrap();
        path
    }

    /// Install an executable shell-script processor for `stage`. `script`
    /// is run as the body of `sh -c` with `$1` bound to the working-file
    /// path that `pf-registry`'s external processor passes as an argument.
    pub fn processor(&self, stage: &str, script: &str) {
        let path = self.processes_dir().join(format!("pipeline_step_{stage}"));
        fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
    }

    fn write_config(&self) {
        let toml = format!(
            r#"
[pipeline]
pipeline_dir = "{pipeline_dir}"
pipeline_storage_dir = "{storage_dir}"
processes_dir = "{processes_dir}"
success_dir = "{success_dir}"
error_dir = "{error_dir}"
poll_frequency = {poll_frequency}
dashboard_socket_path = "{socket_path}"
sweep_interval_secs = {sweep_interval_secs}
timeout_secs = {timeout_secs}
stability_checks = {stability_checks}
stability_interval_ms = {stability_interval_ms}
"#,
            pipeline_dir = self.pipeline_dir().display(),
            storage_dir = self.storage_dir().display(),
            processes_dir = self.processes_dir().display(),
            success_dir = self.path().join("success").display(),
            error_dir = self.path().join("error").display(),
            poll_frequency = self.poll_frequency_secs,
            socket_path = self.socket_path().display(),
            sweep_interval_secs = self.sweep_interval_secs,
            timeout_secs = self.timeout_secs,
            stability_checks = self.stability_checks,
            stability_interval_ms = self.stability_interval_ms,
        );
        fs::write(self.config_path(), toml).unwrap();
    }

    /// Spawn `pf launch-dashboard` in the background and wait for its
    /// socket to appear.
    pub fn spawn_dashboard(&mut self) {
        self.write_config();
        let child = Command::new(pf_binary())
            .args(["launch-dashboard", "--config"])
            .arg(self.config_path())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn pf launch-dashboard");
        self.dashboard = Some(child);
        assert!(
            wait_for(SPEC_WAIT_MAX_MS, || self.socket_path().exists()),
            "dashboard socket never appeared"
        );
    }

    /// Spawn `pf launch-watcher` in the background.
    pub fn spawn_watcher(&mut self) {
        self.write_config();
        let child = Command::new(pf_binary())
            .args(["launch-watcher", "--config"])
            .arg(self.config_path())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn pf launch-watcher");
        self.watcher = Some(child);
    }

    /// Kill the watcher process, simulating a crash mid-pipeline.
    pub fn kill_watcher(&mut self) {
        if let Some(child) = self.watcher.take() {
            kill(child);
        }
    }

    /// Query the dashboard for one stage's status over its socket, best
    /// effort. Returns `None` if the dashboard is unreachable or the
    /// stage is not yet known.
    pub fn query_status(&self, pipeline_id: &str) -> Option<serde_json::Value> {
        let mut stream = UnixStream::connect(self.socket_path()).ok()?;
        stream.set_read_timeout(Some(Duration::from_millis(500))).ok()?;
        let request = serde_json::json!({
            "type": "get_pipeline_status",
            "pipeline_id": pipeline_id,
        });
        write_frame(&mut stream, &request);
        let reply = read_frame(&mut stream)?;
        Some(reply["pipelines"].get(pipeline_id).cloned().unwrap_or(serde_json::Value::Null))
    }

    pub fn status_is(&self, pipeline_id: &str, expected: &str) -> bool {
        self.query_status(pipeline_id).map(|v| v["status"] == expected).unwrap_or(false)
    }

    /// Open a raw client connection to the dashboard socket (for tests
    /// exercising broadcast fan-out directly).
    pub fn connect_dashboard(&self) -> UnixStream {
        let stream = UnixStream::connect(self.socket_path()).expect("connect dashboard socket");
        stream.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        stream
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        for child in [self.watcher.take(), self.dashboard.take()].into_iter().flatten() {
            kill(child);
        }
    }
}

fn kill(mut child: Child) {
    let _ = child.kill();
    let _ = child.wait();
}

pub fn write_frame(stream: &mut UnixStream, value: &serde_json::Value) {
    let bytes = serde_json::to_vec(value).unwrap();
    let len = (bytes.len() as u32).to_be_bytes();
    stream.write_all(&len).unwrap();
    stream.write_all(&bytes).unwrap();
}

pub fn read_frame(stream: &mut UnixStream) -> Option<serde_json::Value> {
    let mut len_buf = [0u8; 4];
    stream.read_exact(&mut len_buf).ok()?;
    let len = u32::from_be_bytes(len_buf) as usize;
    let mut buf = vec![0u8; len];
    stream.read_exact(&mut buf).ok()?;
    serde_json::from_slice(&buf).ok()
}
