//! Test environment builder for isolated fsdeploy runs.
//!
//! `TestEnv` owns three temp directories: the workspace the CLI runs in,
//! an output directory that rules deploy into, and a home directory so the
//! user-level config of the machine running the tests is never read.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};

use tempfile::TempDir;

/// Result of running the fsdeploy binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// stdout parsed as NDJSON
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|e| panic!("invalid JSON line {:?}: {}", line, e))
            })
            .collect()
    }
}

pub struct TestEnv {
    pub workspace: TempDir,
    pub output: TempDir,
    pub home: TempDir,
}

impl TestEnv {
    pub fn builder() -> TestEnvBuilder {
        TestEnvBuilder::new()
    }

    /// Canonical workspace root, as the CLI sees it
    pub fn workspace_root(&self) -> PathBuf {
        self.workspace
            .path()
            .canonicalize()
            .expect("Failed to canonicalize workspace")
    }

    pub fn workspace_path(&self, relative: &str) -> PathBuf {
        self.workspace.path().join(relative)
    }

    pub fn output_path(&self, relative: &str) -> PathBuf {
        self.output.path().join(relative)
    }

    pub fn write_workspace_file(&self, relative: &str, content: &str) {
        write_file(&self.workspace_path(relative), content);
    }

    pub fn write_output_file(&self, relative: &str, content: &str) {
        write_file(&self.output_path(relative), content);
    }

    pub fn read_output_file(&self, relative: &str) -> String {
        std::fs::read_to_string(self.output_path(relative))
            .unwrap_or_else(|e| panic!("Failed to read deployed file {}: {}", relative, e))
    }

    /// Write `.fsdeploy.toml` into the workspace
    pub fn write_config(&self, toml: &str) {
        self.write_workspace_file(".fsdeploy.toml", toml);
    }

    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_fsdeploy"));
        cmd.current_dir(self.workspace.path())
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env("APPDATA", self.home.path())
            .env_remove("FSDEPLOY_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        let output = self
            .command(args)
            .output()
            .expect("Failed to execute fsdeploy");
        to_result(output)
    }

    /// Start a long-running command with piped output
    pub fn spawn(&self, args: &[&str]) -> Child {
        self.command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to start fsdeploy")
    }
}

pub fn to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create directories");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

/// Builder for TestEnv with fluent API
pub struct TestEnvBuilder {
    files: Vec<(String, String)>,
    rules: Vec<String>,
}

impl TestEnvBuilder {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Add a workspace file
    pub fn with_file(mut self, relative: &str, content: &str) -> Self {
        self.files.push((relative.to_string(), content.to_string()));
        self
    }

    /// Add a `[[nodes]]` entry. `{out}` in `target` is replaced with the
    /// output directory; `extra` is appended verbatim.
    pub fn with_rule(mut self, source: &str, target: &str, extra: &str) -> Self {
        self.rules.push(format!(
            "[[nodes]]\nsource = '{}'\ntarget = '{}'\n{}\n",
            source, target, extra
        ));
        self
    }

    pub fn build(self) -> TestEnv {
        let env = TestEnv {
            workspace: TempDir::new().expect("Failed to create workspace temp dir"),
            output: TempDir::new().expect("Failed to create output temp dir"),
            home: TempDir::new().expect("Failed to create home temp dir"),
        };

        for (relative, content) in &self.files {
            env.write_workspace_file(relative, content);
        }

        if !self.rules.is_empty() {
            let out = env.output.path().display().to_string();
            let config: String = self
                .rules
                .iter()
                .map(|rule| rule.replace("{out}", &out))
                .collect();
            env.write_config(&config);
        }

        env
    }
}

impl Default for TestEnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}
