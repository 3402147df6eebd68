//! OpenSSH-backed remote sessions
//!
//! A session is an OpenSSH control master started with `ssh -M -N`. Every
//! command of the session is multiplexed over its control socket, so
//! authentication happens once per session. When the rule carries a
//! password the master is started under `sshpass -e`; otherwise batch mode
//! is forced so that ssh never prompts.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tracing::{debug, trace, warn};

use super::session::{RemoteSession, SessionConnector};
use crate::domain::entities::RemoteTarget;
use crate::domain::ports::TransportError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_POLL: Duration = Duration::from_millis(100);

/// Quote a string for safe use in a remote shell command
pub(crate) fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Connector that spawns OpenSSH control masters
#[derive(Debug, Clone)]
pub struct OpenSshConnector {
    program: String,
}

impl Default for OpenSshConnector {
    fn default() -> Self {
        Self {
            program: "ssh".to_string(),
        }
    }
}

impl OpenSshConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different ssh binary
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn master_command(&self, remote: &RemoteTarget, socket: &Path) -> Command {
        let mut cmd = if remote.has_password() {
            let mut cmd = Command::new("sshpass");
            cmd.arg("-e").env("SSHPASS", &remote.password).arg(&self.program);
            cmd
        } else {
            let mut cmd = Command::new(&self.program);
            cmd.args(["-o", "BatchMode=yes"]);
            cmd
        };
        cmd.arg("-M")
            .arg("-N")
            .arg("-S")
            .arg(socket)
            .arg("-p")
            .arg(remote.port.to_string())
            .args(["-o", "ConnectTimeout=15"])
            .arg(remote.ssh_destination())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl SessionConnector for OpenSshConnector {
    fn connect(&self, remote: &RemoteTarget) -> Result<Box<dyn RemoteSession>, TransportError> {
        let connect_error = |message: String| TransportError::Connect {
            host: remote.host.clone(),
            message,
        };

        let control_dir = tempfile::Builder::new()
            .prefix("fsdeploy-ssh")
            .tempdir()
            .map_err(|e| connect_error(e.to_string()))?;
        let socket = control_dir.path().join("ctl");

        debug!(host = %remote.host, port = remote.port, "starting ssh control master");
        let master = self
            .master_command(remote, &socket)
            .spawn()
            .map_err(|e| connect_error(format!("failed to run ssh: {}", e)))?;

        let mut session = OpenSshSession {
            program: self.program.clone(),
            destination: remote.ssh_destination(),
            socket,
            master: Some(master),
            _control_dir: control_dir,
        };

        session.wait_until_ready().map_err(|message| {
            session.disconnect();
            connect_error(message)
        })?;

        Ok(Box::new(session))
    }
}

/// One multiplexed OpenSSH connection
pub struct OpenSshSession {
    program: String,
    destination: String,
    socket: PathBuf,
    master: Option<Child>,
    _control_dir: TempDir,
}

impl OpenSshSession {
    fn client(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-S").arg(&self.socket).arg(&self.destination);
        cmd
    }

    fn check(&self) -> bool {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-S")
            .arg(&self.socket)
            .args(["-O", "check"])
            .arg(&self.destination)
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd.status().map(|s| s.success()).unwrap_or(false)
    }

    fn wait_until_ready(&mut self) -> Result<(), String> {
        let started = Instant::now();
        loop {
            let exited = match self.master.as_mut() {
                Some(master) => master.try_wait().map_err(|e| e.to_string())?,
                None => return Err("control master is gone".to_string()),
            };
            if let Some(status) = exited {
                let mut stderr = String::new();
                if let Some(mut pipe) = self.master.take().and_then(|mut m| m.stderr.take()) {
                    let _ = pipe.read_to_string(&mut stderr);
                }
                let stderr = stderr.trim();
                return Err(if stderr.is_empty() {
                    format!("ssh exited with {}", status)
                } else {
                    stderr.to_string()
                });
            }
            if self.check() {
                return Ok(());
            }
            if started.elapsed() > CONNECT_TIMEOUT {
                return Err("timed out waiting for ssh connection".to_string());
            }
            thread::sleep(CONNECT_POLL);
        }
    }

    /// Run `command` on the remote host, feeding `input` on stdin.
    fn run(&self, command: &str, input: Option<&[u8]>) -> Result<(), String> {
        trace!(destination = %self.destination, command, "remote command");
        let mut child = self
            .client()
            .arg(command)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| e.to_string())?;

        if let Some(bytes) = input {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(bytes).map_err(|e| e.to_string())?;
            }
        }

        let output = child.wait_with_output().map_err(|e| e.to_string())?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(if stderr.is_empty() {
                format!("remote command exited with {}", output.status)
            } else {
                stderr
            });
        }
        Ok(())
    }
}

impl RemoteSession for OpenSshSession {
    fn mkdir_all(&mut self, dir: &str) -> Result<(), TransportError> {
        self.run(&format!("mkdir -p {}", shell_quote(dir)), None)
            .map_err(|message| TransportError::DirectoryCreate {
                path: dir.to_string(),
                message,
            })
    }

    fn put(&mut self, path: &str, bytes: &[u8]) -> Result<(), TransportError> {
        let target = shell_quote(path);
        let tmp = shell_quote(&format!("{}.fsdeploy.tmp", path));
        let command = format!("cat > {tmp} && mv -f {tmp} {target}");
        self.run(&command, Some(bytes))
            .map_err(|message| TransportError::Upload {
                path: path.to_string(),
                message,
            })
    }

    fn remove_tree(&mut self, path: &str) -> Result<(), TransportError> {
        self.run(&format!("rm -rf {}", shell_quote(path)), None)
            .map_err(|message| TransportError::TargetDelete {
                path: path.to_string(),
                message,
            })
    }

    fn disconnect(&mut self) {
        let Some(mut master) = self.master.take() else {
            return;
        };

        let exited = Command::new(&self.program)
            .arg("-S")
            .arg(&self.socket)
            .args(["-O", "exit"])
            .arg(&self.destination)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false);

        if !exited {
            if let Err(e) = master.kill() {
                warn!(destination = %self.destination, "failed to stop ssh master: {}", e);
            }
        }
        let _ = master.wait();
        debug!(destination = %self.destination, "ssh session closed");
    }
}

impl Drop for OpenSshSession {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_quote_wraps_in_single_quotes() {
        assert_eq!(shell_quote("/var/www"), "'/var/www'");
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
    }

    #[test]
    fn master_command_uses_batch_mode_without_password() {
        let connector = OpenSshConnector::new();
        let remote = RemoteTarget::new("example.org", "deploy").with_port(2222);
        let cmd = connector.master_command(&remote, Path::new("/tmp/ctl"));

        assert_eq!(cmd.get_program(), "ssh");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "-o",
                "BatchMode=yes",
                "-M",
                "-N",
                "-S",
                "/tmp/ctl",
                "-p",
                "2222",
                "-o",
                "ConnectTimeout=15",
                "deploy@example.org",
            ]
        );
    }

    #[test]
    fn master_command_wraps_sshpass_with_password() {
        let connector = OpenSshConnector::new();
        let remote = RemoteTarget::new("example.org", "deploy").with_password("hunter2");
        let cmd = connector.master_command(&remote, Path::new("/tmp/ctl"));

        assert_eq!(cmd.get_program(), "sshpass");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(&args[..2], ["-e", "ssh"]);
        assert!(!args.iter().any(|a| a.contains("hunter2")));
        assert!(cmd
            .get_envs()
            .any(|(k, v)| k == "SSHPASS" && v.map(|v| v == "hunter2").unwrap_or(false)));
    }

    #[test]
    fn connect_reports_missing_binary() {
        let connector = OpenSshConnector::new().with_program("fsdeploy-no-such-ssh");
        let remote = RemoteTarget::new("example.org", "deploy");

        let err = match connector.connect(&remote) {
            Ok(_) => panic!("connect should fail"),
            Err(e) => e,
        };

        assert!(matches!(err, TransportError::Connect { .. }));
    }
}
