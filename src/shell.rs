//! External tools (camera capture, speech) run through `sh -c`.
use crate::errors::ProbeError;
use log::debug;
use serde::Deserialize;
use std::{
    env,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};
use tokio::{process::Command, time};

/// Shell reports a command it could not find with this status.
const NOT_FOUND: i32 = 127;

/// A command template and the binaries it needs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tool {
    /// Command line. The pattern `{}` is replaced with the shell-quoted
    /// argument.
    pub cmd: String,
    /// Binaries that must be on `PATH` for the command to work.
    #[serde(default)]
    pub requires: Vec<String>,
}

impl Tool {
    pub fn new(cmd: &str, requires: &[&str]) -> Self {
        Self {
            cmd: cmd.to_string(),
            requires: requires.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Fail with [ProbeError::Unavailable] naming the first required binary
    /// that is not installed.
    pub fn check(&self) -> Result<(), ProbeError> {
        match self.requires.iter().find(|bin| find_on_path(bin).is_none()) {
            Some(bin) => Err(ProbeError::Unavailable(format!(
                "`{}` is not installed",
                bin
            ))),
            None => Ok(()),
        }
    }

    /// Construct a command to run by replacing all occurances of `{}` with
    /// the quoted argument.
    fn construct_command(&self, arg: &str) -> (String, Command) {
        let concrete_command = self.cmd.replace("{}", &quote(arg));
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(&concrete_command)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        (concrete_command, cmd)
    }

    /// Run the tool and return its stdout.
    pub async fn run(
        &self,
        arg: &str,
        timeout: Duration,
    ) -> Result<Vec<u8>, ProbeError> {
        let (line, mut cmd) = self.construct_command(arg);
        debug!("running `{}`", line);

        let out = match time::timeout(timeout, cmd.output()).await {
            Err(_) => {
                return Err(ProbeError::Fault(format!(
                    "`{}` timed out after {} s",
                    line,
                    timeout.as_secs_f32()
                )))
            }
            Ok(res) => res?,
        };

        let status = out.status.code().unwrap_or(-1);
        debug!("`{}` exited with {}", line, status);
        let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
        match status {
            0 => Ok(out.stdout),
            NOT_FOUND => Err(ProbeError::Unavailable(if stderr.is_empty() {
                format!("`{}`: command not found", line)
            } else {
                stderr
            })),
            code if stderr.is_empty() => Err(ProbeError::Fault(format!(
                "`{}` exited with status {}",
                line, code
            ))),
            _ => Err(ProbeError::Fault(stderr)),
        }
    }
}

/// Quote `arg` for `sh` by wrapping it in single quotes.
pub fn quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Locate `bin` like the shell would.
pub fn find_on_path(bin: &str) -> Option<PathBuf> {
    if bin.contains('/') {
        let path = PathBuf::from(bin);
        return if is_executable(&path) { Some(path) } else { None };
    }
    env::var_os("PATH").and_then(|paths| {
        env::split_paths(&paths)
            .map(|dir| dir.join(bin))
            .find(|candidate| is_executable(candidate))
    })
}
