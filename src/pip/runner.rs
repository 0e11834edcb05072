use crate::error::{Result, UpdaterError};
use std::process::{Command, Stdio};

/// Captured result of a finished child process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the child was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn code_label(&self) -> String {
        match self.code {
            Some(code) => code.to_string(),
            None => "signal".to_string(),
        }
    }
}

/// Runs package manager invocations. Every call blocks until the child exits.
pub trait CommandRunner {
    /// When `stream_stdout` is set the child writes straight to our stdout
    /// and `CommandOutput::stdout` stays empty. stderr is always captured.
    fn run(&self, program: &str, args: &[String], stream_stdout: bool) -> Result<CommandOutput>;
}

/// Spawns real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], stream_stdout: bool) -> Result<CommandOutput> {
        let stdout = if stream_stdout {
            Stdio::inherit()
        } else {
            Stdio::piped()
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| UpdaterError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let output = child
            .wait_with_output()
            .map_err(|source| UpdaterError::Spawn {
                program: program.to_string(),
                source,
            })?;

        log::debug!("`{}` exited with {:?}", program, output.status.code());

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_exit_is_not_success() {
        let output = CommandOutput {
            code: None,
            ..Default::default()
        };
        assert!(!output.success());
        assert_eq!(output.code_label(), "signal");
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let err = SystemRunner
            .run("pipup-definitely-not-a-program", &[], false)
            .unwrap_err();
        assert!(matches!(err, UpdaterError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout_stderr_and_code() {
        let args = vec![
            "-c".to_string(),
            "echo out; echo err >&2; exit 3".to_string(),
        ];
        let output = SystemRunner.run("sh", &args, false).unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }
}
