//! Blocking child-process execution.
//!
//! Every runner executes exactly one child at a time and waits for it.
//! Without a time limit a hung child blocks the whole stage, which is
//! how the build orchestrator drives these tools; callers can opt into
//! a kill-on-expiry limit instead.

use std::{io, process::Command, time::Duration};

use process_control::{ChildExt, Control};

use crate::Error;

/// How a child process came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The process exited on its own with this code.
    /// Death by signal maps to code 1.
    Exited(i32),
    /// The time limit expired and the process was terminated.
    TimedOut,
}

impl WaitOutcome {
    /// Whether the child finished with exit code zero.
    #[must_use]
    pub fn success(&self) -> bool {
        matches!(self, WaitOutcome::Exited(0))
    }

    /// The exit code to hand back to the build system.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            WaitOutcome::Exited(code) => *code,
            WaitOutcome::TimedOut => 1,
        }
    }
}

/// Spawn `cmd` and block until it exits or `time_limit` expires.
///
/// # Errors
/// [`Error::ToolNotFound`] when the program cannot be launched because
/// it does not exist, [`Error::File`] for any other spawn or wait
/// failure.
pub fn wait_for(cmd: &mut Command, time_limit: Option<Duration>) -> Result<WaitOutcome, Error> {
    let mut child = cmd.spawn().map_err(|err| spawn_error(cmd, err))?;

    let Some(limit) = time_limit else {
        let status = child.wait()?;
        return Ok(WaitOutcome::Exited(status.code().unwrap_or(1)));
    };

    let status = child
        .controlled()
        .time_limit(limit)
        .terminate_for_timeout()
        .wait()?;
    match status {
        Some(status) => {
            // Codes outside i32 range get the same treatment as signal death.
            let code = status
                .code()
                .and_then(|code| i32::try_from(code).ok())
                .unwrap_or(1);
            Ok(WaitOutcome::Exited(code))
        }
        None => Ok(WaitOutcome::TimedOut),
    }
}

fn spawn_error(cmd: &Command, err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::NotFound {
        Error::tool_not_found(format!(
            "'{}' not found, is it installed and in PATH?",
            cmd.get_program().to_string_lossy()
        ))
    } else {
        Error::File(err)
    }
}

#[cfg(test)]
mod tests {
    use std::{process::Command, time::Duration};

    use super::{wait_for, WaitOutcome};
    use crate::Error;

    #[test]
    fn exit_codes_come_back_verbatim() {
        let mut ok = Command::new("sh");
        ok.arg("-c").arg("exit 0");
        assert_eq!(wait_for(&mut ok, None).unwrap(), WaitOutcome::Exited(0));

        let mut failing = Command::new("sh");
        failing.arg("-c").arg("exit 7");
        assert_eq!(
            wait_for(&mut failing, None).unwrap(),
            WaitOutcome::Exited(7)
        );
    }

    #[test]
    fn exit_codes_survive_a_generous_time_limit() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("exit 7");
        let outcome = wait_for(&mut cmd, Some(Duration::from_secs(30))).unwrap();
        assert_eq!(outcome, WaitOutcome::Exited(7));
    }

    #[test]
    fn missing_program_is_tool_not_found() {
        let mut cmd = Command::new("/nonexistent/piocheck-no-such-tool");
        let err = wait_for(&mut cmd, None).unwrap_err();
        assert!(matches!(err, Error::ToolNotFound(_)));
        assert!(err.to_string().contains("no-such-tool"));
    }

    #[test]
    fn expired_time_limit_reports_a_timeout() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("sleep 5");
        let outcome = wait_for(&mut cmd, Some(Duration::from_millis(100))).unwrap();
        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert_eq!(outcome.exit_code(), 1);
        assert!(!outcome.success());
    }
}
