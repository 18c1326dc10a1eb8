//! External engine invocation.
//!
//! Every ffmpeg/ffprobe call in the crate goes through [`ProcessRunner`], which takes a program
//! and an argument vector and hands back the exit code plus captured output. The orchestration
//! code never touches `std::process` directly, so tests can substitute a recording fake.

use std::io;
use std::process::Command;

use tracing::debug;

use crate::{Error, Result};

/// Captured result of one external process run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, or `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Build a finished output with the given exit code. Mostly useful for fakes.
    pub fn with_code(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// Capability to run an external program to completion.
///
/// Implementations must map "program not found / not executable" to
/// [`Error::EngineUnavailable`]. A non-zero exit is *not* an error at this layer; callers decide
/// what a failed run means for their step.
pub trait ProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput>;
}

impl<P: ProcessRunner + ?Sized> ProcessRunner for &P {
    fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput> {
        (**self).run(program, args)
    }
}

/// [`ProcessRunner`] backed by `std::process::Command`. Blocks until the child exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput> {
        debug!(program, ?args, "spawning external process");

        let output = Command::new(program).args(args).output().map_err(|err| {
            match err.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                    Error::EngineUnavailable {
                        program: program.to_owned(),
                    }
                }
                _ => Error::Io(err),
            }
        })?;

        let exit_code = output.status.code();
        if exit_code.is_none() {
            // Killed by a signal (typically the user's Ctrl-C reaching the child).
            return Err(Error::Interrupted);
        }

        Ok(ProcessOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        })
    }
}

/// Verify that `program` can be executed at all, using `-version` like ffmpeg/ffprobe accept.
pub fn ensure_available(runner: &impl ProcessRunner, program: &str) -> Result<()> {
    let out = runner.run(program, &["-version".to_owned()])?;
    if out.success() {
        Ok(())
    } else {
        Err(Error::EngineUnavailable {
            program: program.to_owned(),
        })
    }
}

/// Turn a list of string-ish values into an owned argument vector.
pub(crate) fn args<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}
