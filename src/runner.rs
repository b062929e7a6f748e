use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::Result;

/// Options controlling a single child-process invocation.
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Working directory for the child process.
    pub cwd: Option<PathBuf>,
    /// Capture stdout/stderr rather than inheriting the parent's streams.
    pub capture_output: bool,
    /// Treat a non-zero exit code as an error.
    pub check: bool,
    /// Kill the child process once this much wall-clock time has elapsed.
    pub timeout: Option<Duration>,
    /// Replacement environment for the child process.
    pub env: Option<HashMap<String, String>>,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            cwd: None,
            capture_output: true,
            check: true,
            timeout: None,
            env: None,
        }
    }
}

/// What became of a spawned child process.
#[derive(Debug)]
pub enum RunOutcome {
    Completed {
        exit_code: i32,
        stdout: String,
        stderr: String,
    },
    /// The timeout elapsed and the child was killed; output captured up to
    /// that point is retained.
    TimedOut { stdout: String, stderr: String },
}

/// The process-execution primitive behind [`crate::MmseqsCommand::run_with`].
///
/// The one production implementation is [`SystemRunner`]; tests substitute
/// stubs to exercise execution handling without a real mmseqs install.
pub trait ProcessRunner {
    fn run(&self, argv: &[String], opts: &ExecOptions) -> Result<RunOutcome>;
}

/// Runs the argument vector with `std::process::Command`.
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, argv: &[String], opts: &ExecOptions) -> Result<RunOutcome> {
        let (program, args) = match argv.split_first() {
            Some(parts) => parts,
            None => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "empty argument vector",
                )
                .into())
            }
        };

        let mut command = Command::new(program);
        command.args(args);
        if let Some(cwd) = &opts.cwd {
            command.current_dir(cwd);
        }
        if let Some(env) = &opts.env {
            command.env_clear();
            command.envs(env);
        }

        match opts.timeout {
            None => run_to_completion(command, opts.capture_output),
            Some(timeout) => run_with_deadline(command, opts.capture_output, timeout),
        }
    }
}

fn exit_code(status: std::process::ExitStatus) -> i32 {
    // A signal-terminated child has no exit code; report -1 like a shell's
    // convention of "did not exit normally".
    status.code().unwrap_or(-1)
}

fn run_to_completion(mut command: Command, capture: bool) -> Result<RunOutcome> {
    if capture {
        let output = command.output()?;
        Ok(RunOutcome::Completed {
            exit_code: exit_code(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    } else {
        let status = command.status()?;
        Ok(RunOutcome::Completed {
            exit_code: exit_code(status),
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

fn run_with_deadline(
    mut command: Command,
    capture: bool,
    timeout: Duration,
) -> Result<RunOutcome> {
    if capture {
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());
    }

    let mut child = command.spawn()?;

    // Drain the pipes off-thread so a chatty child can't fill them and
    // deadlock against our polling loop.
    let stdout_reader = child.stdout.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    });
    let stderr_reader = child.stderr.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    });

    let collect = |reader: Option<thread::JoinHandle<Vec<u8>>>| -> String {
        let bytes = reader
            .map(|handle| handle.join().unwrap_or_default())
            .unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(RunOutcome::Completed {
                exit_code: exit_code(status),
                stdout: collect(stdout_reader),
                stderr: collect(stderr_reader),
            });
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(RunOutcome::TimedOut {
                stdout: collect(stdout_reader),
                stderr: collect(stderr_reader),
            });
        }
        thread::sleep(Duration::from_millis(10));
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[test]
    fn captures_output_and_exit_code() {
        let outcome = SystemRunner
            .run(&sh("echo out; echo err >&2; exit 3"), &ExecOptions::default())
            .unwrap();
        match outcome {
            RunOutcome::Completed {
                exit_code,
                stdout,
                stderr,
            } => {
                assert_eq!(exit_code, 3);
                assert_eq!(stdout.trim(), "out");
                assert_eq!(stderr.trim(), "err");
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn deadline_kills_slow_children() {
        let opts = ExecOptions {
            timeout: Some(Duration::from_millis(100)),
            ..Default::default()
        };
        let outcome = SystemRunner
            .run(&sh("echo partial; sleep 10"), &opts)
            .unwrap();
        match outcome {
            RunOutcome::TimedOut { stdout, .. } => assert_eq!(stdout.trim(), "partial"),
            other => panic!("expected a timeout, got {other:?}"),
        }
    }

    #[test]
    fn fast_children_beat_the_deadline() {
        let opts = ExecOptions {
            timeout: Some(Duration::from_secs(30)),
            ..Default::default()
        };
        let outcome = SystemRunner.run(&sh("exit 0"), &opts).unwrap();
        assert!(matches!(
            outcome,
            RunOutcome::Completed { exit_code: 0, .. }
        ));
    }
}
