//! The only place in the crate that spawns the `git` executable.
//!
//! [`Gateway::execute`] runs one process synchronously and reports either a
//! [`GitCommandResult`] (git ran, whatever its exit code) or a
//! [`GatewayError`] (git could not be run). [`CommandQueue`] moves batches of
//! invocations onto worker threads so the UI loop never blocks on git.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::Output;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PROGRAM: &str = "git";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl GitCommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Failure to run the executable at all, as opposed to git exiting nonzero.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("`{program}` was not found; is git installed and on PATH?")]
    NotFound { program: String },

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` timed out after {}ms", timeout.as_millis())]
    TimedOut { program: String, timeout: Duration },

    #[error("`{program}` was terminated before reporting an exit code")]
    Terminated { program: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOptions {
    pub working_dir: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl ExecOptions {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Gateway {
    program: OsString,
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new()
    }
}

impl Gateway {
    pub fn new() -> Self {
        Self {
            program: OsString::from(DEFAULT_PROGRAM),
        }
    }

    /// Uses `program` in place of `git`; mostly useful for tests.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program_display(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    pub fn execute<S>(
        &self,
        args: &[S],
        options: &ExecOptions,
    ) -> Result<GitCommandResult, GatewayError>
    where
        S: AsRef<str>,
    {
        let program = self.program_display();
        let argv = args
            .iter()
            .map(|arg| OsString::from(arg.as_ref()))
            .collect::<Vec<_>>();

        tracing::debug!(
            program = %program,
            args = ?args.iter().map(AsRef::as_ref).collect::<Vec<_>>(),
            cwd = ?options.working_dir,
            "executing git command"
        );

        let mut expression = duct::cmd(&self.program, argv)
            .stdin_null()
            .stdout_capture()
            .stderr_capture()
            .unchecked();
        if let Some(dir) = options.working_dir.as_ref() {
            expression = expression.dir(dir);
        }

        let handle = expression.start().map_err(|source| {
            let error = if source.kind() == io::ErrorKind::NotFound {
                GatewayError::NotFound {
                    program: program.clone(),
                }
            } else {
                GatewayError::Spawn {
                    program: program.clone(),
                    source,
                }
            };
            tracing::warn!(%error, "git command could not be started");
            error
        })?;

        let waited = match options.timeout {
            Some(timeout) => match handle.wait_timeout(timeout) {
                Ok(Some(output)) => Ok(to_result(&program, output)),
                Ok(None) => {
                    // kill() waits on the child, so nothing is left unreaped.
                    if let Err(error) = handle.kill() {
                        tracing::warn!(%error, program = %program, "failed to kill timed out git");
                    }
                    Err(GatewayError::TimedOut {
                        program: program.clone(),
                        timeout,
                    })
                }
                Err(source) => Err(GatewayError::Wait {
                    program: program.clone(),
                    source,
                }),
            },
            None => handle
                .wait()
                .map(|output| to_result(&program, output))
                .map_err(|source| GatewayError::Wait {
                    program: program.clone(),
                    source,
                }),
        };

        match waited {
            Ok(Ok(result)) => {
                tracing::debug!(program = %program, exit_code = result.exit_code, "git command finished");
                Ok(result)
            }
            Ok(Err(error)) | Err(error) => {
                tracing::warn!(%error, "git command failed to run");
                Err(error)
            }
        }
    }
}

fn to_result(program: &str, output: &Output) -> Result<GitCommandResult, GatewayError> {
    let Some(exit_code) = output.status.code() else {
        return Err(GatewayError::Terminated {
            program: program.to_owned(),
        });
    };

    Ok(GitCommandResult {
        exit_code,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// One batch of git invocations run in order on a worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRequest {
    pub commands: Vec<Vec<String>>,
    pub options: ExecOptions,
}

impl GitRequest {
    pub fn single(args: Vec<String>, options: ExecOptions) -> Self {
        Self {
            commands: vec![args],
            options,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    #[cfg(test)]
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: Result<Vec<GitCommandResult>, GatewayError>,
}

pub struct CommandQueue {
    gateway: Gateway,
    completion_tx: Sender<Completion>,
    completion_rx: Receiver<Completion>,
    next_ticket: u64,
    in_flight: usize,
}

impl CommandQueue {
    pub fn new(gateway: Gateway) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel();
        Self {
            gateway,
            completion_tx,
            completion_rx,
            next_ticket: 1,
            in_flight: 0,
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn dispatch(&mut self, request: GitRequest) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight += 1;

        let gateway = self.gateway.clone();
        let completion_tx = self.completion_tx.clone();
        thread::spawn(move || {
            let outcome = run_batch(&gateway, &request);
            // The receiver only disappears when the app is shutting down.
            let _ = completion_tx.send(Completion { ticket, outcome });
        });

        ticket
    }

    /// Collects every completion that has arrived, without blocking.
    pub fn drain(&mut self) -> Vec<Completion> {
        let mut completed = Vec::new();
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            completed.push(completion);
        }
        completed
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

fn run_batch(
    gateway: &Gateway,
    request: &GitRequest,
) -> Result<Vec<GitCommandResult>, GatewayError> {
    request
        .commands
        .iter()
        .map(|args| gateway.execute(args, &request.options))
        .collect()
}
