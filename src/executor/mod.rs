//! Synchronous command execution
//!
//! [`CommandExecutor::execute`] runs exactly one child process per call and
//! does not return until that child has exited. Around the spawn it takes
//! care of the capture files: their paths are derived from the output
//! directory and the program name when not given, stale files are removed
//! before the child starts, and the child's stdout and stderr are written to
//! them afterwards.
//!
//! The command line is split into an argument vector and the program is
//! launched directly, never through a shell.

pub mod error;

pub use error::ExecuteError;

use crate::console::Console;
use crate::subprocess::{ExitStatus, ProcessCommandBuilder, ProcessRunner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

const STDOUT_SUFFIX: &str = "stdout";
const STDERR_SUFFIX: &str = "stderr";

/// Offset used to report signal terminations as an exit status, as shells do
const SIGNAL_EXIT_BASE: i32 = 128;

#[derive(Debug, Clone, Default)]
pub struct ExecutionRequest {
    pub command: String,
    pub output_dir: Option<PathBuf>,
    pub stdout_path: Option<PathBuf>,
    pub stderr_path: Option<PathBuf>,
    pub verbose: bool,
}

impl ExecutionRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn stdout_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdout_path = Some(path.into());
        self
    }

    pub fn stderr_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.stderr_path = Some(path.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturePaths {
    pub stdout: PathBuf,
    pub stderr: PathBuf,
}

impl CapturePaths {
    /// Fill in whichever capture path is missing as
    /// `<output_dir>/<program basename>.stdout` (or `.stderr`).
    pub fn resolve(
        command: &str,
        output_dir: &Path,
        stdout: Option<PathBuf>,
        stderr: Option<PathBuf>,
    ) -> Self {
        let program = program_basename(command);
        Self {
            stdout: stdout
                .unwrap_or_else(|| output_dir.join(format!("{program}.{STDOUT_SUFFIX}"))),
            stderr: stderr
                .unwrap_or_else(|| output_dir.join(format!("{program}.{STDERR_SUFFIX}"))),
        }
    }
}

/// Basename of the first whitespace-delimited token of `command`
fn program_basename(command: &str) -> String {
    let first = command.split_whitespace().next().unwrap_or_default();
    Path::new(first)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| first.to_string())
}

fn remove_stale_capture(path: &Path, label: &str) -> Result<(), ExecuteError> {
    if path.exists() {
        info!(
            "{} file '{}' already exists so will delete it now",
            label,
            path.display()
        );
        std::fs::remove_file(path).map_err(|source| ExecuteError::CaptureFile {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn write_capture(path: &Path, contents: &[u8]) -> Result<(), ExecuteError> {
    let to_error = |source| ExecuteError::CaptureFile {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }
    std::fs::write(path, contents).map_err(to_error)
}

pub struct CommandExecutor {
    runner: Arc<dyn ProcessRunner>,
    console: Console,
}

impl CommandExecutor {
    pub fn new(runner: Arc<dyn ProcessRunner>, console: Console) -> Self {
        Self { runner, console }
    }

    /// Run `command` with every option defaulted.
    pub async fn run(&self, command: &str) -> Result<PathBuf, ExecuteError> {
        self.execute(ExecutionRequest::new(command)).await
    }

    /// Run the request's command to completion and return its stdout capture path.
    pub async fn execute(&self, request: ExecutionRequest) -> Result<PathBuf, ExecuteError> {
        let console = self.console.with_verbose(request.verbose);

        let command = request.command.trim();
        if command.is_empty() {
            return Err(ExecuteError::InvalidArgument(
                "cmd was not specified".to_string(),
            ));
        }

        info!("Will attempt to execute '{}'", command);
        console.detail(&format!("Will attempt to execute '{command}'"));

        let output_dir = match request.output_dir {
            Some(dir) => dir,
            None => {
                let dir = std::env::temp_dir();
                info!(
                    "outdir was not defined and therefore was set to default '{}'",
                    dir.display()
                );
                dir
            }
        };

        let stdout_given = request.stdout_path.is_some();
        let stderr_given = request.stderr_path.is_some();
        let paths = CapturePaths::resolve(
            command,
            &output_dir,
            request.stdout_path,
            request.stderr_path,
        );
        if !stdout_given {
            info!(
                "stdout_file was not specified and therefore was set to '{}'",
                paths.stdout.display()
            );
        }
        if !stderr_given {
            info!(
                "stderr_file was not specified and therefore was set to '{}'",
                paths.stderr.display()
            );
        }

        let argv = shell_words::split(command).map_err(|e| {
            ExecuteError::InvalidArgument(format!("could not parse '{command}': {e}"))
        })?;
        let (program, args) = match argv.split_first() {
            Some((program, args)) if !program.is_empty() => (program, args),
            _ => {
                return Err(ExecuteError::InvalidArgument(format!(
                    "'{command}' does not name a program"
                )))
            }
        };

        remove_stale_capture(&paths.stdout, "STDOUT")?;
        remove_stale_capture(&paths.stderr, "STDERR")?;

        let process = ProcessCommandBuilder::new(program).args(args).build();
        let output = self.runner.run(process).await?;

        match output.pid {
            Some(pid) => {
                info!("The child process ID is '{}'", pid);
                console.detail(&format!("The child process ID is '{pid}'"));
            }
            None => info!("The child process ID is unknown"),
        }

        match output.status.code() {
            Some(code) => info!("The return code was '{}'", code),
            None => info!("There was no return code"),
        }

        write_capture(&paths.stdout, &output.stdout)?;
        write_capture(&paths.stderr, &output.stderr)?;
        info!("stdout is: {}", paths.stdout.display());
        info!("stderr is: {}", paths.stderr.display());

        console.relay(&output.stdout, &output.stderr);

        let code = match output.status {
            ExitStatus::Success => {
                info!(
                    "Execution of cmd '{}' has completed in {:?}",
                    command, output.duration
                );
                return Ok(paths.stdout);
            }
            ExitStatus::Error(code) => code,
            ExitStatus::Signal(signal) => SIGNAL_EXIT_BASE + signal,
        };

        info!("Received status '{}' for cmd '{}'", code, command);
        Err(ExecuteError::ProcessFailed {
            command: command.to_string(),
            code,
        })
    }
}
