// src/system/executor.rs

use crate::{
    CancellationToken,
    constants::DEFAULT_INTERPRETER,
    core::{error::PlanError, normalizer},
    models::{CommandSpec, OutputEncoding, Platform, SpawnOptions, SpawnPlan, StdioMode},
    system::config::Settings,
};
use std::process::{Child, Command as StdCommand, ExitStatus, Output, Stdio};
use std::sync::atomic::Ordering;
use std::time::Duration;
use thiserror::Error;

/// Failures from planning or running a command.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The request was rejected before any process was created.
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// Process creation or waiting failed.
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, #[source] std::io::Error),
    /// The command ran but did not succeed.
    #[error("Command '{command}' exited with a non-zero status ({status}).")]
    NonZeroExitStatus {
        /// The command line that was run.
        command: String,
        /// Its exit status.
        status: ExitStatus,
        /// Everything it wrote before exiting.
        output: Box<CapturedOutput>,
    },
    /// `utf8` encoding was requested but the output was not UTF-8.
    #[error("Command '{command}' produced output that was not valid UTF-8")]
    InvalidUtf8Output {
        /// The command line that was run.
        command: String,
        /// The decoding error.
        #[source]
        source: std::string::FromUtf8Error,
    },
    /// The cancellation token was raised.
    #[error("Operation was cancelled by the user.")]
    Cancelled,
}

/// One captured stream, decoded according to the `encoding` option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Captured {
    /// Output decoded as UTF-8.
    Text(String),
    /// Raw output bytes.
    Bytes(Vec<u8>),
}

impl Captured {
    /// The stream's raw bytes, whatever the encoding.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    /// The decoded text, if the stream was captured as UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bytes(_) => None,
        }
    }
}

/// Exit status plus the captured standard streams of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    /// How the process exited.
    pub status: ExitStatus,
    /// Captured standard output.
    pub stdout: Captured,
    /// Captured standard error.
    pub stderr: Captured,
}

/// Plans and launches commands for one target platform.
///
/// [`Spawner::plan`] only computes the `(executable, args, options)` triple;
/// the other methods hand that triple to process creation.
#[derive(Debug, Clone)]
pub struct Spawner {
    platform: Platform,
    interpreter: String,
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spawner {
    /// A spawner for the host platform and the default interpreter.
    pub fn new() -> Self {
        Self::with_platform(Platform::current())
    }

    /// A spawner that plans for `platform` with the default interpreter.
    pub fn with_platform(platform: Platform) -> Self {
        Self {
            platform,
            interpreter: DEFAULT_INTERPRETER.to_string(),
        }
    }

    /// A spawner using the interpreter and platform from `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            platform: settings.platform(),
            interpreter: settings.interpreter.clone(),
        }
    }

    /// The platform plans are computed for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The interpreter that wraps batch scripts.
    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    /// Computes the spawn plan without creating any process.
    pub fn plan(&self, spec: &CommandSpec) -> Result<SpawnPlan, PlanError> {
        normalizer::get_spawn_plan_with(spec, self.platform, &self.interpreter)
    }

    /// Starts the command and returns the running child.
    pub fn spawn(&self, spec: &CommandSpec) -> Result<Child, ExecutionError> {
        let plan = self.plan(spec)?;
        command_for_plan(&plan)
            .spawn()
            .map_err(|e| ExecutionError::CommandFailed(describe(&plan), e))
    }

    /// Runs the command to completion and captures its output.
    ///
    /// A non-zero exit is reported through [`CapturedOutput::status`], not as
    /// an error.
    pub fn spawn_sync(&self, spec: &CommandSpec) -> Result<CapturedOutput, ExecutionError> {
        let plan = self.plan(spec)?;
        let output = command_for_plan(&plan)
            .output()
            .map_err(|e| ExecutionError::CommandFailed(describe(&plan), e))?;
        capture(&plan, output)
    }

    /// Runs the command to completion, failing if it exits unsuccessfully.
    pub fn exec_file_sync(&self, spec: &CommandSpec) -> Result<CapturedOutput, ExecutionError> {
        let plan = self.plan(spec)?;
        let output = command_for_plan(&plan)
            .output()
            .map_err(|e| ExecutionError::CommandFailed(describe(&plan), e))?;
        ensure_success(&plan, capture(&plan, output)?)
    }

    /// Async counterpart of [`Spawner::exec_file_sync`].
    ///
    /// Planning completes before the first await; only the process wait suspends.
    pub async fn exec_file(&self, spec: &CommandSpec) -> Result<CapturedOutput, ExecutionError> {
        let plan = self.plan(spec)?;
        let output = tokio::process::Command::from(command_for_plan(&plan))
            .output()
            .await
            .map_err(|e| ExecutionError::CommandFailed(describe(&plan), e))?;
        ensure_success(&plan, capture(&plan, output)?)
    }

    /// Runs the command with the configured stdio and waits for it, killing
    /// the child if `cancellation_token` is raised in the meantime.
    pub fn run(
        &self,
        spec: &CommandSpec,
        cancellation_token: &CancellationToken,
    ) -> Result<ExitStatus, ExecutionError> {
        let plan = self.plan(spec)?;
        let command_line = describe(&plan);

        // Pre-flight cancellation check.
        if is_cancelled(cancellation_token) {
            return Err(ExecutionError::Cancelled);
        }

        let mut child = command_for_plan(&plan)
            .spawn()
            .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?;

        // Non-blocking wait loop to allow for cancellation.
        loop {
            match child.try_wait() {
                // A console Ctrl+C reaches the child too; report it as ours.
                Ok(Some(_)) if is_cancelled(cancellation_token) => {
                    return Err(ExecutionError::Cancelled);
                }
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {
                    if is_cancelled(cancellation_token) {
                        log::debug!(
                            "Cancellation requested, killing child process (PID: {})...",
                            child.id()
                        );
                        if let Err(e) = child.kill() {
                            log::warn!("Failed to kill child process {}: {}", child.id(), e);
                        }
                        child.wait().ok();
                        return Err(ExecutionError::Cancelled);
                    }
                    std::thread::sleep(Duration::from_millis(100));
                }
                Err(e) => return Err(ExecutionError::CommandFailed(command_line, e)),
            }
        }
    }
}

/// Builds the `std::process::Command` that carries out `plan`.
///
/// With verbatim pass-through on Windows every argument is appended with
/// `raw_arg`, so the already-final interpreter line is not quoted again.
pub fn command_for_plan(plan: &SpawnPlan) -> StdCommand {
    let options = plan.options();
    let mut command = StdCommand::new(plan.executable());
    push_args(&mut command, plan.args(), options.verbatim_arguments());

    if let Some(cwd) = &options.cwd {
        command.current_dir(dunce::simplified(cwd));
    }
    if options.env_clear {
        command.env_clear();
    }
    if let Some(env) = &options.env {
        command.envs(env);
    }
    if let Some(mode) = options.stdin {
        command.stdin(stdio_for(mode));
    }
    if let Some(mode) = options.stdout {
        command.stdout(stdio_for(mode));
    }
    if let Some(mode) = options.stderr {
        command.stderr(stdio_for(mode));
    }
    apply_platform_options(&mut command, options);
    command
}

fn stdio_for(mode: StdioMode) -> Stdio {
    match mode {
        StdioMode::Inherit => Stdio::inherit(),
        StdioMode::Piped => Stdio::piped(),
        StdioMode::Null => Stdio::null(),
    }
}

#[cfg(windows)]
fn push_args(command: &mut StdCommand, args: &[String], verbatim: bool) {
    use std::os::windows::process::CommandExt;
    if verbatim {
        for arg in args {
            command.raw_arg(arg);
        }
    } else {
        command.args(args);
    }
}

#[cfg(not(windows))]
fn push_args(command: &mut StdCommand, args: &[String], _verbatim: bool) {
    command.args(args);
}

#[cfg(windows)]
fn apply_platform_options(command: &mut StdCommand, options: &SpawnOptions) {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    if options.windows_hide == Some(true) {
        command.creation_flags(CREATE_NO_WINDOW);
    }
}

#[cfg(unix)]
fn apply_platform_options(command: &mut StdCommand, options: &SpawnOptions) {
    use std::os::unix::process::CommandExt;
    if let Some(argv0) = &options.argv0 {
        command.arg0(argv0);
    }
}

#[cfg(not(any(unix, windows)))]
fn apply_platform_options(_command: &mut StdCommand, _options: &SpawnOptions) {}

fn is_cancelled(cancellation_token: &CancellationToken) -> bool {
    cancellation_token.load(Ordering::SeqCst)
}

/// Human-readable command line used in error messages and logs.
fn describe(plan: &SpawnPlan) -> String {
    std::iter::once(plan.executable())
        .chain(plan.args().iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capture(plan: &SpawnPlan, output: Output) -> Result<CapturedOutput, ExecutionError> {
    let encoding = plan.options().output_encoding();
    Ok(CapturedOutput {
        status: output.status,
        stdout: decode(plan, output.stdout, encoding)?,
        stderr: decode(plan, output.stderr, encoding)?,
    })
}

fn decode(
    plan: &SpawnPlan,
    bytes: Vec<u8>,
    encoding: OutputEncoding,
) -> Result<Captured, ExecutionError> {
    match encoding {
        OutputEncoding::Buffer => Ok(Captured::Bytes(bytes)),
        OutputEncoding::Utf8 => String::from_utf8(bytes).map(Captured::Text).map_err(|e| {
            ExecutionError::InvalidUtf8Output {
                command: describe(plan),
                source: e,
            }
        }),
    }
}

fn ensure_success(
    plan: &SpawnPlan,
    output: CapturedOutput,
) -> Result<CapturedOutput, ExecutionError> {
    if output.status.success() {
        return Ok(output);
    }
    Err(ExecutionError::NonZeroExitStatus {
        command: describe(plan),
        status: output.status,
        output: Box::new(output),
    })
}
