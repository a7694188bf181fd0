// src/cli.rs

use crate::models::{CommandSpec, Extension, Platform, SpawnOptions};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;

const ECHO_ARGS: &str = "echo-args";

/// batspawn: run Windows batch scripts without handing `cmd.exe` a chance to
/// reinterpret their arguments.
///
/// `plan` shows exactly what would be passed to process creation; `run`
/// executes it.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The action to perform.
    #[command(subcommand)]
    pub action: Action,
}

/// The `batspawn` subcommands.
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Print the spawn plan for a command without running it.
    Plan {
        /// The command to plan.
        #[command(flatten)]
        target: TargetArgs,

        /// Print the plan as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Run a command, wrapping it in the interpreter when required.
    Run {
        /// The command to run.
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Print every received argument on its own line.
    // clap swallows a leading `--`; the binary prints `echo_args_tail` instead.
    #[command(hide = true, disable_help_flag = true)]
    EchoArgs {
        /// The received arguments.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

/// The command to plan or run, plus how to interpret it.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Target platform (`windows` or `unix`). Defaults to the config file, then the host.
    #[arg(long)]
    pub platform: Option<Platform>,

    /// Extension appended to the executable on Windows (e.g. `.cmd`).
    #[arg(long, conflicts_with = "path_lookup")]
    pub ext: Option<String>,

    /// The executable is resolved through PATH; always wrap on Windows.
    #[arg(long)]
    pub path_lookup: bool,

    /// Spawn options as a JSON object (e.g. `{"cwd": "build", "windows_hide": true}`).
    #[arg(long, value_name = "JSON")]
    pub options: Option<String>,

    /// The executable or script to run, followed by the arguments delivered
    /// verbatim to it. Everything after the executable belongs to it,
    /// including `--` and `--help`.
    #[arg(
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

impl TargetArgs {
    /// The extension override selected by `--ext` or `--path-lookup`.
    pub fn extension(&self) -> Extension {
        match (&self.ext, self.path_lookup) {
            (_, true) => Extension::PathLookup,
            (Some(suffix), false) => Extension::Suffix(suffix.clone()),
            (None, false) => Extension::None,
        }
    }

    /// Parses `--options`, or returns the defaults when it is absent.
    pub fn spawn_options(&self) -> Result<SpawnOptions> {
        match &self.options {
            Some(json) => serde_json::from_str(json).context("Invalid --options JSON"),
            None => Ok(SpawnOptions::default()),
        }
    }

    /// Builds the request: the first `COMMAND` value is the executable.
    pub fn to_spec(&self) -> Result<CommandSpec> {
        let (executable, args) = self
            .command
            .split_first()
            .context("No executable given")?;
        Ok(CommandSpec::with_extension_args_and_options(
            executable.clone(),
            self.extension(),
            args.iter().cloned(),
            self.spawn_options()?,
        ))
    }
}

/// Returns the arguments that follow `echo-args` in `argv`, untouched.
pub fn echo_args_tail<I, T>(argv: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    argv.into_iter()
        .map(Into::into)
        .skip(1)
        .skip_while(|arg| arg.as_os_str() != ECHO_ARGS)
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}
