// src/models.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// --- PLATFORM & EXTENSION ---

/// The platform a spawn plan is computed for.
///
/// Planning never looks at the host directly; callers pass a `Platform`
/// (usually [`Platform::current`]) so the result is reproducible anywhere.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Batch scripts run through `cmd.exe`; extension overrides apply.
    Windows,
    /// Any other host. Only the batch suffix check applies.
    Unix,
}

impl Platform {
    /// Probes the host this process runs on.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Unix
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => f.write_str("windows"),
            Self::Unix => f.write_str("unix"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win32" => Ok(Self::Windows),
            "unix" | "linux" | "macos" => Ok(Self::Unix),
            other => Err(format!("unknown platform '{}'", other)),
        }
    }
}

/// An explicit extension override supplied alongside the executable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Extension {
    /// No override: the executable name is used as given.
    #[default]
    None,
    /// A suffix (e.g. `".cmd"`) appended to the executable on Windows.
    Suffix(String),
    /// The executable is resolved through a `PATH` lookup, so its final
    /// extension is unknown up front. Forces wrapping on Windows.
    PathLookup,
}

// --- SPAWN OPTIONS ---

/// How one of the child's standard streams is connected.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StdioMode {
    /// Share the parent's stream.
    Inherit,
    /// Connect a pipe the caller can read or write.
    Piped,
    /// Attach the null device.
    Null,
}

/// How captured output is handed back to the caller.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputEncoding {
    /// Decode captured output as UTF-8 text.
    #[default]
    Utf8,
    /// Return captured output as raw bytes.
    Buffer,
}

/// The `shell` option: either a toggle or the path of an interpreter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ShellOption {
    /// `true` or `false`.
    Enabled(bool),
    /// A specific interpreter to run the command through.
    Interpreter(String),
}

/// Process-creation options carried alongside a command.
///
/// `shell` and `windows_verbatim_arguments` belong to the batch builder. A
/// caller that sets either one is rejected during normalization.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SpawnOptions {
    /// Working directory of the child.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    /// Extra environment variables for the child.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    /// Start from an empty environment instead of inheriting the parent's.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub env_clear: bool,
    /// Standard input mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdin: Option<StdioMode>,
    /// Standard output mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<StdioMode>,
    /// Standard error mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<StdioMode>,
    /// Encoding of captured output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<OutputEncoding>,
    /// Overrides the child's `argv[0]` (Unix only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argv0: Option<String>,
    /// Suppresses the console window on Windows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows_hide: Option<bool>,
    /// Set by the batch builder only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<ShellOption>,
    /// Set by the batch builder only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows_verbatim_arguments: Option<bool>,
}

impl SpawnOptions {
    /// Whether arguments must reach the child without any further quoting.
    pub fn verbatim_arguments(&self) -> bool {
        self.windows_verbatim_arguments.unwrap_or(false)
    }

    /// The effective output encoding (`utf8` unless overridden).
    pub fn output_encoding(&self) -> OutputEncoding {
        self.encoding.unwrap_or_default()
    }
}

// --- REQUEST & PLAN ---

/// A normalized invocation request.
///
/// Build one with the named constructors in [`crate::core::normalizer`],
/// one per accepted call shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// The program or script path, as given.
    pub executable: String,
    /// Extension override applied before planning.
    pub extension: Extension,
    /// Arguments the program must receive unchanged.
    pub args: Vec<String>,
    /// Process-creation options.
    pub options: SpawnOptions,
}

/// The final `(executable, args, options)` triple handed to process creation.
///
/// A plan is immutable once built: fields are only reachable through
/// accessors or by consuming it with [`SpawnPlan::into_parts`].
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SpawnPlan {
    executable: String,
    args: Vec<String>,
    options: SpawnOptions,
    wrapped: bool,
}

impl SpawnPlan {
    pub(crate) fn new(
        executable: String,
        args: Vec<String>,
        options: SpawnOptions,
        wrapped: bool,
    ) -> Self {
        Self {
            executable,
            args,
            options,
            wrapped,
        }
    }

    /// The program process creation starts.
    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// The final argument list.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Options for process creation.
    pub fn options(&self) -> &SpawnOptions {
        &self.options
    }

    /// True when the request was rewritten into an interpreter invocation.
    pub fn is_wrapped(&self) -> bool {
        self.wrapped
    }

    /// Consumes the plan into `(executable, args, options)`.
    pub fn into_parts(self) -> (String, Vec<String>, SpawnOptions) {
        (self.executable, self.args, self.options)
    }
}
