//! Safe invocation of Windows batch scripts.
//!
//! Batch files are run by `cmd.exe`, which re-tokenizes its command line and
//! expands `%variables%` before the script sees any argument. This crate
//! escapes every argument so that it reaches the final program unchanged,
//! builds the interpreter command line, and hands the result to
//! `std::process` or `tokio::process`.
//!
//! ```
//! use batspawn::core::normalizer::get_spawn_plan;
//! use batspawn::models::{CommandSpec, Platform};
//!
//! let spec = CommandSpec::with_args("test.bat", ["1"]);
//! let plan = get_spawn_plan(&spec, Platform::Windows).unwrap();
//! assert_eq!(plan.executable(), "cmd.exe");
//! assert_eq!(plan.args().last().unwrap(), r#"""test.bat" "1"""#);
//! ```

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
/// Shared flag that asks a running command to stop.
pub type CancellationToken = Arc<AtomicBool>;

/// Command-line interface of the `batspawn` binary.
pub mod cli;
/// Interpreter flags, escape sequences and config file names.
pub mod constants;
/// Pure planning: escaping, command-line building, extension resolution.
pub mod core;
/// Request, option and plan types.
pub mod models;
pub mod system;
