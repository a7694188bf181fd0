// src/core/mod.rs

/// Interpreter command-line construction.
pub mod batch;
pub mod error;
/// Per-argument escaping for `cmd.exe`.
pub mod escape;
pub mod normalizer;
/// Extension overrides and the wrap decision.
pub mod resolver;
