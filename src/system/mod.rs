//! # System Interaction Layer
//!
//! The boundary between the pure planning code in [`crate::core`] and the
//! operating system.
//!
//! ## Modules
//!
//! - **`config`**: Loads `config.toml` (interpreter path, platform override).
//! - **`executor`**: Turns a [`crate::models::SpawnPlan`] into a real process,
//!   blocking or async, with verbatim argument pass-through on Windows and
//!   graceful cancellation.

/// Settings file loading.
pub mod config;
/// Process creation for spawn plans.
pub mod executor;
