//! Errors raised while turning a request into a spawn plan.
//!
//! Every variant is raised synchronously, before any process is created, and
//! signals bad input rather than a transient failure.

use thiserror::Error;

/// Why a request could not be turned into a spawn plan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// The argument holds NUL, CR or LF, which have no safe representation
    /// on an interpreter command line.
    #[error("Invalid character in argument {argument:?}")]
    InvalidArgument {
        /// The rejected argument.
        argument: String,
    },

    /// The executable name holds a double quote.
    #[error("Invalid character in command {command:?}")]
    InvalidCommand {
        /// The rejected executable name.
        command: String,
    },

    /// The caller set an option the batch builder owns.
    #[error("The '{option}' option is not supported")]
    UnsupportedOption {
        /// Name of the option, as spelled in [`crate::models::SpawnOptions`].
        option: &'static str,
    },
}

impl PlanError {
    /// Stable identifier for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "PLAN001",
            Self::InvalidCommand { .. } => "PLAN002",
            Self::UnsupportedOption { .. } => "PLAN003",
        }
    }
}
