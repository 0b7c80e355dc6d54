//! Error types for paco
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, bad project name, bad config value)
//! - 3: Blocked by guardrail (assembled prompt over `max_prompt_kb`)
//! - 4: Operation failed (I/O, JSON, lock contention)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the paco CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const GUARDRAIL_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for paco operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid project name '{0}'")]
    InvalidProjectName(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot determine home directory; pass --root or set PACO_HOME")]
    HomeNotFound,

    // Guardrail blocks (exit code 3)
    #[error("Prompt too large: {size_kb:.1}KB exceeds limit of {max_kb}KB")]
    PromptTooLarge { size_kb: f64, max_kb: f64 },

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_)
            | Error::InvalidProjectName(_)
            | Error::InvalidConfig(_)
            | Error::HomeNotFound => exit_codes::USER_ERROR,

            Error::PromptTooLarge { .. } => exit_codes::GUARDRAIL_BLOCKED,

            Error::Io(_) | Error::Json(_) | Error::LockFailed(_) | Error::OperationFailed(_) => {
                exit_codes::OPERATION_FAILED
            }
        }
    }

    /// Structured details for JSON error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::PromptTooLarge { size_kb, max_kb } => Some(serde_json::json!({
                "size_kb": size_kb,
                "max_prompt_kb": max_kb,
            })),
            Error::LockFailed(path) => Some(serde_json::json!({ "lock": path })),
            Error::InvalidProjectName(name) => Some(serde_json::json!({ "project": name })),
            _ => None,
        }
    }
}

/// Result type alias for paco operations
pub type Result<T> = std::result::Result<T, Error>;
