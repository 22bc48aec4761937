//! Possible errors of the JIT runtime interface
use config::ConfigError;
use thiserror::Error;

use crate::compiler::CompilerError;
use crate::runtime::{ExecutionError, RuntimeError};

/// Errors surfaced to the embedder. Generated code aborting is not one of them: it is
/// reported as an [crate::ExecutionOutcome].
#[derive(Error, Debug)]
pub enum Error {
    #[error("Settings Load Error")]
    SettingsError {
        #[from]
        source: ConfigError,
    },
    #[error("Compilation failed: {0}")]
    CompilerError(#[from] CompilerError),
    #[error("Execution failed: {0}")]
    ExecutionError(#[from] ExecutionError),
    #[error("Runtime error: {0}")]
    RuntimeError(#[from] RuntimeError),
}
