mod executor;

pub use executor::{ExecutionOutcome, ExecutionResult, ProgramExecutor};
