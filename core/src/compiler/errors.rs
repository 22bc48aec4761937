use cranelift_codegen::{settings::SetError, CodegenError};
use cranelift_module::ModuleError;
use thiserror::Error;

use super::instruction::Instruction;

#[derive(Error, Debug)]
pub enum CompilerError {
    #[error("Instruction {0:?} does not read the execution context")]
    InternalContractViolation(Instruction),
    #[error("{operation} can only be emitted inside the entry routine")]
    EntryRoutineOnly { operation: &'static str },
    #[error("{operation} can only be emitted inside a helper routine")]
    HelperRoutineOnly { operation: &'static str },
    #[error("The entry prologue has already been emitted")]
    PrologueAlreadyEmitted,
    #[error("The entry routine has already been defined")]
    EntryAlreadyDefined,
    #[error("The entry routine has not been defined")]
    EntryNotDefined,
    #[error("Status {0} cannot be raised as an abort")]
    InvalidAbortStatus(i32),
    #[error("Host ISA is not supported: {0}")]
    UnsupportedHost(String),
    #[error("Invalid code generation flag")]
    InvalidFlag {
        #[from]
        source: SetError,
    },
    #[error("Code generation error")]
    Codegen {
        #[from]
        source: CodegenError,
    },
    #[error("Module error")]
    Module {
        #[from]
        source: ModuleError,
    },
}
