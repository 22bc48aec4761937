mod compiler;
pub mod errors;
pub mod instruction;
mod program;
pub mod runtime_manager;

pub use compiler::{Compiler, ENTRY_SYMBOL};
pub use errors::CompilerError;
pub use instruction::{Instruction, UnknownInstruction};
pub use program::CompiledProgram;
pub use runtime_manager::{
    RuntimeImports, RuntimeManager, WordValue, RECORD_SLOT_SYMBOL, STATUS_CONTINUE,
};
