pub mod continuation;
pub mod data;
pub mod errors;
pub mod memory;
mod runtime;

pub use continuation::{evmjit_abort, Continuation, ABORT_SYMBOL};
pub use data::{RecordField, RuntimeData, RuntimeIndex};
pub use errors::{ExecutionError, RuntimeError};
pub use memory::LinearMemory;
pub use runtime::Runtime;
