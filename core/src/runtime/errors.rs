use ethereum_types::U256;
use thiserror::Error;

use crate::commons::models::return_code::UnknownReturnCode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Invalid memory access: offset {offset}, size {size}, memory length {len}")]
    InvalidMemoryAccess { offset: U256, size: U256, len: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Generated code returned an unknown status")]
    UnknownStatus(#[from] UnknownReturnCode),
    #[error("Abort raised with status {raised} but the entry routine returned {returned}")]
    ContinuationMismatch { raised: i32, returned: i32 },
}
