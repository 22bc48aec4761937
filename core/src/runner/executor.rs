use ethereum_types::U256;
use serde::Serialize;

use crate::commons::config::RuntimeSettings;
use crate::commons::models::environment::ExternalContext;
use crate::commons::models::return_code::ReturnCode;
use crate::compiler::CompiledProgram;
use crate::runtime::{Continuation, ExecutionError, Runtime};

/// How an invocation of generated code ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExecutionOutcome {
    /// The entry routine returned on its own.
    Completed(ReturnCode),
    /// Generated code went through the abort path.
    Aborted(ReturnCode),
}

impl ExecutionOutcome {
    pub fn return_code(&self) -> ReturnCode {
        match self {
            ExecutionOutcome::Completed(code) | ExecutionOutcome::Aborted(code) => *code,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, ExecutionOutcome::Aborted(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub outcome: ExecutionOutcome,
    pub gas_left: U256,
    pub output: Vec<u8>,
}

pub struct ProgramExecutor {
    settings: RuntimeSettings,
}

impl ProgramExecutor {
    pub fn new(settings: RuntimeSettings) -> Self {
        Self { settings }
    }

    /// Runs `program` once against `ext` and collects its results.
    pub fn execute<E: ExternalContext + ?Sized>(
        &self,
        program: &mut CompiledProgram,
        gas: U256,
        ext: &E,
    ) -> Result<ExecutionResult, ExecutionError> {
        let continuation = Continuation::new();
        let mut runtime = Runtime::new(gas, ext, &continuation);
        runtime.memory_mut().resize(self.settings.memory_size);
        let outcome = Self::run(program, &mut runtime)?;
        let output = match outcome {
            ExecutionOutcome::Completed(ReturnCode::Return) => runtime.get_return_data().to_vec(),
            _ => Vec::new(),
        };
        Ok(ExecutionResult {
            outcome,
            gas_left: runtime.get_gas(),
            output,
        })
    }

    /// Runs `program` over an already built runtime.
    pub fn run(
        program: &mut CompiledProgram,
        runtime: &mut Runtime<'_>,
    ) -> Result<ExecutionOutcome, ExecutionError> {
        runtime.continuation().reset();
        let status = program.invoke(runtime);
        let outcome = match runtime.continuation().raised() {
            Some(raised) if raised != status => {
                return Err(ExecutionError::ContinuationMismatch {
                    raised,
                    returned: status,
                })
            }
            Some(raised) => ExecutionOutcome::Aborted(ReturnCode::try_from(raised)?),
            None => ExecutionOutcome::Completed(ReturnCode::try_from(status)?),
        };
        log::debug!("Invocation finished: {:?}", outcome);
        Ok(outcome)
    }
}
