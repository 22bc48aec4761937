//! Runtime interface of a JIT compiler for EVM bytecode.
//!
//! Generated code and the host share one fixed-layout structure per invocation, the
//! execution context record ([RuntimeData]). The host fills it through a [Runtime] before
//! running the program and reads gas and return data back from it afterwards; at compile
//! time the [RuntimeManager] emits the loads and stores that generated code performs on it,
//! as well as the abort path that ends an invocation early.
//!
//! # Basic usage
//! ```no_run
//!use cranelift_codegen::ir::{InstBuilder, MemFlags};
//!use ethereum_types::U256;
//!use evmjit_core::{
//!    get_default_settings, CallEnvironment, Compiler, Instruction, ProgramExecutor, ReturnCode,
//!};
//!
//!fn main() -> Result<(), evmjit_core::Error> {
//!    let settings = get_default_settings();
//!    let mut compiler = Compiler::new(&settings.compiler)?;
//!    compiler.define_entry(|manager| {
//!        // Return the call value as the first word of memory
//!        let value = manager.field_for_context_read_instruction(Instruction::CALLVALUE)?;
//!        let offset = manager.word_const(U256::zero());
//!        let size = manager.word_const(U256::from(8u64));
//!        let memory = manager.memory_base()?;
//!        manager
//!            .builder()
//!            .ins()
//!            .store(MemFlags::trusted(), value.low(), memory, 0);
//!        manager.register_return_data(offset, size);
//!        manager.emit_return(ReturnCode::Return)
//!    })?;
//!    let mut program = compiler.finish()?;
//!
//!    let mut runtime_settings = settings.runtime;
//!    runtime_settings.memory_size = 32;
//!    let executor = ProgramExecutor::new(runtime_settings);
//!    let environment = CallEnvironment {
//!        value: U256::from(5u64),
//!        ..Default::default()
//!    };
//!    let result = executor.execute(&mut program, U256::from(21000u64), &environment)?;
//!    assert_eq!(result.output[0], 5);
//!    assert_eq!(result.gas_left, U256::from(21000u64));
//!    Ok(())
//!}
//! ```
pub(crate) mod commons;
pub(crate) mod compiler;
pub mod error;
pub(crate) mod runner;
pub(crate) mod runtime;

pub use commons::{
    config::{get_default_settings, CompilerSettings, JitSettings, OptLevel, RuntimeSettings},
    models::environment::{BlockInfo, CallEnvironment, ExternalContext},
    models::return_code::{ReturnCode, UnknownReturnCode},
    word,
    word::GeneratedWord,
};
pub use compiler::{
    CompiledProgram, Compiler, CompilerError, Instruction, RuntimeImports, RuntimeManager,
    UnknownInstruction, WordValue, ENTRY_SYMBOL, RECORD_SLOT_SYMBOL, STATUS_CONTINUE,
};
pub use error::Error;
pub use runner::{ExecutionOutcome, ExecutionResult, ProgramExecutor};
pub use runtime::{
    evmjit_abort, Continuation, ExecutionError, LinearMemory, RecordField, Runtime, RuntimeData,
    RuntimeError, RuntimeIndex, ABORT_SYMBOL,
};
