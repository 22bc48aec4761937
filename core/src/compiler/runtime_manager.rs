use cranelift_codegen::ir::{
    types, AbiParam, FuncRef, GlobalValue, InstBuilder, MemFlags, Type, Value,
};
use cranelift_frontend::FunctionBuilder;
use cranelift_module::{DataDescription, DataId, FuncId, Linkage, Module};
use ethereum_types::U256;

use crate::commons::models::return_code::ReturnCode;
use crate::commons::word::WORD_LIMBS;
use crate::runtime::{RecordField, RuntimeData, RuntimeIndex, ABORT_SYMBOL};

use super::errors::CompilerError;
use super::instruction::Instruction;

/// Module-wide data object holding the address of the current record.
pub const RECORD_SLOT_SYMBOL: &str = "rt";
/// Status returned by a helper routine that did not abort.
pub const STATUS_CONTINUE: i32 = 0;

/// Declarations shared by every routine of one compiled module.
#[derive(Clone, Copy, Debug)]
pub struct RuntimeImports {
    record_slot: DataId,
    abort: FuncId,
}

impl RuntimeImports {
    /// Declares the record slot and the abort primitive. Called once per module.
    pub fn declare<M: Module>(module: &mut M) -> Result<Self, CompilerError> {
        let pointer_type = module.target_config().pointer_type();
        let record_slot = module.declare_data(RECORD_SLOT_SYMBOL, Linkage::Local, true, false)?;
        let mut description = DataDescription::new();
        // Zero marks a slot not yet written by an entry prologue
        description.define_zeroinit(pointer_type.bytes() as usize);
        module.define_data(record_slot, &description)?;

        let mut signature = module.make_signature();
        signature.params.push(AbiParam::new(pointer_type));
        signature.params.push(AbiParam::new(types::I32));
        let abort = module.declare_function(ABORT_SYMBOL, Linkage::Import, &signature)?;
        Ok(Self { record_slot, abort })
    }
}

/// A 256-bit value in generated code, as four `i64` limbs, least significant first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordValue {
    limbs: [Value; WORD_LIMBS],
}

impl WordValue {
    pub fn from_limbs(limbs: [Value; WORD_LIMBS]) -> Self {
        Self { limbs }
    }

    pub fn limbs(&self) -> [Value; WORD_LIMBS] {
        self.limbs
    }

    pub fn low(&self) -> Value {
        self.limbs[0]
    }
}

#[derive(Clone, Copy, Debug)]
enum Routine {
    Entry {
        memory: Value,
        record: Value,
        prologue_emitted: bool,
    },
    Helper,
}

/// Emits the instructions through which generated code talks to its [crate::Runtime].
///
/// One manager is built per routine. Inside the entry routine the record address is its
/// second parameter; every other routine loads it from the module-wide slot written by
/// [RuntimeManager::emit_entry_prologue].
pub struct RuntimeManager<'a, 'f, M: Module> {
    module: &'a mut M,
    builder: &'a mut FunctionBuilder<'f>,
    imports: RuntimeImports,
    pointer_type: Type,
    routine: Routine,
    record_slot: Option<GlobalValue>,
    abort: Option<FuncRef>,
}

impl<'a, 'f, M: Module> RuntimeManager<'a, 'f, M> {
    pub fn for_entry(
        module: &'a mut M,
        builder: &'a mut FunctionBuilder<'f>,
        imports: RuntimeImports,
        memory: Value,
        record: Value,
    ) -> Self {
        Self::new(
            module,
            builder,
            imports,
            Routine::Entry {
                memory,
                record,
                prologue_emitted: false,
            },
        )
    }

    pub fn for_helper(
        module: &'a mut M,
        builder: &'a mut FunctionBuilder<'f>,
        imports: RuntimeImports,
    ) -> Self {
        Self::new(module, builder, imports, Routine::Helper)
    }

    fn new(
        module: &'a mut M,
        builder: &'a mut FunctionBuilder<'f>,
        imports: RuntimeImports,
        routine: Routine,
    ) -> Self {
        let pointer_type = module.target_config().pointer_type();
        Self {
            module,
            builder,
            imports,
            pointer_type,
            routine,
            record_slot: None,
            abort: None,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self.routine, Routine::Entry { .. })
    }

    pub fn pointer_type(&self) -> Type {
        self.pointer_type
    }

    /// Builder of the current routine, for the instructions the translator emits itself.
    pub fn builder(&mut self) -> &mut FunctionBuilder<'f> {
        self.builder
    }

    /// Base address of the linear memory, the first parameter of the entry routine.
    pub fn memory_base(&self) -> Result<Value, CompilerError> {
        match self.routine {
            Routine::Entry { memory, .. } => Ok(memory),
            Routine::Helper => Err(CompilerError::EntryRoutineOnly {
                operation: "memory base",
            }),
        }
    }

    /// Publishes the record address received by the entry routine for the helper routines.
    pub fn emit_entry_prologue(&mut self) -> Result<(), CompilerError> {
        let record = match &mut self.routine {
            Routine::Entry {
                record,
                prologue_emitted,
                ..
            } => {
                if *prologue_emitted {
                    return Err(CompilerError::PrologueAlreadyEmitted);
                }
                *prologue_emitted = true;
                *record
            }
            Routine::Helper => {
                return Err(CompilerError::EntryRoutineOnly {
                    operation: "entry prologue",
                })
            }
        };
        let slot = self.record_slot_address();
        self.builder
            .ins()
            .store(MemFlags::trusted(), record, slot, 0);
        log::trace!("emit store {} -> {}", record, RECORD_SLOT_SYMBOL);
        Ok(())
    }

    pub fn current_record_pointer(&mut self) -> Value {
        if let Routine::Entry { record, .. } = self.routine {
            return record;
        }
        let slot = self.record_slot_address();
        self.builder
            .ins()
            .load(self.pointer_type, MemFlags::trusted(), slot, 0)
    }

    pub fn field_address(&mut self, index: RuntimeIndex) -> Value {
        let record = self.current_record_pointer();
        self.builder
            .ins()
            .iadd_imm(record, RuntimeData::word_offset(index) as i64)
    }

    pub fn read_field(&mut self, index: RuntimeIndex) -> WordValue {
        log::trace!("emit load {}", index.name());
        let address = self.field_address(index);
        let limbs = std::array::from_fn(|limb| {
            self.builder
                .ins()
                .load(types::I64, MemFlags::trusted(), address, (limb * 8) as i32)
        });
        WordValue { limbs }
    }

    pub fn write_field(&mut self, index: RuntimeIndex, value: WordValue) {
        log::trace!("emit store {}", index.name());
        let address = self.field_address(index);
        for (limb, part) in value.limbs.iter().enumerate() {
            self.builder
                .ins()
                .store(MemFlags::trusted(), *part, address, (limb * 8) as i32);
        }
    }

    pub fn get_gas(&mut self) -> WordValue {
        self.read_field(RuntimeIndex::Gas)
    }

    pub fn set_gas(&mut self, gas: WordValue) {
        self.write_field(RuntimeIndex::Gas, gas)
    }

    /// Marks `[offset, offset + size)` of the linear memory as the output of the invocation.
    pub fn register_return_data(&mut self, offset: WordValue, size: WordValue) {
        self.write_field(RuntimeIndex::ReturnDataOffset, offset);
        self.write_field(RuntimeIndex::ReturnDataSize, size);
    }

    pub fn call_data_pointer(&mut self) -> Value {
        self.load_pointer_field(RecordField::CallData)
    }

    pub fn code_pointer(&mut self) -> Value {
        self.load_pointer_field(RecordField::Code)
    }

    pub fn continuation_value(&mut self) -> Value {
        self.load_pointer_field(RecordField::Continuation)
    }

    /// Leaves the current routine through the abort path with `code`.
    ///
    /// Hands `code` to the abort primitive together with the continuation of the record and
    /// returns it. The current block is terminated: the caller must switch to another block
    /// before emitting anything else.
    pub fn raise_abort(&mut self, code: ReturnCode) -> Result<(), CompilerError> {
        if code.code() == STATUS_CONTINUE {
            return Err(CompilerError::InvalidAbortStatus(code.code()));
        }
        log::trace!("emit abort {:?}", code);
        let continuation = self.continuation_value();
        let status = self.builder.ins().iconst(types::I32, code.code() as i64);
        let abort = self.abort_ref();
        self.builder.ins().call(abort, &[continuation, status]);
        self.builder.ins().return_(&[status]);
        Ok(())
    }

    /// Calls a helper routine and returns right away with its status if it is not
    /// [STATUS_CONTINUE].
    pub fn call_routine(&mut self, routine: FuncId) {
        let callee = self.module.declare_func_in_func(routine, self.builder.func);
        let call = self.builder.ins().call(callee, &[]);
        let status = self.builder.inst_results(call)[0];
        let unwind = self.builder.create_block();
        let resume = self.builder.create_block();
        self.builder.ins().brif(status, unwind, &[], resume, &[]);

        self.builder.switch_to_block(unwind);
        self.builder.seal_block(unwind);
        self.builder.ins().return_(&[status]);

        self.builder.switch_to_block(resume);
        self.builder.seal_block(resume);
    }

    /// Normal completion of the entry routine.
    pub fn emit_return(&mut self, code: ReturnCode) -> Result<(), CompilerError> {
        if !self.is_entry() {
            return Err(CompilerError::EntryRoutineOnly {
                operation: "program return",
            });
        }
        let status = self.builder.ins().iconst(types::I32, code.code() as i64);
        self.builder.ins().return_(&[status]);
        Ok(())
    }

    /// Normal completion of a helper routine: execution resumes in its caller.
    pub fn emit_helper_return(&mut self) -> Result<(), CompilerError> {
        if self.is_entry() {
            return Err(CompilerError::HelperRoutineOnly {
                operation: "helper return",
            });
        }
        let status = self
            .builder
            .ins()
            .iconst(types::I32, STATUS_CONTINUE as i64);
        self.builder.ins().return_(&[status]);
        Ok(())
    }

    pub fn field_for_context_read_instruction(
        &mut self,
        instruction: Instruction,
    ) -> Result<WordValue, CompilerError> {
        match instruction.context_index() {
            Some(index) => Ok(self.read_field(index)),
            None => {
                log::error!(
                    "Instruction {:?} asked for a context field it does not have",
                    instruction
                );
                Err(CompilerError::InternalContractViolation(instruction))
            }
        }
    }

    pub fn word_const(&mut self, value: U256) -> WordValue {
        let U256(parts) = value;
        let limbs = std::array::from_fn(|limb| {
            self.builder.ins().iconst(types::I64, parts[limb] as i64)
        });
        WordValue { limbs }
    }

    /// Zero-extends an integer value of at most 64 bits into a word.
    pub fn word_from_low(&mut self, low: Value) -> WordValue {
        let low = if self.builder.func.dfg.value_type(low).bits() < 64 {
            self.builder.ins().uextend(types::I64, low)
        } else {
            low
        };
        let zero = self.builder.ins().iconst(types::I64, 0);
        WordValue {
            limbs: [low, zero, zero, zero],
        }
    }

    fn load_pointer_field(&mut self, field: RecordField) -> Value {
        log::trace!("emit load {}", field.name());
        let record = self.current_record_pointer();
        self.builder.ins().load(
            self.pointer_type,
            MemFlags::trusted(),
            record,
            RuntimeData::field_offset(field),
        )
    }

    fn record_slot_address(&mut self) -> Value {
        let slot = match self.record_slot {
            Some(slot) => slot,
            None => {
                let slot = self
                    .module
                    .declare_data_in_func(self.imports.record_slot, self.builder.func);
                self.record_slot = Some(slot);
                slot
            }
        };
        self.builder.ins().global_value(self.pointer_type, slot)
    }

    fn abort_ref(&mut self) -> FuncRef {
        match self.abort {
            Some(abort) => abort,
            None => {
                let abort = self
                    .module
                    .declare_func_in_func(self.imports.abort, self.builder.func);
                self.abort = Some(abort);
                abort
            }
        }
    }
}
