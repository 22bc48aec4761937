use cranelift_codegen::ir::{types, AbiParam, Signature};
use cranelift_codegen::settings::{self, Configurable};
use cranelift_codegen::Context;
use cranelift_frontend::{FunctionBuilder, FunctionBuilderContext};
use cranelift_jit::{JITBuilder, JITModule};
use cranelift_module::{default_libcall_names, FuncId, Linkage, Module};

use crate::commons::config::CompilerSettings;
use crate::runtime::{evmjit_abort, ABORT_SYMBOL};

use super::errors::CompilerError;
use super::program::CompiledProgram;
use super::runtime_manager::{RuntimeImports, RuntimeManager};

/// Exported name of the entry routine of every compiled program.
pub const ENTRY_SYMBOL: &str = "main";

/// Owns the JIT module of one program while its routines are being generated.
pub struct Compiler {
    module: JITModule,
    imports: RuntimeImports,
    function_context: FunctionBuilderContext,
    entry: Option<FuncId>,
    print_ir: bool,
}

impl Compiler {
    pub fn new(settings: &CompilerSettings) -> Result<Self, CompilerError> {
        let mut flag_builder = settings::builder();
        flag_builder.set("opt_level", settings.opt_level.as_flag())?;
        flag_builder.set(
            "enable_verifier",
            if settings.verifier { "true" } else { "false" },
        )?;
        flag_builder.set("use_colocated_libcalls", "false")?;
        flag_builder.set("is_pic", "false")?;
        let isa_builder = cranelift_native::builder()
            .map_err(|error| CompilerError::UnsupportedHost(error.to_owned()))?;
        let isa = isa_builder.finish(settings::Flags::new(flag_builder))?;

        let mut builder = JITBuilder::with_isa(isa, default_libcall_names());
        builder.symbol(ABORT_SYMBOL, evmjit_abort as *const u8);
        let mut module = JITModule::new(builder);
        let imports = RuntimeImports::declare(&mut module)?;
        log::debug!("Compiler created for {}", module.isa().triple());
        Ok(Self {
            module,
            imports,
            function_context: FunctionBuilderContext::new(),
            entry: None,
            print_ir: settings.print_ir,
        })
    }

    /// `(memory, record) -> status`
    fn entry_signature(&self) -> Signature {
        let pointer_type = self.module.target_config().pointer_type();
        let mut signature = self.module.make_signature();
        signature.params.push(AbiParam::new(pointer_type));
        signature.params.push(AbiParam::new(pointer_type));
        signature.returns.push(AbiParam::new(types::I32));
        signature
    }

    /// `() -> status`
    fn helper_signature(&self) -> Signature {
        let mut signature = self.module.make_signature();
        signature.returns.push(AbiParam::new(types::I32));
        signature
    }

    /// Declares a helper routine so that it can be called before it is defined.
    pub fn declare_helper(&mut self, name: &str) -> Result<FuncId, CompilerError> {
        let signature = self.helper_signature();
        Ok(self
            .module
            .declare_function(name, Linkage::Local, &signature)?)
    }

    /// Generates the body of a declared helper routine.
    ///
    /// `emit` must terminate every block it leaves open, usually with
    /// [RuntimeManager::emit_helper_return] or [RuntimeManager::raise_abort].
    pub fn define_helper<F>(&mut self, id: FuncId, emit: F) -> Result<(), CompilerError>
    where
        F: FnOnce(&mut RuntimeManager<'_, '_, JITModule>) -> Result<(), CompilerError>,
    {
        let mut context = self.module.make_context();
        context.func.signature = self.helper_signature();
        let emitted = {
            let mut builder = FunctionBuilder::new(&mut context.func, &mut self.function_context);
            let block = builder.create_block();
            builder.switch_to_block(block);
            let mut manager =
                RuntimeManager::for_helper(&mut self.module, &mut builder, self.imports);
            let emitted = emit(&mut manager);
            if emitted.is_ok() {
                builder.seal_all_blocks();
                builder.finalize();
            }
            emitted
        };
        self.complete_routine(&mut context, emitted)?;
        if self.print_ir {
            log::debug!("Helper routine {}:\n{}", id, context.func.display());
        }
        self.module.define_function(id, &mut context)?;
        self.module.clear_context(&mut context);
        Ok(())
    }

    /// Generates the entry routine. The entry prologue is emitted before `emit` runs.
    pub fn define_entry<F>(&mut self, emit: F) -> Result<FuncId, CompilerError>
    where
        F: FnOnce(&mut RuntimeManager<'_, '_, JITModule>) -> Result<(), CompilerError>,
    {
        if self.entry.is_some() {
            return Err(CompilerError::EntryAlreadyDefined);
        }
        let signature = self.entry_signature();
        let id = self
            .module
            .declare_function(ENTRY_SYMBOL, Linkage::Export, &signature)?;
        let mut context = self.module.make_context();
        context.func.signature = signature;
        let emitted = {
            let mut builder = FunctionBuilder::new(&mut context.func, &mut self.function_context);
            let block = builder.create_block();
            builder.append_block_params_for_function_params(block);
            builder.switch_to_block(block);
            let (memory, record) = {
                let params = builder.block_params(block);
                (params[0], params[1])
            };
            let mut manager = RuntimeManager::for_entry(
                &mut self.module,
                &mut builder,
                self.imports,
                memory,
                record,
            );
            let emitted = manager
                .emit_entry_prologue()
                .and_then(|()| emit(&mut manager));
            if emitted.is_ok() {
                builder.seal_all_blocks();
                builder.finalize();
            }
            emitted
        };
        self.complete_routine(&mut context, emitted)?;
        if self.print_ir {
            log::debug!("Entry routine:\n{}", context.func.display());
        }
        self.module.define_function(id, &mut context)?;
        self.module.clear_context(&mut context);
        self.entry = Some(id);
        Ok(id)
    }

    /// Leaves the builder context clean after a failed emission so the compiler stays usable.
    fn complete_routine(
        &mut self,
        context: &mut Context,
        emitted: Result<(), CompilerError>,
    ) -> Result<(), CompilerError> {
        if emitted.is_err() {
            self.function_context = FunctionBuilderContext::new();
            self.module.clear_context(context);
        }
        emitted
    }

    /// Finalizes every routine and hands out the executable program.
    pub fn finish(mut self) -> Result<CompiledProgram, CompilerError> {
        let entry = self.entry.ok_or(CompilerError::EntryNotDefined)?;
        self.module.finalize_definitions()?;
        let code = self.module.get_finalized_function(entry);
        log::debug!("Program finalized, entry routine at {:p}", code);
        // The program keeps the module alive: it owns the executable memory.
        Ok(CompiledProgram::new(self.module, code))
    }
}
