use cranelift_jit::JITModule;

use crate::runtime::{Runtime, RuntimeData};

type EntryRoutine = unsafe extern "C" fn(*mut u8, *mut RuntimeData) -> i32;

/// Executable result of a compilation.
///
/// Every invocation shares the module-wide record slot, so running the program requires
/// exclusive access to it.
pub struct CompiledProgram {
    module: Option<JITModule>,
    entry: EntryRoutine,
}

impl CompiledProgram {
    pub(crate) fn new(module: JITModule, code: *const u8) -> Self {
        // Safety: `code` is the finalized entry routine, declared with this exact signature.
        let entry = unsafe { std::mem::transmute::<*const u8, EntryRoutine>(code) };
        Self {
            module: Some(module),
            entry,
        }
    }

    /// Runs the entry routine over the record and linear memory of `runtime` and returns the
    /// raw status it produced.
    pub fn invoke(&mut self, runtime: &mut Runtime<'_>) -> i32 {
        let memory = runtime.memory_mut().as_mut_ptr();
        let record = runtime.data_ptr();
        // Safety: the record and the memory are owned by `runtime` and outlive the call; the
        // buffers the record points to are borrowed by `runtime` for its whole life.
        unsafe { (self.entry)(memory, record) }
    }
}

impl Drop for CompiledProgram {
    fn drop(&mut self) {
        if let Some(module) = self.module.take() {
            // Safety: no function pointer into the module survives the program.
            unsafe { module.free_memory() };
        }
    }
}
