use evmjit_core::{get_default_settings, Compiler, CompilerSettings, OptLevel};

pub struct ProgramBuilder {
    settings: CompilerSettings,
}

#[allow(dead_code)]
impl ProgramBuilder {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            settings: get_default_settings().compiler,
        }
    }

    pub fn with_opt_level(mut self, opt_level: OptLevel) -> Self {
        self.settings.opt_level = opt_level;
        self
    }

    pub fn print_ir(mut self) -> Self {
        self.settings.print_ir = true;
        self
    }

    pub fn build(self) -> Compiler {
        Compiler::new(&self.settings).expect("Compiler could not be created")
    }
}
