use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Configuration parameters of the JIT divided into categories.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct JitSettings {
    pub compiler: CompilerSettings,
    pub runtime: RuntimeSettings,
}

/// Code generation parameters.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CompilerSettings {
    /// Cranelift optimization level.
    #[serde(rename = "optlevel")]
    pub opt_level: OptLevel,
    /// Run the IR verifier on every defined routine
    pub verifier: bool,
    /// Dump the IR of every routine at debug level before it is defined.
    #[serde(rename = "printir")]
    pub print_ir: bool,
}

/// Invocation parameters.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RuntimeSettings {
    /// Initial size in bytes of the linear memory handed to each invocation.
    #[serde(rename = "memorysize")]
    pub memory_size: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OptLevel {
    None,
    Speed,
    SpeedAndSize,
}

impl OptLevel {
    pub fn as_flag(&self) -> &'static str {
        match self {
            OptLevel::None => "none",
            OptLevel::Speed => "speed",
            OptLevel::SpeedAndSize => "speed_and_size",
        }
    }
}

pub fn get_default_settings() -> JitSettings {
    JitSettings {
        compiler: CompilerSettings {
            opt_level: OptLevel::Speed,
            verifier: true,
            print_ir: false,
        },
        runtime: RuntimeSettings { memory_size: 0 },
    }
}

impl JitSettings {
    /// Layers the defaults, an optional settings file and `EVMJIT__*` environment variables.
    ///
    /// Nested keys use a double underscore, e.g. `EVMJIT__COMPILER__OPTLEVEL=none`.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&get_default_settings())?);
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        builder
            .add_source(
                Environment::with_prefix("EVMJIT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
