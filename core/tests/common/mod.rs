mod environment;
mod program_builder;

pub use environment::*;
pub use program_builder::*;
