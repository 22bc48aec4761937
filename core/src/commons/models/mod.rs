pub mod environment;
pub mod return_code;
