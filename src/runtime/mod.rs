pub mod host_output;
pub mod jit;
