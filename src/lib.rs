//! sprout compiles a small curly-brace integer language to WebAssembly text.
//!
//! Pipeline: source → tokens → AST → WAT, with optional assembly to a binary module
//! and in-process execution through Wasmer.

pub mod backends {
    pub mod wasm;
}
pub mod build;
pub mod cli;
pub mod compiler_frontend;
pub mod runtime;
pub mod settings;

pub use compiler_frontend::Flag;

use crate::backends::wasm::encode::wat_to_wasm;
use crate::compiler_frontend::CompilerFrontend;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::runtime::host_output::HostOutput;
use crate::runtime::jit::run_wasm;
use crate::settings::Config;
use std::path::Path;
use std::sync::Arc;

/// Compiles in-memory source with the default settings
pub fn compile_to_wat(source_code: &str) -> Result<String, CompilerError> {
    let config = Config::default();
    CompilerFrontend::new(&config).compile_source(source_code, Path::new(""))
}

pub fn compile_to_wasm(source_code: &str) -> Result<Vec<u8>, CompilerError> {
    wat_to_wasm(&compile_to_wat(source_code)?)
}

/// Compiles, assembles and runs `main`, returning its result
pub fn run_source(source_code: &str, output: Arc<dyn HostOutput>) -> Result<i32, CompilerError> {
    let wasm = compile_to_wasm(source_code)?;
    run_wasm(&wasm, output)
}
