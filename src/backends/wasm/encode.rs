//! WAT Encoder
//!
//! Assembles generated WAT text into a binary module and validates it.
//! Calls to functions that don't exist are only caught here,
//! the text generator resolves callees by name and nothing else.

use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::codegen_log;
use wasmparser::validate;

pub fn wat_to_wasm(wat_source: &str) -> Result<Vec<u8>, CompilerError> {
    let wasm = wat::parse_str(wat_source).map_err(|e| {
        CompilerError::wasm_generation_error(format!("Generated WAT could not be assembled: {e}"))
    })?;

    if let Err(e) = validate(&wasm) {
        return Err(CompilerError::wasm_generation_error(format!(
            "Generated WASM module is invalid: {e}"
        )));
    }

    codegen_log!(Green "Assembled ", #wasm.len(), " bytes of WASM");
    Ok(wasm)
}
