// Direct JIT execution of compiled modules
//
// Uses Wasmer to compile and run a module in-process.
// Only `env.print` and `env.putch` are provided, which is everything generated modules import.

use crate::backends::wasm::constants::{ENTRY_FUNCTION, HOST_MODULE};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::runtime::host_output::HostOutput;
use crate::timer_log;
use std::sync::Arc;
use std::time::Instant;
use wasmer::{Function, Instance, Module, Store, Value, imports};

/// Runs the module's `main` export and returns its result
pub fn run_wasm(wasm_bytes: &[u8], output: Arc<dyn HostOutput>) -> Result<i32, CompilerError> {
    let time = Instant::now();
    let mut store = Store::default();

    let module = Module::new(&store, wasm_bytes).map_err(|e| {
        CompilerError::runtime_error(format!("Failed to compile WASM module: {e}"))
    })?;

    let print_output = Arc::clone(&output);
    let putch_output = output;

    let import_object = imports! {
        HOST_MODULE => {
            "print" => Function::new_typed(&mut store, move |value: i32| -> i32 {
                print_output.print(value);
                0
            }),
            "putch" => Function::new_typed(&mut store, move |value: i32| -> i32 {
                putch_output.putch(value);
                0
            }),
        }
    };

    let instance = Instance::new(&mut store, &module, &import_object).map_err(|e| {
        CompilerError::runtime_error(format!("Failed to instantiate WASM module: {e}"))
    })?;

    let main_function = instance.exports.get_function(ENTRY_FUNCTION).map_err(|e| {
        CompilerError::runtime_error(format!("Module has no '{ENTRY_FUNCTION}' export: {e}"))
    })?;

    let results = main_function
        .call(&mut store, &[])
        .map_err(|e| CompilerError::runtime_error(format!("Runtime error: {e}")))?;

    timer_log!(time, "Program ran in: ");

    match results.first() {
        Some(Value::I32(value)) => Ok(*value),
        other => Err(CompilerError::runtime_error(format!(
            "'{ENTRY_FUNCTION}' should return a single i32, but returned {other:?}"
        ))),
    }
}
