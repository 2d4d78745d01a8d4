//! # WASM Codegen Module
//!
//! Lowers the AST straight to WebAssembly text, then optionally assembles it.
//!
//! ```text
//! Program → check_function_table → lower each Function → WAT text → wat_to_wasm → bytes
//!                                        ↓
//!                              FunctionContext (locals, scopes, loop labels)
//! ```
//!
//! ## Memory model
//!
//! Scalars are WASM locals. Arrays live in linear memory on a stack that grows
//! upwards from address 0. Each function moves `$stack_ptr` up by its whole
//! frame on entry and back down on exit, and every array local holds the base
//! address of its elements. Modules without arrays have no memory at all.

pub mod constants;
pub mod control_flow;
pub mod encode;
pub mod function_context;
pub mod lower_expressions;
pub mod lower_statements;
pub mod wat_module;

#[cfg(test)]
mod tests;
