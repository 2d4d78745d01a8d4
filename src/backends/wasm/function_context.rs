//! Per-function codegen state.
//!
//! Locals are collected separately from the instructions because WAT wants every
//! local declared before the first instruction, while `let` can appear anywhere.

use crate::backends::wasm::constants::{EXIT_LABEL, STACK_POINTER, WAT_INDENT};
use crate::backends::wasm::control_flow::{ControlFlowManager, LoopLabels};
use crate::compiler_frontend::ast::ast_nodes::Function;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::symbols::symbol_table::SymbolTable;
use crate::settings::ARRAY_CELL_BYTES;
use crate::codegen_log;

// module > func > exit block
const BODY_DEPTH: usize = 3;

pub struct FunctionContext<'a> {
    pub symbols: &'a mut SymbolTable,
    pub control_flow: ControlFlowManager,

    params: Vec<String>,
    locals: Vec<String>,
    instructions: String,
    depth: usize,
}

impl<'a> FunctionContext<'a> {
    pub fn new(symbols: &'a mut SymbolTable) -> Self {
        symbols.reset_for_function();

        Self {
            symbols,
            control_flow: ControlFlowManager::new(),
            params: Vec::new(),
            locals: Vec::new(),
            instructions: String::new(),
            depth: BODY_DEPTH,
        }
    }

    /// Writes one instruction on its own line at the current nesting depth
    pub fn emit(&mut self, instruction: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.instructions.push_str(WAT_INDENT);
        }
        self.instructions.push_str(instruction.as_ref());
        self.instructions.push('\n');
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn add_param(&mut self, mangled_name: &str) {
        self.params.push(mangled_name.to_owned());
    }

    pub fn add_local(&mut self, mangled_name: &str) {
        self.locals.push(mangled_name.to_owned());
    }

    /// Runs `lower` inside a new scope.
    /// The scope is popped whether or not `lower` succeeds.
    pub fn with_scope<T>(
        &mut self,
        lower: impl FnOnce(&mut Self) -> Result<T, CompilerError>,
    ) -> Result<T, CompilerError> {
        self.symbols.enter_scope();
        let result = lower(self);
        let exited = self.symbols.exit_scope();

        let value = result?;
        exited?;
        Ok(value)
    }

    /// Runs `lower` with a loop's labels as the target of `break` and `continue`
    pub fn with_loop<T>(
        &mut self,
        lower: impl FnOnce(&mut Self, &LoopLabels) -> Result<T, CompilerError>,
    ) -> Result<T, CompilerError> {
        let labels = self.control_flow.enter_loop();
        let result = lower(self, &labels);
        self.control_flow.exit_loop();
        result
    }

    /// Assembles the finished function.
    ///
    /// With a stack, the body runs between a prologue that reserves the whole frame
    /// and an epilogue that gives it back. Every `return` branches out of the
    /// `$exit` block, so the epilogue runs on all paths.
    pub fn finish(self, function: &Function, uses_stack: bool) -> String {
        let frame_bytes = self.symbols.frame_cells() * ARRAY_CELL_BYTES;
        codegen_log!("Function ", #function.name, " frame bytes: ", #frame_bytes);

        let pad = WAT_INDENT;
        let mut wat = String::with_capacity(self.instructions.len() * 2);

        wat.push_str(&format!("{pad}(func ${}", function.name));
        for param in &self.params {
            wat.push_str(&format!(" (param ${param} i32)"));
        }
        wat.push_str(" (result i32)\n");

        for local in &self.locals {
            wat.push_str(&format!("{pad}{pad}(local ${local} i32)\n"));
        }

        if uses_stack {
            wat.push_str(&format!("{pad}{pad};; prologue\n"));
            for line in frame_adjustment(frame_bytes, "i32.add") {
                wat.push_str(&format!("{pad}{pad}{line}\n"));
            }
        }

        wat.push_str(&format!("{pad}{pad}block {EXIT_LABEL} (result i32)\n"));
        wat.push_str(&self.instructions);
        wat.push_str(&format!("{pad}{pad}{pad}i32.const 0\n"));
        wat.push_str(&format!("{pad}{pad}end\n"));

        if uses_stack {
            wat.push_str(&format!("{pad}{pad};; epilogue\n"));
            for line in frame_adjustment(frame_bytes, "i32.sub") {
                wat.push_str(&format!("{pad}{pad}{line}\n"));
            }
        }

        wat.push_str(&format!("{pad})\n"));
        wat
    }
}

// Moves the global stack pointer by the frame size.
// The operand stack is left as it was, so this can sit after the exit block's result.
fn frame_adjustment(frame_bytes: u32, instruction: &str) -> [String; 4] {
    [
        format!("global.get {STACK_POINTER}"),
        format!("i32.const {frame_bytes}"),
        instruction.to_owned(),
        format!("global.set {STACK_POINTER}"),
    ]
}
