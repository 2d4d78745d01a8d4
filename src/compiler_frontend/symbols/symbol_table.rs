//! Symbol Table
//!
//! Maps source names to generated storage for one function at a time.
//!
//! - Every block gets a frame, frames are pushed and popped in strict LIFO order
//! - A name can only be declared once per frame, inner frames may shadow outer ones
//! - Lookups walk from the innermost frame outwards
//! - Array declarations reserve 4 byte cells on the function's stack frame.
//!   The cells are given back when the declaring scope exits,
//!   so sibling scopes reuse the same region.

use crate::compiler_frontend::ast::ast_nodes::{Parameter, VariableDeclaration};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use crate::settings::ARRAY_CELL_BYTES;
use crate::{codegen_log, return_compiler_error, return_error, return_rule_error};
use rustc_hash::FxHashMap;

/// Where a declared name lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Unique within the function, also the name of the WASM local
    pub mangled_name: String,
    pub is_array: bool,

    /// Cells reserved on the stack frame up to and including this array.
    /// The array's base is `stack_ptr - 4 * stack_offset`.
    /// None for scalars and array parameters (their storage belongs to the caller).
    pub stack_offset: Option<u32>,
}

#[derive(Debug, Default)]
struct ScopeFrame {
    symbols: FxHashMap<String, Symbol>,

    // Stack counter when this scope was entered, restored on exit
    stack_counter_on_entry: u32,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<ScopeFrame>,
    mangle_counter: usize,

    /// Cells used by arrays in the currently live scopes
    stack_counter: u32,

    /// Largest stack_counter seen in this function, decides the frame size
    frame_cells: u32,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything from the previous function.
    /// Mangled names restart from zero so output only depends on the function itself.
    pub fn reset_for_function(&mut self) {
        self.scopes.clear();
        self.mangle_counter = 0;
        self.stack_counter = 0;
        self.frame_cells = 0;
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(ScopeFrame {
            symbols: FxHashMap::default(),
            stack_counter_on_entry: self.stack_counter,
        });
    }

    pub fn exit_scope(&mut self) -> Result<(), CompilerError> {
        let Some(frame) = self.scopes.pop() else {
            return_compiler_error!("Tried to exit a scope when no scope was active");
        };

        self.stack_counter = frame.stack_counter_on_entry;
        Ok(())
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn stack_counter(&self) -> u32 {
        self.stack_counter
    }

    pub fn frame_cells(&self) -> u32 {
        self.frame_cells
    }

    /// Declares a `let` variable in the innermost scope
    pub fn declare(&mut self, declaration: &VariableDeclaration) -> Result<Symbol, CompilerError> {
        let stack_offset = match &declaration.array_size {
            Some(size) => Some(self.reserve_array_cells(&declaration.name, size, &declaration.location)?),
            None => None,
        };

        self.insert(
            &declaration.name,
            declaration.is_array(),
            stack_offset,
            &declaration.location,
        )
    }

    /// Parameters are declared into the function's outermost scope
    pub fn declare_parameter(&mut self, parameter: &Parameter) -> Result<Symbol, CompilerError> {
        self.insert(&parameter.name, parameter.is_array, None, &parameter.location)
    }

    pub fn lookup(&self, name: &str, location: &TextLocation) -> Result<&Symbol, CompilerError> {
        for scope in self.scopes.iter().rev() {
            if let Some(symbol) = scope.symbols.get(name) {
                return Ok(symbol);
            }
        }

        return_error!(
            UndeclaredName,
            format!("'{name}' is used here but was never declared in this scope"),
            location.to_owned(),
            {
                CompilationStage => "Name Resolution",
                VariableName => name,
                PrimarySuggestion => format!("Declare it first with 'let {name}'"),
            }
        )
    }

    fn insert(
        &mut self,
        name: &str,
        is_array: bool,
        stack_offset: Option<u32>,
        location: &TextLocation,
    ) -> Result<Symbol, CompilerError> {
        let mangled_name = format!("{name}_{}", self.mangle_counter);

        let Some(scope) = self.scopes.last_mut() else {
            return_compiler_error!("Declared '{}' with no active scope", name);
        };

        if scope.symbols.contains_key(name) {
            return_error!(
                Redeclaration,
                format!("'{name}' is already declared in this scope"),
                location.to_owned(),
                {
                    CompilationStage => "Name Resolution",
                    VariableName => name,
                    PrimarySuggestion => "Use a different name or declare it in an inner block",
                }
            )
        }

        let symbol = Symbol {
            mangled_name,
            is_array,
            stack_offset,
        };

        codegen_log!("Declared ", #name, " as ", #symbol);
        scope.symbols.insert(name.to_owned(), symbol.clone());
        self.mangle_counter += 1;

        Ok(symbol)
    }

    fn reserve_array_cells(
        &mut self,
        name: &str,
        size: &str,
        location: &TextLocation,
    ) -> Result<u32, CompilerError> {
        let max_cells = i32::MAX as u32 / ARRAY_CELL_BYTES;

        let cells = size
            .parse::<u32>()
            .ok()
            .and_then(|cells| self.stack_counter.checked_add(cells))
            .filter(|&total| total <= max_cells);

        let Some(stack_counter) = cells else {
            return_rule_error!(
                format!("Array '{name}' with {size} elements doesn't fit on the stack frame"),
                location.to_owned(),
                {
                    CompilationStage => "Name Resolution",
                    VariableName => name,
                }
            )
        };

        self.stack_counter = stack_counter;
        self.frame_cells = self.frame_cells.max(stack_counter);

        Ok(stack_counter)
    }
}
