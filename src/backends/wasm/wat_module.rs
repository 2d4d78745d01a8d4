//! Module-level WAT generation.
//!
//! Produces one text module per program:
//!
//! - host imports (`env.print`, `env.putch`)
//! - linear memory, its export and the `$stack_ptr` global, only when some function uses arrays
//! - one `(result i32)` function per source function, in source order
//! - the `main` export
//!
//! Output only depends on the AST, so the same program always produces the same text.

use crate::backends::wasm::constants::{
    DEFAULT_MIN_PAGES, ENTRY_FUNCTION, HOST_FUNCTIONS, HOST_MODULE, MAX_PAGES, STACK_POINTER,
    WAT_INDENT,
};
use crate::backends::wasm::function_context::FunctionContext;
use crate::compiler_frontend::ast::ast_nodes::{Block, Function, Program, StatementKind};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::symbols::symbol_table::SymbolTable;
use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use crate::{codegen_log, return_compiler_error, return_error};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatOptions {
    /// Minimum size of linear memory in 64KB pages, when the module has memory at all
    pub memory_pages: u32,
}

impl Default for WatOptions {
    fn default() -> Self {
        Self {
            memory_pages: DEFAULT_MIN_PAGES,
        }
    }
}

pub fn generate_wat(program: &Program, options: &WatOptions) -> Result<String, CompilerError> {
    if options.memory_pages == 0 || options.memory_pages > MAX_PAGES {
        return_compiler_error!(
            "Memory pages must be between 1 and {}, got {}",
            MAX_PAGES,
            options.memory_pages
        );
    }

    check_function_table(program)?;

    let uses_stack = program_uses_stack(program);
    let pad = WAT_INDENT;
    let mut wat = String::from("(module\n");

    for host_function in HOST_FUNCTIONS {
        wat.push_str(&format!(
            "{pad}(import \"{HOST_MODULE}\" \"{host_function}\" (func ${host_function} (param i32) (result i32)))\n"
        ));
    }

    if uses_stack {
        wat.push_str(&format!("{pad}(memory {})\n", options.memory_pages));
        wat.push_str(&format!("{pad}(export \"memory\" (memory 0))\n"));
        wat.push_str(&format!(
            "{pad}(global {STACK_POINTER} (mut i32) (i32.const 0))\n"
        ));
    }

    // One table reused for every function, each function resets it on entry
    let mut symbols = SymbolTable::new();

    for function in &program.functions {
        wat.push_str(&lower_function(function, &mut symbols, uses_stack)?);
    }

    wat.push_str(&format!(
        "{pad}(export \"{ENTRY_FUNCTION}\" (func ${ENTRY_FUNCTION}))\n"
    ));
    wat.push_str(")\n");

    Ok(wat)
}

fn lower_function(
    function: &Function,
    symbols: &mut SymbolTable,
    uses_stack: bool,
) -> Result<String, CompilerError> {
    codegen_log!(Blue "Lowering function ", Bright #function.name);

    let mut context = FunctionContext::new(symbols);

    // Parameters live in the function's outermost scope.
    // The body is a block, so it gets a scope of its own on top.
    context.with_scope(|context| {
        for parameter in &function.parameters {
            let symbol = context.symbols.declare_parameter(parameter)?;
            context.add_param(&symbol.mangled_name);
        }

        context.lower_block(&function.body)
    })?;

    Ok(context.finish(function, uses_stack))
}

/// Function names must be unique, can't shadow host imports, and one of them must be `main`
pub fn check_function_table(program: &Program) -> Result<(), CompilerError> {
    let mut declared: FxHashMap<&str, &TextLocation> = FxHashMap::default();

    for function in &program.functions {
        if HOST_FUNCTIONS.contains(&function.name.as_str()) {
            return_error!(
                Redeclaration,
                format!("'{}' is a built in function and can't be redefined", function.name),
                function.location.to_owned(),
                {
                    CompilationStage => "Codegen",
                    FunctionName => function.name.as_str(),
                    PrimarySuggestion => "Rename this function",
                }
            )
        }

        if let Some(first) = declared.insert(&function.name, &function.location) {
            return_error!(
                Redeclaration,
                format!(
                    "Function '{}' is already declared on line {}",
                    function.name,
                    first.line()
                ),
                function.location.to_owned(),
                {
                    CompilationStage => "Codegen",
                    FunctionName => function.name.as_str(),
                }
            )
        }
    }

    if !declared.contains_key(ENTRY_FUNCTION) {
        let location = program
            .functions
            .last()
            .map(|function| function.location.to_owned())
            .unwrap_or_default();

        return_error!(
            UndeclaredName,
            format!("The program has no '{ENTRY_FUNCTION}' function to start from"),
            location,
            {
                CompilationStage => "Codegen",
                FunctionName => ENTRY_FUNCTION,
                PrimarySuggestion => "Add a 'main() { ... }' function",
            }
        )
    }

    Ok(())
}

/// True when any function declares or receives an array
pub fn program_uses_stack(program: &Program) -> bool {
    program.functions.iter().any(|function| {
        function.parameters.iter().any(|parameter| parameter.is_array)
            || block_declares_array(&function.body)
    })
}

fn block_declares_array(block: &Block) -> bool {
    block.statements.iter().any(|statement| match &statement.kind {
        StatementKind::Let(declarations) => declarations.iter().any(|d| d.is_array()),
        StatementKind::Block(inner) | StatementKind::Loop(inner) => block_declares_array(inner),
        StatementKind::If(_, then_block, else_block) => {
            block_declares_array(then_block)
                || else_block.as_ref().is_some_and(block_declares_array)
        }
        StatementKind::Expression(_)
        | StatementKind::Return(_)
        | StatementKind::Break
        | StatementKind::Continue
        | StatementKind::Assignment(..) => false,
    })
}
