pub mod ast;
pub mod symbols;
pub mod tokenizer;

pub mod compiler_messages {
    pub mod compiler_dev_logging;
    pub mod compiler_errors;
    pub mod display_messages;
}
pub use compiler_messages::compiler_errors;
pub use compiler_messages::display_messages;

use crate::backends::wasm::wat_module::{WatOptions, generate_wat};
use crate::compiler_frontend::ast::ast_nodes::Program;
use crate::compiler_frontend::ast::build_ast::parse_program;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokenizer::tokenize;
use crate::compiler_frontend::tokenizer::tokens::FileTokens;
use crate::settings::Config;
use crate::{ast_log, codegen_log};
use std::path::Path;

/// Flags change the behavior of the core compiler pipeline.
/// For the built-in CLI these are added as cli flags.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Flag {
    EmitWasm,
    JsonErrors,
    DisableTimers,
}

/// Runs one source file through each stage.
/// Every stage consumes the previous stage's output, nothing is shared between files.
pub struct CompilerFrontend<'a> {
    pub(crate) project_config: &'a Config,
}

impl<'a> CompilerFrontend<'a> {
    pub fn new(project_config: &'a Config) -> Self {
        Self { project_config }
    }

    /// -----------------------------
    /// TOKENIZER
    /// -----------------------------
    pub fn source_to_tokens(
        &self,
        source_code: &str,
        module_path: &Path,
    ) -> Result<FileTokens, CompilerError> {
        match tokenize(source_code, module_path) {
            Ok(tokens) => Ok(tokens),
            Err(e) => Err(e.with_file_path(module_path.to_path_buf())),
        }
    }

    /// -----------------------------
    /// AST CREATION
    /// -----------------------------
    /// One or more functions, then the end of the file.
    /// Nothing is resolved yet, names are checked during codegen.
    pub fn tokens_to_ast(&self, mut tokens: FileTokens) -> Result<Program, CompilerError> {
        let program = parse_program(&mut tokens)?;
        ast_log!("AST: ", #program);
        Ok(program)
    }

    /// -----------------------------
    /// WAT GENERATION
    /// -----------------------------
    /// Scopes, name mangling and stack frames all happen here in a single walk.
    pub fn ast_to_wat(&self, program: &Program) -> Result<String, CompilerError> {
        let options = WatOptions {
            memory_pages: self.project_config.memory_pages,
        };

        let wat = generate_wat(program, &options)?;
        codegen_log!(Dark "Generated WAT:\n", wat);
        Ok(wat)
    }

    /// Source text straight to WAT text.
    /// Errors from every stage carry the module path.
    pub fn compile_source(&self, source_code: &str, module_path: &Path) -> Result<String, CompilerError> {
        let tokens = self.source_to_tokens(source_code, module_path)?;
        let program = self
            .tokens_to_ast(tokens)
            .map_err(|e| with_path_if_missing(e, module_path))?;

        self.ast_to_wat(&program)
            .map_err(|e| with_path_if_missing(e, module_path))
    }
}

// Internal errors aren't tied to a token, so they don't know their file yet
fn with_path_if_missing(error: CompilerError, module_path: &Path) -> CompilerError {
    if error.location.scope.as_os_str().is_empty() {
        error.with_file_path(module_path.to_path_buf())
    } else {
        error
    }
}
