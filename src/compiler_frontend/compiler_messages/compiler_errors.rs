use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize)]
pub enum ErrorMetaDataKey {
    VariableName,
    FunctionName,
    CompilationStage,

    // Token expectations for the parser
    ExpectedToken,
    FoundToken,

    // Optional suggestions
    PrimarySuggestion,  // One-line fix or top-level idea
    SuggestedInsertion, // Text that could be inserted
}

/// Every compilation failure is one of these.
/// Nothing is recovered, the first error stops the run.
#[derive(Debug, Clone, Serialize)]
pub struct CompilerError {
    pub msg: String,
    pub location: TextLocation,
    pub error_type: ErrorType,

    // Structured detail for tooling (and the --json output)
    pub metadata: HashMap<ErrorMetaDataKey, String>,
}

impl CompilerError {
    pub fn new(msg: impl Into<String>, location: TextLocation, error_type: ErrorType) -> Self {
        CompilerError {
            msg: msg.into(),
            location,
            error_type,
            metadata: HashMap::new(),
        }
    }

    pub fn with_file_path(mut self, file_path: PathBuf) -> Self {
        self.location.scope = file_path;
        self
    }

    pub fn with_error_type(mut self, error_type: ErrorType) -> Self {
        self.error_type = error_type;
        self
    }

    /// Create a compiler error (internal bug, not user's fault)
    pub fn compiler_error(msg: impl Into<String>) -> Self {
        CompilerError::new(msg, TextLocation::default(), ErrorType::Compiler)
    }

    /// Create a file system error for the given path
    pub fn file_error(path: &std::path::Path, msg: impl Into<String>) -> Self {
        CompilerError::new(
            msg,
            TextLocation::from_path(path.to_path_buf()),
            ErrorType::File,
        )
    }

    pub fn wasm_generation_error(msg: impl Into<String>) -> Self {
        CompilerError::new(msg, TextLocation::default(), ErrorType::WasmGeneration)
    }

    pub fn runtime_error(msg: impl Into<String>) -> Self {
        CompilerError::new(msg, TextLocation::default(), ErrorType::Runtime)
    }

    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            // Only fails on non-string map keys, which this type can't produce
            Err(e) => format!("{{\"msg\":\"failed to serialise error: {e}\"}}"),
        }
    }
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (line {}): {}",
            error_type_to_str(&self.error_type),
            self.location.start_pos.line_number,
            self.msg
        )
    }
}

impl std::error::Error for CompilerError {}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize)]
pub enum ErrorType {
    Lex,
    Syntax,
    Redeclaration,
    UndeclaredName,
    KindMismatch,
    Unassignable,
    UnsupportedOperation,
    Rule,
    WasmGeneration,
    Runtime,
    File,
    Config,
    Compiler,
}

pub fn error_type_to_str(e_type: &ErrorType) -> &'static str {
    match e_type {
        ErrorType::Lex => "Lexing Error",
        ErrorType::Syntax => "Syntax Error",
        ErrorType::Redeclaration => "Redeclaration",
        ErrorType::UndeclaredName => "Undeclared Name",
        ErrorType::KindMismatch => "Array/Scalar Mismatch",
        ErrorType::Unassignable => "Unassignable Expression",
        ErrorType::UnsupportedOperation => "Unsupported Operation",
        ErrorType::Rule => "Language Rule Violation",
        ErrorType::WasmGeneration => "WASM Generation",
        ErrorType::Runtime => "Runtime Error",
        ErrorType::File => "File Error",
        ErrorType::Config => "Malformed Config",
        ErrorType::Compiler => "Compiler Bug",
    }
}

/// Builds the metadata map used by the `return_*_error!` macros.
#[macro_export]
macro_rules! error_metadata {
    ($( $key:ident => $value:expr ),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map = std::collections::HashMap::new();
        $(
            map.insert(
                $crate::compiler_frontend::compiler_errors::ErrorMetaDataKey::$key,
                String::from($value),
            );
        )*
        map
    }};
}

/// Returns a new CompilerError of the given ErrorType variant.
/// The other macros in this file are shorthands for it.
///
/// Usage: `return_error!(Redeclaration, "message", location, { VariableName => "x" })`;
#[macro_export]
macro_rules! return_error {
    ($error_type:ident, $msg:expr, $loc:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: $msg.into(),
            location: $loc,
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::$error_type,
            metadata: $crate::error_metadata!($( $key => $value ),*),
        })
    };
    ($error_type:ident, $msg:expr, $loc:expr) => {
        $crate::return_error!($error_type, $msg, $loc, {})
    };
}

/// Returns a new CompilerError for characters the tokenizer can't make sense of.
///
/// Usage: `return_lex_error!("message", location, { CompilationStage => "Tokenization" })`;
#[macro_export]
macro_rules! return_lex_error {
    ($msg:expr, $loc:expr $(, { $( $key:ident => $value:expr ),* $(,)? })?) => {
        $crate::return_error!(Lex, $msg, $loc, { $($( $key => $value ),*)? })
    };
}

/// Returns a new CompilerError for syntax violations.
///
/// Syntax errors indicate malformed code, usually a token that the parser didn't expect.
/// These should say which token was expected and which one was found.
///
/// Usage:
/// `return_syntax_error!("message", location, {
///     ExpectedToken => "identifier",
///     FoundToken => "{",
///     CompilationStage => "Parsing",
/// })`;
#[macro_export]
macro_rules! return_syntax_error {
    ($msg:expr, $loc:expr $(, { $( $key:ident => $value:expr ),* $(,)? })?) => {
        $crate::return_error!(Syntax, $msg, $loc, { $($( $key => $value ),*)? })
    };
}

/// Returns a new CompilerError for semantic rule violations that don't have their own ErrorType.
///
/// Usage: `return_rule_error!("'break' used outside of a loop", location)`;
#[macro_export]
macro_rules! return_rule_error {
    ($msg:expr, $loc:expr $(, { $( $key:ident => $value:expr ),* $(,)? })?) => {
        $crate::return_error!(Rule, $msg, $loc, { $($( $key => $value ),*)? })
    };
}

/// Returns a new CompilerError for internal compiler bugs.
///
/// Compiler errors indicate bugs in the compiler itself, not user code issues.
#[macro_export]
macro_rules! return_compiler_error {
    ($fmt:expr, $($arg:expr),+ $(,)?) => {{
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::compiler_error(
            format!($fmt, $($arg),+),
        ));
    }};
    ($msg:expr) => {{
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::compiler_error($msg));
    }};
}

/// Returns a new CompilerError for a missing or unreadable file.
///
/// Usage: `return_file_error!(path, "message")`;
#[macro_export]
macro_rules! return_file_error {
    ($path:expr, $msg:expr) => {{
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::file_error(
            $path, $msg,
        ));
    }};
}

/// Returns a new CompilerError for a project config that doesn't make sense.
#[macro_export]
macro_rules! return_config_error {
    ($path:expr, $msg:expr) => {{
        return Err(
            $crate::compiler_frontend::compiler_errors::CompilerError::file_error($path, $msg)
                .with_error_type($crate::compiler_frontend::compiler_errors::ErrorType::Config),
        );
    }};
}
