
use crate::backends::wasm::wat_module::{WatOptions, generate_wat};
use crate::compiler_frontend::ast::build_ast::parse_program;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokenizer::tokenize;
use std::path::Path;

fn compile_with(source: &str, options: &WatOptions) -> Result<String, CompilerError> {
    let mut tokens = tokenize(source, Path::new("test.spr")).expect("tokenization should succeed");
    let program = parse_program(&mut tokens).expect("program should parse");
    generate_wat(&program, options)
}

fn compile(source: &str) -> Result<String, CompilerError> {
    compile_with(source, &WatOptions::default())
}

/// Each line of the output with its indentation stripped
fn instructions(wat: &str) -> Vec<&str> {
    wat.lines().map(str::trim).collect()
}

/// True when `expected` appears as consecutive lines somewhere in the output
fn has_sequence(wat: &str, expected: &[&str]) -> bool {
    instructions(wat)
        .windows(expected.len())
        .any(|window| window == expected)
}
