use crate::compiler_frontend::ast::ast_nodes::StatementKind;
use crate::compiler_frontend::ast::build_ast::parse_block;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokens::FileTokens;

/// Everything after `loop`. The body repeats until a `break` or `return`.
pub fn parse_loop(token_stream: &mut FileTokens) -> Result<StatementKind, CompilerError> {
    let body = parse_block(token_stream)?;
    Ok(StatementKind::Loop(body))
}
