use crate::compiler_frontend::ast::ast_nodes::{Block, Statement, StatementKind};
use crate::compiler_frontend::ast::build_ast::{parse_block, skip_if};
use crate::compiler_frontend::ast::expressions::parse_expression::parse_expression;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokens::{FileTokens, TokenKind};

/// Everything after `if`.
///
/// `if cond { ... } else if cond { ... } else { ... }`
///
/// The condition is any expression, parentheses are just grouping.
/// An `else if` becomes a block holding a single nested If.
pub fn parse_if(token_stream: &mut FileTokens) -> Result<StatementKind, CompilerError> {
    let condition = parse_expression(token_stream)?;
    let then_block = parse_block(token_stream)?;

    if !skip_if(token_stream, &TokenKind::Else) {
        return Ok(StatementKind::If(condition, then_block, None));
    }

    let else_location = token_stream.current_location();
    let else_block = if skip_if(token_stream, &TokenKind::If) {
        Block {
            statements: vec![Statement::new(parse_if(token_stream)?, else_location)],
        }
    } else {
        parse_block(token_stream)?
    };

    Ok(StatementKind::If(condition, then_block, Some(else_block)))
}
