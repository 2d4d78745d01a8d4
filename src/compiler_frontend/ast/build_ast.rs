//! Recursive descent over the token stream.
//!
//! Every rule consumes exactly the tokens it recognises and leaves the cursor on the
//! first token after them. One token of lookahead is all the grammar needs.
//! The first unexpected token stops the parse.

use crate::compiler_frontend::ast::ast_nodes::{
    Block, Expression, Function, Program, Statement, StatementKind,
};
use crate::compiler_frontend::ast::expressions::parse_expression::parse_expression;
use crate::compiler_frontend::ast::statements::branching::parse_if;
use crate::compiler_frontend::ast::statements::declarations::{parse_let, parse_parameters};
use crate::compiler_frontend::ast::statements::loops::parse_loop;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokens::{FileTokens, TextLocation, TokenKind};
use crate::{ast_log, return_syntax_error};

/// Program := Function+ Eof
pub fn parse_program(token_stream: &mut FileTokens) -> Result<Program, CompilerError> {
    let mut functions = Vec::new();

    // A program needs at least one function, so an empty file fails on the first expect
    loop {
        functions.push(parse_function(token_stream)?);

        if token_stream.is_at_end() {
            break;
        }
    }

    Ok(Program { functions })
}

/// Function := Symbol '(' Parameters ')' Block
pub fn parse_function(token_stream: &mut FileTokens) -> Result<Function, CompilerError> {
    let (name, location) = expect_symbol(token_stream, "a function name")?;
    ast_log!("Parsing function ", Green #name);

    expect_token(token_stream, TokenKind::OpenParenthesis, "after the function name")?;
    let parameters = parse_parameters(token_stream)?;
    expect_token(token_stream, TokenKind::CloseParenthesis, "after the parameters")?;

    let body = parse_block(token_stream)?;

    Ok(Function {
        name,
        parameters,
        body,
        location,
    })
}

/// Block := '{' Statement* '}'
pub fn parse_block(token_stream: &mut FileTokens) -> Result<Block, CompilerError> {
    expect_token(token_stream, TokenKind::OpenCurly, "to open a block")?;

    let mut statements = Vec::new();
    while token_stream.current_token_kind() != &TokenKind::CloseCurly {
        if token_stream.is_at_end() {
            return_syntax_error!(
                "Unexpected end of file inside a block",
                token_stream.current_location(),
                {
                    CompilationStage => "Parsing",
                    ExpectedToken => "'}'",
                    FoundToken => "end of file",
                    SuggestedInsertion => "}",
                }
            )
        }

        statements.push(parse_statement(token_stream)?);
    }

    expect_token(token_stream, TokenKind::CloseCurly, "to close a block")?;

    Ok(Block { statements })
}

/// Statement := Let | Block | If | Loop | Break | Continue | Return
///            | Expression ('=' Expression)?
pub fn parse_statement(token_stream: &mut FileTokens) -> Result<Statement, CompilerError> {
    let location = token_stream.current_location();

    let kind = match token_stream.current_token_kind() {
        TokenKind::Let => {
            token_stream.advance();
            StatementKind::Let(parse_let(token_stream)?)
        }

        TokenKind::OpenCurly => StatementKind::Block(parse_block(token_stream)?),

        TokenKind::If => {
            token_stream.advance();
            parse_if(token_stream)?
        }

        TokenKind::Loop => {
            token_stream.advance();
            parse_loop(token_stream)?
        }

        TokenKind::Break => {
            token_stream.advance();
            StatementKind::Break
        }

        TokenKind::Continue => {
            token_stream.advance();
            StatementKind::Continue
        }

        TokenKind::Return => {
            token_stream.advance();

            // Nothing can follow a bare return inside its block
            if token_stream.current_token_kind() == &TokenKind::CloseCurly {
                StatementKind::Return(None)
            } else {
                StatementKind::Return(Some(parse_expression(token_stream)?))
            }
        }

        _ => parse_assignment_or_expression(token_stream)?,
    };

    let statement = Statement::new(kind, location);
    ast_log!(#statement.kind);

    Ok(statement)
}

// The target of an assignment is parsed as an ordinary expression first.
// Whether it can actually be assigned to is decided during codegen.
fn parse_assignment_or_expression(
    token_stream: &mut FileTokens,
) -> Result<StatementKind, CompilerError> {
    let target: Expression = parse_expression(token_stream)?;

    if skip_if(token_stream, &TokenKind::Assign) {
        let value = parse_expression(token_stream)?;
        return Ok(StatementKind::Assignment(target, value));
    }

    Ok(StatementKind::Expression(target))
}

/// Consumes the current token if it is `kind`
pub fn skip_if(token_stream: &mut FileTokens, kind: &TokenKind) -> bool {
    if token_stream.current_token_kind() == kind {
        token_stream.advance();
        return true;
    }

    false
}

/// Consumes a token of exactly this kind or fails with a syntax error.
/// `context` finishes the sentence "Expected X ...".
pub fn expect_token(
    token_stream: &mut FileTokens,
    kind: TokenKind,
    context: &str,
) -> Result<TextLocation, CompilerError> {
    let location = token_stream.current_location();

    if token_stream.current_token_kind() != &kind {
        let expected = kind.describe();
        let found = token_stream.current_token_kind().describe();

        return_syntax_error!(
            format!("Expected {expected} {context}, but found {found}"),
            location,
            {
                CompilationStage => "Parsing",
                ExpectedToken => expected,
                FoundToken => found,
            }
        )
    }

    token_stream.advance();
    Ok(location)
}

/// Consumes an identifier and returns its text
pub fn expect_symbol(
    token_stream: &mut FileTokens,
    what: &str,
) -> Result<(String, TextLocation), CompilerError> {
    let location = token_stream.current_location();

    if let TokenKind::Symbol(name) = token_stream.current_token_kind() {
        let name = name.to_owned();
        token_stream.advance();
        return Ok((name, location));
    }

    let found = token_stream.current_token_kind().describe();
    return_syntax_error!(
        format!("Expected {what}, but found {found}"),
        location,
        {
            CompilationStage => "Parsing",
            ExpectedToken => "identifier",
            FoundToken => found,
        }
    )
}
