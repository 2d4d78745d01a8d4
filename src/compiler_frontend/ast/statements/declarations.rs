use crate::compiler_frontend::ast::ast_nodes::{Parameter, VariableDeclaration};
use crate::compiler_frontend::ast::build_ast::{expect_symbol, expect_token, skip_if};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokens::{FileTokens, TokenKind};
use crate::return_syntax_error;

/// Everything after `let`: one or more comma separated declarations.
///
/// `let a, b[16], c`
pub fn parse_let(
    token_stream: &mut FileTokens,
) -> Result<Vec<VariableDeclaration>, CompilerError> {
    let mut declarations = vec![parse_variable_declaration(token_stream)?];

    while skip_if(token_stream, &TokenKind::Comma) {
        declarations.push(parse_variable_declaration(token_stream)?);
    }

    Ok(declarations)
}

fn parse_variable_declaration(
    token_stream: &mut FileTokens,
) -> Result<VariableDeclaration, CompilerError> {
    let (name, location) = expect_symbol(token_stream, "a variable name after 'let'")?;

    if !skip_if(token_stream, &TokenKind::OpenBracket) {
        return Ok(VariableDeclaration {
            name,
            array_size: None,
            location,
        });
    }

    // The size must be written as a literal, it decides the frame size at compile time
    let TokenKind::IntLiteral(size) = token_stream.current_token_kind().to_owned() else {
        let found = token_stream.current_token_kind().describe();
        return_syntax_error!(
            format!("Expected an integer array size for '{name}', but found {found}"),
            token_stream.current_location(),
            {
                CompilationStage => "Parsing",
                VariableName => name,
                ExpectedToken => "integer",
                FoundToken => found,
            }
        )
    };

    token_stream.advance();
    expect_token(token_stream, TokenKind::CloseBracket, "after the array size")?;

    Ok(VariableDeclaration {
        name,
        array_size: Some(size),
        location,
    })
}

/// Parameters between the parentheses of a function definition.
/// `name[]` marks an array parameter.
pub fn parse_parameters(token_stream: &mut FileTokens) -> Result<Vec<Parameter>, CompilerError> {
    let mut parameters = Vec::new();

    while token_stream.current_token_kind() != &TokenKind::CloseParenthesis {
        let (name, location) = expect_symbol(token_stream, "a parameter name")?;

        let is_array = skip_if(token_stream, &TokenKind::OpenBracket);
        if is_array {
            expect_token(
                token_stream,
                TokenKind::CloseBracket,
                "after '[' in an array parameter",
            )?;
        }

        parameters.push(Parameter {
            name,
            is_array,
            location,
        });

        if !skip_if(token_stream, &TokenKind::Comma) {
            break;
        }
    }

    Ok(parameters)
}
