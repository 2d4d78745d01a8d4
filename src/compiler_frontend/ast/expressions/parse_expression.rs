//! Precedence climbing, lowest to highest:
//!
//! | level          | operators                 |
//! |----------------|---------------------------|
//! | relational     | `<  >  <=  >=  ==  !=`    |
//! | additive       | `+  -  ^  \|`             |
//! | multiplicative | `<<  >>  &  *  /  %`      |
//! | unary prefix   | `+  -  ~  !`              |
//! | primary        | literal, name, call, `[]`, `( )` |
//!
//! Binary levels fold to the left in a loop, so long chains build a left leaning tree
//! without recursing once per operator. Unary operators recurse into themselves and
//! so nest to the right.
//!
//! Every level of nesting in the finished tree counts towards `MAX_EXPRESSION_DEPTH`,
//! so neither the parser nor codegen can recurse deep enough to overflow the stack.

use crate::compiler_frontend::ast::ast_nodes::{Expression, ExpressionKind, Operator};
use crate::compiler_frontend::ast::build_ast::{expect_token, skip_if};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokens::{FileTokens, TextLocation, TokenKind};
use crate::settings::MAX_EXPRESSION_DEPTH;
use crate::{return_rule_error, return_syntax_error};

// Parses a fresh operand position at this nesting depth
type ParseOperand = fn(&mut FileTokens, usize) -> Result<Expression, CompilerError>;

pub fn parse_expression(token_stream: &mut FileTokens) -> Result<Expression, CompilerError> {
    parse_relational(token_stream, 0)
}

fn parse_relational(token_stream: &mut FileTokens, depth: usize) -> Result<Expression, CompilerError> {
    parse_left_associative(token_stream, depth, Operator::relational, parse_additive)
}

fn parse_additive(token_stream: &mut FileTokens, depth: usize) -> Result<Expression, CompilerError> {
    parse_left_associative(token_stream, depth, Operator::additive, parse_multiplicative)
}

fn parse_multiplicative(
    token_stream: &mut FileTokens,
    depth: usize,
) -> Result<Expression, CompilerError> {
    parse_left_associative(token_stream, depth, Operator::multiplicative, parse_unary)
}

/// One level deeper than `depth`, or a rule error once that passes the limit
fn nested(depth: usize, location: &TextLocation) -> Result<usize, CompilerError> {
    let depth = depth + 1;

    if depth > MAX_EXPRESSION_DEPTH {
        return_rule_error!(
            format!("This expression is nested more than {MAX_EXPRESSION_DEPTH} levels deep"),
            location.to_owned(),
            {
                CompilationStage => "Expression Parsing",
                PrimarySuggestion => "Split it up using some temporary variables",
            }
        )
    }

    Ok(depth)
}

// operand (op operand)* folded as ((a op b) op c) ...
// Each fold pushes everything before it one level further down the tree.
fn parse_left_associative(
    token_stream: &mut FileTokens,
    depth: usize,
    operator_at: fn(&TokenKind) -> Option<Operator>,
    parse_operand: ParseOperand,
) -> Result<Expression, CompilerError> {
    let mut left = parse_operand(token_stream, depth)?;
    let mut chain_depth = depth;

    while let Some(operator) = operator_at(token_stream.current_token_kind()) {
        chain_depth = nested(chain_depth, &token_stream.current_location())?;
        token_stream.advance();

        let right = parse_operand(token_stream, chain_depth)?;
        let location = left.location.clone();

        left = Expression::new(
            ExpressionKind::BinaryOperation(Box::new(left), Box::new(right), operator),
            location,
        );
    }

    Ok(left)
}

fn parse_unary(token_stream: &mut FileTokens, depth: usize) -> Result<Expression, CompilerError> {
    let Some(operator) = Operator::unary(token_stream.current_token_kind()) else {
        return parse_primary(token_stream, depth);
    };

    let location = token_stream.current_location();
    let depth = nested(depth, &location)?;
    token_stream.advance();

    let operand = parse_unary(token_stream, depth)?;

    Ok(Expression::new(
        ExpressionKind::UnaryOperation(Box::new(operand), operator),
        location,
    ))
}

fn parse_primary(token_stream: &mut FileTokens, depth: usize) -> Result<Expression, CompilerError> {
    let location = token_stream.current_location();

    match token_stream.current_token_kind().to_owned() {
        TokenKind::IntLiteral(value) => {
            token_stream.advance();
            Ok(Expression::new(ExpressionKind::IntegerLiteral(value), location))
        }

        // Grouping doesn't get a node of its own
        TokenKind::OpenParenthesis => {
            let depth = nested(depth, &location)?;
            token_stream.advance();
            let inner = parse_relational(token_stream, depth)?;
            expect_token(
                token_stream,
                TokenKind::CloseParenthesis,
                "to close the parenthesised expression",
            )?;
            Ok(inner)
        }

        TokenKind::Symbol(name) => {
            token_stream.advance();

            if skip_if(token_stream, &TokenKind::OpenBracket) {
                let index = parse_relational(token_stream, nested(depth, &location)?)?;
                expect_token(token_stream, TokenKind::CloseBracket, "after the array index")?;

                return Ok(Expression::new(
                    ExpressionKind::ArrayAccess(name, Box::new(index)),
                    location,
                ));
            }

            if skip_if(token_stream, &TokenKind::OpenParenthesis) {
                let arguments = parse_call_arguments(token_stream, nested(depth, &location)?)?;

                return Ok(Expression::new(
                    ExpressionKind::FunctionCall(name, arguments),
                    location,
                ));
            }

            Ok(Expression::new(ExpressionKind::VariableAccess(name), location))
        }

        other => {
            let found = other.describe();
            return_syntax_error!(
                format!("Expected an expression, but found {found}"),
                location,
                {
                    CompilationStage => "Expression Parsing",
                    ExpectedToken => "integer, identifier or '('",
                    FoundToken => found,
                }
            )
        }
    }
}

/// Arguments after the opening parenthesis, up to and including the closing one.
/// `f()` and `f(a)` are both fine.
fn parse_call_arguments(
    token_stream: &mut FileTokens,
    depth: usize,
) -> Result<Vec<Expression>, CompilerError> {
    let mut arguments = Vec::new();

    while token_stream.current_token_kind() != &TokenKind::CloseParenthesis {
        arguments.push(parse_relational(token_stream, depth)?);

        if !skip_if(token_stream, &TokenKind::Comma) {
            break;
        }
    }

    expect_token(
        token_stream,
        TokenKind::CloseParenthesis,
        "after the function arguments",
    )?;

    Ok(arguments)
}
