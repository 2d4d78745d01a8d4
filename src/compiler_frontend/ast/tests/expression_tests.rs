use crate::compiler_frontend::ast::ast_nodes::{Expression, ExpressionKind, Operator};
use crate::compiler_frontend::ast::expressions::parse_expression::parse_expression;
use crate::compiler_frontend::compiler_errors::{CompilerError, ErrorMetaDataKey, ErrorType};
use crate::compiler_frontend::tokenizer::tokenizer::tokenize;
use crate::settings::MAX_EXPRESSION_DEPTH;
use std::path::Path;

fn parse(source: &str) -> Result<Expression, CompilerError> {
    let mut tokens = tokenize(source, Path::new("test.spr")).expect("tokenization should succeed");
    parse_expression(&mut tokens)
}

// Fully parenthesised rendering, so the tree shape is visible in one string
fn shape(source: &str) -> String {
    parse(source).expect("expression should parse").to_string()
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(shape("1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(shape("1 * 2 + 3"), "((1 * 2) + 3)");
}

#[test]
fn relational_is_the_loosest_level() {
    assert_eq!(shape("a + 1 < b * 2"), "((a + 1) < (b * 2))");
    assert_eq!(shape("a == b != c"), "((a == b) != c)");
}

#[test]
fn shifts_and_bitwise_and_share_the_multiplicative_level() {
    assert_eq!(shape("a + b << 2"), "(a + (b << 2))");
    assert_eq!(shape("a & b * c"), "((a & b) * c)");
}

#[test]
fn xor_and_or_share_the_additive_level() {
    assert_eq!(shape("a | b ^ c + d"), "(((a | b) ^ c) + d)");
    assert_eq!(shape("a | b & c"), "(a | (b & c))");
}

#[test]
fn binary_operators_fold_to_the_left() {
    assert_eq!(shape("5 - 3 - 1"), "((5 - 3) - 1)");
    assert_eq!(shape("8 / 4 / 2"), "((8 / 4) / 2)");
    assert_eq!(shape("a < b < c"), "((a < b) < c)");
}

#[test]
fn unary_operators_nest_to_the_right() {
    assert_eq!(shape("--5"), "(-(-5))");
    assert_eq!(shape("!~+x"), "(!(~(+x)))");
}

#[test]
fn unary_binds_tighter_than_binary() {
    assert_eq!(shape("-a * b"), "((-a) * b)");
    assert_eq!(shape("a - -b"), "(a - (-b))");
}

#[test]
fn parentheses_do_not_create_nodes() {
    let grouped = parse("((x))").expect("expression should parse");
    assert_eq!(grouped.kind, ExpressionKind::VariableAccess(String::from("x")));

    assert_eq!(shape("(1 + 2) * 3"), "((1 + 2) * 3)");
}

#[test]
fn array_access_and_calls() {
    assert_eq!(shape("w[i + 1]"), "w[(i + 1)]");
    assert_eq!(shape("f()"), "f()");
    assert_eq!(shape("f(a)"), "f(a)");
    assert_eq!(shape("f(a, g(b), w[0])"), "f(a, g(b), w[0])");
}

#[test]
fn call_arguments_keep_their_order() {
    let call = parse("sum(1, 2, 3)").expect("expression should parse");

    let ExpressionKind::FunctionCall(name, arguments) = call.kind else {
        panic!("expected a function call");
    };

    assert_eq!(name, "sum");
    let values: Vec<String> = arguments.iter().map(|argument| argument.to_string()).collect();
    assert_eq!(values, vec!["1", "2", "3"]);
}

#[test]
fn operator_nodes_carry_the_opcode() {
    let expression = parse("a >> 1").expect("expression should parse");

    let ExpressionKind::BinaryOperation(_, _, operator) = expression.kind else {
        panic!("expected a binary operation");
    };

    assert_eq!(operator, Operator::ShiftRight);
    assert_eq!(operator.symbol(), ">>");
}

#[test]
fn binary_node_location_is_its_left_operand() {
    let expression = parse("\n\n  a + b").expect("expression should parse");
    assert_eq!(expression.location.line(), 3);
}

#[test]
fn missing_operand_is_a_syntax_error() {
    let error = parse("1 + ").expect_err("should fail");
    assert_eq!(error.error_type, ErrorType::Syntax);
    assert_eq!(
        error.metadata.get(&ErrorMetaDataKey::FoundToken),
        Some(&String::from("end of file"))
    );
}

#[test]
fn unclosed_parenthesis_is_a_syntax_error() {
    let error = parse("(1 + 2").expect_err("should fail");
    assert_eq!(error.error_type, ErrorType::Syntax);
    assert!(error.msg.contains("')'"));
}

#[test]
fn unclosed_index_is_a_syntax_error() {
    let error = parse("w[1").expect_err("should fail");
    assert_eq!(error.error_type, ErrorType::Syntax);
    assert!(error.msg.contains("']'"));
}

#[test]
fn nesting_up_to_the_limit_parses() {
    let depth = MAX_EXPRESSION_DEPTH - 1;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(shape(&source), "1");

    let source = format!("{}1", "-".repeat(depth));
    assert!(parse(&source).is_ok());
}

#[test]
fn runaway_nesting_is_a_rule_error() {
    let sources = [
        format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000)),
        format!("{}1", "-".repeat(10_000)),
        format!("{}0{}", "f(".repeat(10_000), ")".repeat(10_000)),
        format!("{}0{}", "w[".repeat(10_000), "]".repeat(10_000)),
        format!("1{}", " + 1".repeat(10_000)),
    ];

    for source in &sources {
        let error = parse(source).expect_err("too deep");
        assert_eq!(error.error_type, ErrorType::Rule);
    }
}
