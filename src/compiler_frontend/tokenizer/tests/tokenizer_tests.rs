use crate::compiler_frontend::compiler_errors::{ErrorMetaDataKey, ErrorType};
use crate::compiler_frontend::tokenizer::tokenizer::tokenize;
use crate::compiler_frontend::tokenizer::tokens::{FileTokens, TokenKind};
use proptest::prelude::*;
use std::path::Path;

fn tokens_of(source: &str) -> FileTokens {
    tokenize(source, Path::new("test.spr")).expect("tokenization should succeed")
}

fn kinds_of(source: &str) -> Vec<TokenKind> {
    tokens_of(source)
        .tokens
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

fn symbol(name: &str) -> TokenKind {
    TokenKind::Symbol(name.to_string())
}

fn int(value: &str) -> TokenKind {
    TokenKind::IntLiteral(value.to_string())
}

#[test]
fn empty_source_is_just_eof() {
    assert_eq!(kinds_of(""), vec![TokenKind::Eof]);
    assert_eq!(kinds_of("  \n\t // only a comment"), vec![TokenKind::Eof]);
}

#[test]
fn keywords_and_symbols_are_told_apart() {
    assert_eq!(
        kinds_of("let letter loop looped if iffy else return break continue"),
        vec![
            TokenKind::Let,
            symbol("letter"),
            TokenKind::Loop,
            symbol("looped"),
            TokenKind::If,
            symbol("iffy"),
            TokenKind::Else,
            TokenKind::Return,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn identifiers_can_contain_digits_and_underscores() {
    assert_eq!(
        kinds_of("_tmp x1 a_b_2"),
        vec![symbol("_tmp"), symbol("x1"), symbol("a_b_2"), TokenKind::Eof]
    );
}

#[test]
fn integer_literals_keep_leading_zeros() {
    assert_eq!(
        kinds_of("007 0 42"),
        vec![int("007"), int("0"), int("42"), TokenKind::Eof]
    );
}

#[test]
fn two_character_operators_win_over_prefixes() {
    assert_eq!(
        kinds_of("<= < << >= > >> == = != !"),
        vec![
            TokenKind::LessThanOrEqual,
            TokenKind::LessThan,
            TokenKind::ShiftLeft,
            TokenKind::GreaterThanOrEqual,
            TokenKind::GreaterThan,
            TokenKind::ShiftRight,
            TokenKind::Equal,
            TokenKind::Assign,
            TokenKind::NotEqual,
            TokenKind::Not,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn operators_need_no_surrounding_whitespace() {
    assert_eq!(
        kinds_of("a[i]=b%2^~c"),
        vec![
            symbol("a"),
            TokenKind::OpenBracket,
            symbol("i"),
            TokenKind::CloseBracket,
            TokenKind::Assign,
            symbol("b"),
            TokenKind::Modulus,
            int("2"),
            TokenKind::BitXor,
            TokenKind::BitNot,
            symbol("c"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn single_slash_is_division_and_double_slash_is_a_comment() {
    assert_eq!(
        kinds_of("a / b // c / d\ne"),
        vec![
            symbol("a"),
            TokenKind::Divide,
            symbol("b"),
            symbol("e"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn vertical_tab_and_form_feed_are_whitespace() {
    assert_eq!(
        kinds_of("a\x0Bb\x0Cc\r\n"),
        vec![symbol("a"), symbol("b"), symbol("c"), TokenKind::Eof]
    );
}

#[test]
fn tokens_record_their_line_and_columns() {
    let tokens = tokens_of("main() {\n  let total\n}");

    let total = tokens
        .tokens
        .iter()
        .find(|token| token.kind == symbol("total"))
        .expect("expected the 'total' token");

    assert_eq!(total.location.line(), 2);
    assert_eq!(total.location.start_pos.char_column, 6);
    assert_eq!(total.location.end_pos.char_column, 11);
    assert_eq!(total.location.scope, Path::new("test.spr"));
}

#[test]
fn invalid_character_is_a_lex_error() {
    let error = tokenize("main() { let x$ }", Path::new("test.spr"))
        .expect_err("'$' should not tokenize");

    assert_eq!(error.error_type, ErrorType::Lex);
    assert!(error.msg.contains("'$'"));
    assert_eq!(
        error.metadata.get(&ErrorMetaDataKey::FoundToken),
        Some(&String::from("$"))
    );
}

#[test]
fn non_ascii_letters_are_not_identifiers() {
    let error = tokenize("é", Path::new("test.spr")).expect_err("'é' should not tokenize");
    assert_eq!(error.error_type, ErrorType::Lex);
}

#[test]
fn file_tokens_cursor_stops_at_eof() {
    let mut tokens = tokens_of("a b");

    assert_eq!(tokens.current_token_kind(), &symbol("a"));

    tokens.advance();
    assert_eq!(tokens.current_token_kind(), &symbol("b"));

    tokens.advance();
    assert!(tokens.is_at_end());

    tokens.advance();
    assert!(tokens.is_at_end());
}

fn any_token_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z_][a-z0-9_]{0,6}",
        "[0-9]{1,6}",
        prop::sample::select(vec![
            "(", ")", "{", "}", "[", "]", ",", "=", "+", "-", "*", "/", "%", "&", "|", "^",
            "~", "!", "<<", ">>", "<", "<=", ">", ">=", "==", "!=",
        ])
        .prop_map(String::from),
    ]
}

proptest! {
    // Joining the token texts back up gives the source with the whitespace removed
    #[test]
    fn token_texts_rebuild_the_source(pieces in prop::collection::vec(any_token_text(), 0..40)) {
        let source = pieces.join(" ");
        let tokens = tokens_of(&source);

        let rebuilt: String = tokens.tokens.iter().map(|token| token.text()).collect();
        let expected: String = source.chars().filter(|ch| !ch.is_whitespace()).collect();

        prop_assert_eq!(rebuilt, expected);
        prop_assert_eq!(tokens.tokens.last().map(|token| &token.kind), Some(&TokenKind::Eof));
    }
}
