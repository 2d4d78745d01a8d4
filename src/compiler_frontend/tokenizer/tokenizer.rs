use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokens::{FileTokens, Token, TokenKind, TokenStream};
use crate::{return_lex_error, settings, token_log};
use std::path::Path;

#[macro_export]
macro_rules! return_token {
    ($kind:expr, $stream:expr $(,)?) => {
        return Ok(Token::new($kind, $stream.new_location()))
    };
}

pub fn tokenize(source_code: &str, src_path: &Path) -> Result<FileTokens, CompilerError> {
    let initial_capacity = source_code.len() / settings::SRC_TO_TOKEN_RATIO;
    let src_path = src_path.to_path_buf();

    let mut tokens: Vec<Token> = Vec::with_capacity(initial_capacity);
    let mut stream = TokenStream::new(source_code, &src_path);

    loop {
        let token = get_token_kind(&mut stream)?;
        token_log!(#token);

        let is_eof = token.kind == TokenKind::Eof;
        tokens.push(token);

        if is_eof {
            break;
        }
    }

    Ok(FileTokens::new(src_path.to_owned(), tokens))
}

// Same set the lexer has always accepted, '\x0B' (vertical tab) included
fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

fn is_symbol_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_symbol_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Skips whitespace and line comments.
/// A lone '/' is left in the stream for the operator rules.
fn skip_trivia(stream: &mut TokenStream) {
    loop {
        match stream.peek() {
            Some(&ch) if is_whitespace(ch) => {
                stream.next();
            }

            Some(&'/') => {
                let mut lookahead = stream.chars.clone();
                lookahead.next();
                if lookahead.peek() != Some(&'/') {
                    return;
                }

                while let Some(&ch) = stream.peek() {
                    if ch == '\n' {
                        break;
                    }
                    stream.next();
                }
            }

            _ => return,
        }
    }
}

pub fn get_token_kind(stream: &mut TokenStream) -> Result<Token, CompilerError> {
    skip_trivia(stream);

    // To ignore leading whitespace for the next token position
    stream.update_start_position();

    let current_char = match stream.next() {
        Some(ch) => ch,
        None => return_token!(TokenKind::Eof, stream),
    };

    // Two character operators must win over their one character prefixes
    let next_char = stream.peek().copied();
    let double = match (current_char, next_char) {
        ('=', Some('=')) => Some(TokenKind::Equal),
        ('!', Some('=')) => Some(TokenKind::NotEqual),
        ('<', Some('<')) => Some(TokenKind::ShiftLeft),
        ('<', Some('=')) => Some(TokenKind::LessThanOrEqual),
        ('>', Some('>')) => Some(TokenKind::ShiftRight),
        ('>', Some('=')) => Some(TokenKind::GreaterThanOrEqual),
        _ => None,
    };

    if let Some(kind) = double {
        stream.next();
        return_token!(kind, stream);
    }

    let single = match current_char {
        '~' => Some(TokenKind::BitNot),
        '^' => Some(TokenKind::BitXor),
        '*' => Some(TokenKind::Multiply),
        '%' => Some(TokenKind::Modulus),
        '(' => Some(TokenKind::OpenParenthesis),
        ')' => Some(TokenKind::CloseParenthesis),
        ':' => Some(TokenKind::Colon),
        '{' => Some(TokenKind::OpenCurly),
        '}' => Some(TokenKind::CloseCurly),
        '[' => Some(TokenKind::OpenBracket),
        ']' => Some(TokenKind::CloseBracket),
        '+' => Some(TokenKind::Add),
        '-' => Some(TokenKind::Subtract),
        '<' => Some(TokenKind::LessThan),
        '>' => Some(TokenKind::GreaterThan),
        '!' => Some(TokenKind::Not),
        '=' => Some(TokenKind::Assign),
        '&' => Some(TokenKind::BitAnd),
        '|' => Some(TokenKind::BitOr),
        '/' => Some(TokenKind::Divide),
        ',' => Some(TokenKind::Comma),
        _ => None,
    };

    if let Some(kind) = single {
        return_token!(kind, stream);
    }

    // Integers are kept as written, no normalisation until codegen
    if current_char.is_ascii_digit() {
        let mut token_value = String::from(current_char);
        while let Some(&ch) = stream.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            token_value.push(ch);
            stream.next();
        }

        return_token!(TokenKind::IntLiteral(token_value), stream);
    }

    if is_symbol_start(current_char) {
        let mut token_value = String::from(current_char);
        while let Some(&ch) = stream.peek() {
            if !is_symbol_char(ch) {
                break;
            }
            token_value.push(ch);
            stream.next();
        }

        match TokenKind::keyword(&token_value) {
            Some(keyword) => return_token!(keyword, stream),
            None => return_token!(TokenKind::Symbol(token_value), stream),
        }
    }

    let character = current_char.escape_debug().to_string();
    return_lex_error!(
        format!("Invalid character '{character}'"),
        stream.new_location(),
        {
            CompilationStage => "Tokenization",
            FoundToken => character,
        }
    )
}
