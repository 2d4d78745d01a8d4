use crate::token_log;
use serde::Serialize;
use std::fmt;
use std::iter::Peekable;
use std::path::PathBuf;
use std::str::Chars;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CharPosition {
    pub line_number: u32,
    pub char_column: u32,
}

// Source lines are counted from 1
impl Default for CharPosition {
    fn default() -> Self {
        CharPosition {
            line_number: 1,
            char_column: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize)]
pub struct TextLocation {
    pub scope: PathBuf,
    pub start_pos: CharPosition,
    pub end_pos: CharPosition,
}

impl TextLocation {
    pub fn new(scope: PathBuf, start: CharPosition, end: CharPosition) -> Self {
        Self {
            scope,
            start_pos: start,
            end_pos: end,
        }
    }

    pub fn new_just_line(line_number: u32) -> Self {
        Self {
            scope: PathBuf::new(),
            start_pos: CharPosition {
                line_number,
                char_column: 0,
            },
            end_pos: CharPosition {
                line_number,
                char_column: 120, // Arbitrary number
            },
        }
    }

    pub fn from_path(scope: PathBuf) -> Self {
        Self {
            scope,
            ..Default::default()
        }
    }

    pub fn line(&self) -> u32 {
        self.start_pos.line_number
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: TextLocation,
}

impl Token {
    pub fn new(kind: TokenKind, location: TextLocation) -> Self {
        Self { kind, location }
    }

    /// The canonical source text of this token.
    /// Joining these back together gives the source without whitespace or comments.
    pub fn text(&self) -> String {
        self.kind.to_string()
    }
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum TokenKind {
    Eof,

    /// Variable or function name
    Symbol(String),

    /// Decimal digits exactly as written, leading zeros included
    IntLiteral(String),

    // Keywords
    Let,
    Break,
    Continue,
    Return,
    Loop,
    If,
    Else,

    // Grouping
    OpenParenthesis,
    CloseParenthesis,
    OpenCurly,
    CloseCurly,
    OpenBracket,
    CloseBracket,
    Comma,
    Colon,
    Assign,

    // Operators
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    Not,
    ShiftLeft,
    ShiftRight,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Equal,
    NotEqual,
}

impl TokenKind {
    pub fn keyword(text: &str) -> Option<TokenKind> {
        match text {
            "let" => Some(TokenKind::Let),
            "break" => Some(TokenKind::Break),
            "continue" => Some(TokenKind::Continue),
            "return" => Some(TokenKind::Return),
            "loop" => Some(TokenKind::Loop),
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            _ => None,
        }
    }

    /// Short description used in parser errors ("identifier", "'{'", ...)
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Eof => String::from("end of file"),
            TokenKind::Symbol(name) => format!("identifier '{name}'"),
            TokenKind::IntLiteral(value) => format!("integer '{value}'"),
            other => format!("'{other}'"),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Eof => "",
            TokenKind::Symbol(name) => name,
            TokenKind::IntLiteral(value) => value,
            TokenKind::Let => "let",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Return => "return",
            TokenKind::Loop => "loop",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::OpenParenthesis => "(",
            TokenKind::CloseParenthesis => ")",
            TokenKind::OpenCurly => "{",
            TokenKind::CloseCurly => "}",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Assign => "=",
            TokenKind::Add => "+",
            TokenKind::Subtract => "-",
            TokenKind::Multiply => "*",
            TokenKind::Divide => "/",
            TokenKind::Modulus => "%",
            TokenKind::BitAnd => "&",
            TokenKind::BitOr => "|",
            TokenKind::BitXor => "^",
            TokenKind::BitNot => "~",
            TokenKind::Not => "!",
            TokenKind::ShiftLeft => "<<",
            TokenKind::ShiftRight => ">>",
            TokenKind::LessThan => "<",
            TokenKind::LessThanOrEqual => "<=",
            TokenKind::GreaterThan => ">",
            TokenKind::GreaterThanOrEqual => ">=",
            TokenKind::Equal => "==",
            TokenKind::NotEqual => "!=",
        };

        f.write_str(text)
    }
}

/// The tokens of one source file and a cursor into them.
/// Always ends with an Eof token.
#[derive(Clone, Debug)]
pub struct FileTokens {
    pub tokens: Vec<Token>,
    pub src_path: PathBuf,
    pub index: usize,
}

impl FileTokens {
    pub fn new(src_path: PathBuf, tokens: Vec<Token>) -> FileTokens {
        FileTokens {
            src_path,
            tokens,
            index: 0,
        }
    }

    pub fn current_token_kind(&self) -> &TokenKind {
        &self.tokens[self.index].kind
    }

    pub fn current_location(&self) -> TextLocation {
        self.tokens[self.index].location.clone()
    }

    pub fn advance(&mut self) {
        match self.current_token_kind() {
            // Can't advance past End of File
            TokenKind::Eof => {
                token_log!(Red "Compiler tried to advance past EOF");
            }

            _ => {
                self.index += 1;
            }
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.current_token_kind() == &TokenKind::Eof
    }
}

pub struct TokenStream<'a> {
    pub file_path: &'a PathBuf,
    pub chars: Peekable<Chars<'a>>,
    pub position: CharPosition,
    pub start_position: CharPosition,
}

impl<'a> TokenStream<'a> {
    pub fn new(source_code: &'a str, file_path: &'a PathBuf) -> Self {
        Self {
            file_path,
            chars: source_code.chars().peekable(),
            position: CharPosition::default(),
            start_position: CharPosition::default(),
        }
    }

    pub fn next(&mut self) -> Option<char> {
        match self.chars.peek() {
            Some(c) => {
                if *c == '\n' {
                    self.position.line_number += 1;
                    self.position.char_column = 0;
                } else {
                    self.position.char_column += 1;
                }

                self.chars.next()
            }

            None => None,
        }
    }

    pub fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    /// Location from the start of the current token to the current position
    pub fn new_location(&mut self) -> TextLocation {
        let start_pos = self.start_position;
        self.update_start_position();
        TextLocation::new(self.file_path.to_owned(), start_pos, self.position)
    }

    pub fn update_start_position(&mut self) {
        self.start_position = self.position;
    }
}
