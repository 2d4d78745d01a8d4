use crate::compiler_frontend::tokenizer::tokens::{TextLocation, TokenKind};
use std::fmt;

/// Root of the tree. Owns every function, which own everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub functions: Vec<Function>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub body: Block,
    pub location: TextLocation,
}

/// `name` or `name[]` in a parameter list.
/// Array parameters receive the base address of the caller's array.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub is_array: bool,
    pub location: TextLocation,
}

/// One lexical scope
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
}

/// `name` or `name[size]` inside a `let`.
/// The size stays as the literal text until codegen reserves the storage.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub name: String,
    pub array_size: Option<String>,
    pub location: TextLocation,
}

impl VariableDeclaration {
    pub fn is_array(&self) -> bool {
        self.array_size.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub location: TextLocation,
}

impl Statement {
    pub fn new(kind: StatementKind, location: TextLocation) -> Self {
        Self { kind, location }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Block(Block),
    Expression(Expression),
    Let(Vec<VariableDeclaration>),
    Return(Option<Expression>),
    Loop(Block),
    Break,
    Continue,

    // Condition, Then, Else
    If(Expression, Block, Option<Block>),

    // Target, Value
    Assignment(Expression, Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub location: TextLocation,
}

impl Expression {
    pub fn new(kind: ExpressionKind, location: TextLocation) -> Self {
        Self { kind, location }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    IntegerLiteral(String),
    VariableAccess(String),

    // Array name, Index
    ArrayAccess(String, Box<Expression>),

    // Function name, Arguments
    FunctionCall(String, Vec<Expression>),

    // Left, Right, Operator
    BinaryOperation(Box<Expression>, Box<Expression>, Operator),

    // Operand, Operator
    UnaryOperation(Box<Expression>, Operator),
}

/// The operator symbol of a binary or unary node.
/// `Add` and `Subtract` double as unary plus and minus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
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

impl Operator {
    pub fn relational(kind: &TokenKind) -> Option<Operator> {
        match kind {
            TokenKind::LessThan => Some(Operator::LessThan),
            TokenKind::LessThanOrEqual => Some(Operator::LessThanOrEqual),
            TokenKind::GreaterThan => Some(Operator::GreaterThan),
            TokenKind::GreaterThanOrEqual => Some(Operator::GreaterThanOrEqual),
            TokenKind::Equal => Some(Operator::Equal),
            TokenKind::NotEqual => Some(Operator::NotEqual),
            _ => None,
        }
    }

    pub fn additive(kind: &TokenKind) -> Option<Operator> {
        match kind {
            TokenKind::Add => Some(Operator::Add),
            TokenKind::Subtract => Some(Operator::Subtract),
            TokenKind::BitXor => Some(Operator::BitXor),
            TokenKind::BitOr => Some(Operator::BitOr),
            _ => None,
        }
    }

    pub fn multiplicative(kind: &TokenKind) -> Option<Operator> {
        match kind {
            TokenKind::ShiftLeft => Some(Operator::ShiftLeft),
            TokenKind::ShiftRight => Some(Operator::ShiftRight),
            TokenKind::BitAnd => Some(Operator::BitAnd),
            TokenKind::Multiply => Some(Operator::Multiply),
            TokenKind::Divide => Some(Operator::Divide),
            TokenKind::Modulus => Some(Operator::Modulus),
            _ => None,
        }
    }

    pub fn unary(kind: &TokenKind) -> Option<Operator> {
        match kind {
            TokenKind::Add => Some(Operator::Add),
            TokenKind::Subtract => Some(Operator::Subtract),
            TokenKind::BitNot => Some(Operator::BitNot),
            TokenKind::Not => Some(Operator::Not),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulus => "%",
            Operator::BitAnd => "&",
            Operator::BitOr => "|",
            Operator::BitXor => "^",
            Operator::BitNot => "~",
            Operator::Not => "!",
            Operator::ShiftLeft => "<<",
            Operator::ShiftRight => ">>",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// Fully parenthesised form, used by the show_ast logging and parser tests
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::IntegerLiteral(value) => write!(f, "{value}"),
            ExpressionKind::VariableAccess(name) => write!(f, "{name}"),
            ExpressionKind::ArrayAccess(name, index) => write!(f, "{name}[{index}]"),
            ExpressionKind::FunctionCall(name, args) => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            ExpressionKind::BinaryOperation(left, right, op) => {
                write!(f, "({left} {op} {right})")
            }
            ExpressionKind::UnaryOperation(operand, op) => write!(f, "({op}{operand})"),
        }
    }
}
