use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Original text of the token
    pub lexeme: String,
    /// Line number where token appears (1-indexed)
    pub line: usize,
    /// Column number where token starts (1-indexed)
    pub column: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, lexeme: String, line: usize, column: usize) -> Self {
        Token {
            kind,
            lexeme,
            line,
            column,
        }
    }

    /// Integer value carried by an integer literal
    pub fn int_value(&self) -> Option<i64> {
        match self.kind {
            TokenKind::IntegerConst(n) => Some(n),
            _ => None,
        }
    }

    /// Spelling carried by an identifier
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

/// All possible token types in minipas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    /// Integer literal
    IntegerConst(i64),
    /// TRUE keyword
    True,
    /// FALSE keyword
    False,

    /// Identifier (exact-case spelling)
    Identifier(String),

    // Keywords
    /// PROGRAM keyword
    Program,
    /// BEGIN keyword
    Begin,
    /// END keyword
    End,
    /// VAR keyword
    Var,
    /// INTEGER type keyword
    Integer,
    /// BOOLEAN type keyword
    Boolean,
    /// FUNCTION keyword
    Function,
    /// PROCEDURE keyword
    Procedure,

    // Operators
    /// Plus operator (+)
    Plus,
    /// Minus operator (-)
    Minus,
    /// Multiply operator (*)
    Multiply,
    /// Divide operator (/)
    Divide,
    /// Assignment operator (:=)
    Assign,
    /// Equality operator (==)
    Equal,
    /// Inequality operator (!=)
    NotEqual,
    /// Less than operator (<)
    Less,
    /// Less than or equal operator (<=)
    LessEqual,
    /// Greater than operator (>)
    Greater,
    /// Greater than or equal operator (>=)
    GreaterEqual,
    /// Logical AND operator (&&)
    And,
    /// Logical OR operator (||)
    Or,
    /// Logical NOT operator (!)
    Not,

    // Delimiters
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Semicolon delimiter
    Semi,
    /// Colon delimiter
    Colon,
    /// Comma delimiter
    Comma,
    /// Dot (program terminator)
    Dot,

    // Special
    /// End of input marker
    Eof,
}

lazy_static! {
    /// Reserved words, matched by exact (case-sensitive) spelling
    static ref RESERVED_KEYWORDS: HashMap<&'static str, TokenKind> = {
        let mut m = HashMap::new();
        m.insert("PROGRAM", TokenKind::Program);
        m.insert("BEGIN", TokenKind::Begin);
        m.insert("END", TokenKind::End);
        m.insert("VAR", TokenKind::Var);
        m.insert("INTEGER", TokenKind::Integer);
        m.insert("BOOLEAN", TokenKind::Boolean);
        m.insert("FUNCTION", TokenKind::Function);
        m.insert("PROCEDURE", TokenKind::Procedure);
        m.insert("TRUE", TokenKind::True);
        m.insert("FALSE", TokenKind::False);
        m
    };
}

impl TokenKind {
    /// Check if token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Program
                | TokenKind::Begin
                | TokenKind::End
                | TokenKind::Var
                | TokenKind::Integer
                | TokenKind::Boolean
                | TokenKind::Function
                | TokenKind::Procedure
                | TokenKind::True
                | TokenKind::False
        )
    }

    /// Get keyword from its exact spelling
    pub fn keyword(s: &str) -> Option<TokenKind> {
        RESERVED_KEYWORDS.get(s).cloned()
    }

    /// True when both kinds are the same variant, ignoring carried data
    pub fn same_kind(&self, other: &TokenKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Human-readable name used in syntax errors
    pub fn describe(&self) -> String {
        match self {
            TokenKind::IntegerConst(_) => "integer".to_string(),
            TokenKind::Identifier(name) if name.is_empty() => "identifier".to_string(),
            TokenKind::Identifier(name) => format!("identifier `{}`", name),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("`{}`", other),
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let text = match self {
            TokenKind::IntegerConst(n) => return write!(f, "{}", n),
            TokenKind::Identifier(id) => return write!(f, "{}", id),
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Program => "PROGRAM",
            TokenKind::Begin => "BEGIN",
            TokenKind::End => "END",
            TokenKind::Var => "VAR",
            TokenKind::Integer => "INTEGER",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Function => "FUNCTION",
            TokenKind::Procedure => "PROCEDURE",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Multiply => "*",
            TokenKind::Divide => "/",
            TokenKind::Assign => ":=",
            TokenKind::Equal => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Not => "!",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::Semi => ";",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Eof => "<eof>",
        };
        write!(f, "{}", text)
    }
}
