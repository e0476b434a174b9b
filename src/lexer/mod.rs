//! Lexical analysis for minipas
//!
//! Converts source lines into tokens on demand, with side-effect-free lookahead.

mod scanner;
mod token;

pub use scanner::Lexer;
pub use token::{Token, TokenKind};
