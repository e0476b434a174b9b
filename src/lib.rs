//! # minipas - A Small Pascal Interpreter
//!
//! A tree-walking interpreter for a simplified Pascal: integer and boolean
//! variables, arithmetic, comparison and logical operators, nested
//! `BEGIN ... END` blocks, and FUNCTION / PROCEDURE declarations with
//! positional parameters.
//!
//! ## Quick Start
//!
//! ```rust
//! use minipas::Value;
//!
//! # fn main() -> minipas::Result<()> {
//! let outcome = minipas::run(&[
//!     "PROGRAM demo;",
//!     "BEGIN",
//!     "    number := 2;",
//!     "    a := number;",
//!     "    b := 10 * a + 10 * number / 4;",
//!     "    c := a - - b",
//!     "END.",
//! ])?;
//!
//! assert_eq!(outcome.get("b"), Some(&Value::Number(25)));
//! assert_eq!(outcome.get("c"), Some(&Value::Number(27)));
//! # Ok(())
//! # }
//! ```
//!
//! ### Step by Step
//!
//! ```rust
//! use minipas::{Evaluator, EvaluatorConfig, Lexer, Parser, Value};
//!
//! # fn main() -> minipas::Result<()> {
//! let source = r#"
//!     FUNCTION square(n : INTEGER) : INTEGER;
//!     BEGIN
//!         square := n * n
//!     END;
//!     BEGIN
//!         x := square(7)
//!     END.
//! "#;
//!
//! // Tokens are pulled by the parser on demand
//! let mut parser = Parser::new(Lexer::from_source(source));
//! let program = parser.parse()?;
//!
//! let config = EvaluatorConfig {
//!     dump_bindings: true,
//!     ..Default::default()
//! };
//! let mut evaluator = Evaluator::with_config(config);
//! let outcome = evaluator.evaluate(&program)?;
//!
//! assert_eq!(outcome.get("x"), Some(&Value::Number(49)));
//! assert!(outcome.dump.unwrap().starts_with("main (kind=PROGRAM, level=1)"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Language Overview
//!
//! - **Types**: `INTEGER` (64-bit, wrapping) and `BOOLEAN` (`TRUE` / `FALSE`)
//! - **Operators** (loosest first): `== !=`, `||`, `&&`, `< <= > >=`, `+ -`, `* /`,
//!   then unary `+ - !`
//! - **Statements**: assignment `x := expr`, routine call `p(1, x)`, nested
//!   `BEGIN ... END`, and the empty statement
//! - **Comments**: `{ ... }`
//! - Keywords are upper-case and identifiers are case-sensitive
//!
//! Names resolve along the call chain: a routine sees the bindings of
//! whoever called it, not of the block it was declared in.
//!
//! ## Architecture
//!
//! ```text
//! Source lines → Lexer → Tokens → Parser → AST → Evaluator → Outcome
//! ```
//!
//! - [`Lexer`] - Scans tokens on demand with arbitrary lookahead
//! - [`Parser`] - Recursive descent into the [`Node`] tree
//! - [`Evaluator`] - Walks the tree over a [`CallStack`] of activation records
//! - [`Value`] - Runtime value representation
//!
//! ## Error Handling
//!
//! Every stage reports through the single [`Error`] type; the first error
//! aborts the run.
//!
//! ```rust
//! use minipas::{Error, ErrorStage};
//!
//! let err = minipas::run(&["BEGIN x := y + 1 END."]).unwrap_err();
//! assert_eq!(err.stage(), ErrorStage::Runtime);
//! assert_eq!(err.to_string(), "Undefined variable: y");
//!
//! let err = minipas::run(&["BEGIN a := 1 END"]).unwrap_err();
//! assert!(matches!(err, Error::UnexpectedToken { .. }));
//! ```
//!
//! ## Logging
//!
//! The interpreter emits `tracing` events (program start and finish, routine
//! entry and exit, assignments) and never installs a subscriber itself.

/// Version of the minipas interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;

// Re-export main types
pub use error::{Error, ErrorStage, Result};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{BinaryOp, Node, Parser, Program, UnaryOp};
pub use runtime::{
    ActivationRecord, CallStack, Evaluator, EvaluatorConfig, FrameKind, Outcome, Value,
    DEFAULT_MAX_CALL_DEPTH,
};

/// Parses newline-stripped source lines into a program
pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Program> {
    Parser::from_lines(lines).parse()
}

/// Parses newline-stripped source lines holding a single expression
pub fn parse_expression<S: AsRef<str>>(lines: &[S]) -> Result<Node> {
    Parser::from_lines(lines).parse_expression()
}

/// Evaluates a program with the default configuration
pub fn evaluate(program: &Program) -> Result<Outcome> {
    Evaluator::new().evaluate(program)
}

/// Parses and evaluates a program
pub fn run<S: AsRef<str>>(lines: &[S]) -> Result<Outcome> {
    evaluate(&parse(lines)?)
}
