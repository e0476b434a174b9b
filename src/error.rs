//! Error types for the minipas interpreter

use thiserror::Error;

/// minipas interpreter errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Lex errors
    /// A character that does not begin any valid token
    ///
    /// **Triggered by:** Characters outside the language alphabet, or a lone `=`, `&`, `|`
    /// **Example:** `a := 1 = 2` (equality is spelled `==`)
    #[error("Invalid character '{ch}' at line {line}, column {column}")]
    InvalidCharacter {
        /// Offending character
        ch: char,
        /// Line number where error occurred
        line: usize,
        /// Column number where error occurred
        column: usize,
    },

    /// Integer literal that does not fit the runtime integer type
    #[error("Invalid integer literal '{text}' at line {line}, column {column}")]
    InvalidInteger {
        /// Literal text as written
        text: String,
        /// Line number where error occurred
        line: usize,
        /// Column number where error occurred
        column: usize,
    },

    /// `{` comment without a closing `}`
    #[error("Unterminated comment starting at line {line}, column {column}")]
    UnterminatedComment {
        /// Line of the opening brace
        line: usize,
        /// Column of the opening brace
        column: usize,
    },

    /// Lookahead requested a token beyond the end of input
    #[error("Cannot peek {count} tokens ahead: input ends first")]
    PeekPastEnd {
        /// Requested lookahead distance
        count: usize,
    },

    // Parse errors
    /// Token of the wrong kind where the grammar requires another
    ///
    /// **Triggered by:** Any grammar mismatch; parsing stops at the first one
    /// **Example:** `BEGIN a := 1 END` (missing the final `.`)
    #[error("Syntax error at line {line}, column {column}: expected {expected}, found {found}")]
    UnexpectedToken {
        /// Expected token description
        expected: String,
        /// Actual token received
        found: String,
        /// Line number where error occurred
        line: usize,
        /// Column number where error occurred
        column: usize,
    },

    /// Statement list followed by an identifier that no statement consumed
    ///
    /// **Example:** `BEGIN a := 1 b := 2 END.` (missing `;`)
    #[error("Syntax error at line {line}, column {column}: missing `;` or END before `{name}`")]
    MissingSeparator {
        /// Identifier found after the statement list
        name: String,
        /// Line number where error occurred
        line: usize,
        /// Column number where error occurred
        column: usize,
    },

    // Runtime errors
    /// Reference to a variable bound nowhere in the frame chain
    ///
    /// **Triggered by:** Reading a variable before any assignment
    /// **Example:** `x := y + 1` (when y was never assigned)
    #[error("Undefined variable: {name}")]
    UndefinedVariable {
        /// Variable name
        name: String,
    },

    /// Call of a routine declared nowhere in the frame chain
    #[error("Undefined function: {name}")]
    UndefinedFunction {
        /// Routine name
        name: String,
    },

    /// Call of a name bound to a non-routine value
    #[error("Value is not callable: {name} is {type_name}")]
    NotCallable {
        /// Called name
        name: String,
        /// Type of the bound value
        type_name: String,
    },

    /// Call with the wrong number of actual arguments
    #[error("Wrong number of arguments for {name}: expected {expected}, got {got}")]
    ArityMismatch {
        /// Routine name
        name: String,
        /// Formal parameter count
        expected: usize,
        /// Actual argument count
        got: usize,
    },

    /// Operand of a type the operator cannot use
    #[error("Type error: expected {expected}, got {got}")]
    TypeError {
        /// Expected type
        expected: String,
        /// Actual type
        got: String,
    },

    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Routine call used as an expression produced no value
    ///
    /// **Triggered by:** Calling a procedure, or a function that never assigns its own name
    #[error("Call to {name} produced no value")]
    NoReturnValue {
        /// Routine name
        name: String,
    },

    /// Too many nested calls
    #[error("Call depth limit exceeded (max: {limit} frames)")]
    CallDepthExceeded {
        /// Configured maximum
        limit: usize,
    },
}

/// Pipeline stage an error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStage {
    /// Scanning source text into tokens
    Lex,
    /// Building the AST
    Parse,
    /// Evaluating the AST
    Runtime,
}

impl Error {
    /// Classify the stage that raised this error
    pub fn stage(&self) -> ErrorStage {
        match self {
            Error::InvalidCharacter { .. }
            | Error::InvalidInteger { .. }
            | Error::UnterminatedComment { .. }
            | Error::PeekPastEnd { .. } => ErrorStage::Lex,

            Error::UnexpectedToken { .. } | Error::MissingSeparator { .. } => ErrorStage::Parse,

            Error::UndefinedVariable { .. }
            | Error::UndefinedFunction { .. }
            | Error::NotCallable { .. }
            | Error::ArityMismatch { .. }
            | Error::TypeError { .. }
            | Error::DivisionByZero
            | Error::NoReturnValue { .. }
            | Error::CallDepthExceeded { .. } => ErrorStage::Runtime,
        }
    }

    /// True for errors raised while scanning
    pub fn is_lex_error(&self) -> bool {
        self.stage() == ErrorStage::Lex
    }

    /// True for errors raised while parsing
    pub fn is_parse_error(&self) -> bool {
        self.stage() == ErrorStage::Parse
    }

    /// True for errors raised while evaluating
    pub fn is_runtime_error(&self) -> bool {
        self.stage() == ErrorStage::Runtime
    }
}

/// Result type for minipas operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_classification() {
        let lex = Error::InvalidCharacter {
            ch: '#',
            line: 1,
            column: 3,
        };
        assert_eq!(lex.stage(), ErrorStage::Lex);
        assert!(lex.is_lex_error());

        let parse = Error::UnexpectedToken {
            expected: "`.`".to_string(),
            found: "end of input".to_string(),
            line: 1,
            column: 17,
        };
        assert!(parse.is_parse_error());

        assert!(Error::DivisionByZero.is_runtime_error());
        assert!(Error::PeekPastEnd { count: 3 }.is_lex_error());
    }

    #[test]
    fn test_messages() {
        let err = Error::UndefinedVariable {
            name: "y".to_string(),
        };
        assert_eq!(err.to_string(), "Undefined variable: y");

        let err = Error::ArityMismatch {
            name: "f".to_string(),
            expected: 2,
            got: 1,
        };
        assert!(err.to_string().contains("expected 2, got 1"));
    }
}
