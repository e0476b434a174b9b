//! Parser for minipas
//!
//! Recursive descent over the token stream produced by [`crate::lexer::Lexer`],
//! building the AST defined in [`ast`].

pub mod ast;
mod descent;

pub use ast::{
    BinaryOp, Block, Call, Compound, FunctionDecl, Node, Param, Program, RoutineKind, TypeName,
    TypeSpec, UnaryOp, Var, VarDecl,
};
pub use descent::{Parser, DEFAULT_PROGRAM_NAME};
