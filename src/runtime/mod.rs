//! Runtime execution for minipas programs using tree-walking evaluation

mod activation;
mod evaluator;
mod value;

pub use activation::{ActivationRecord, CallStack, FrameKind};
pub use evaluator::{Evaluator, EvaluatorConfig, Outcome, DEFAULT_MAX_CALL_DEPTH, EXPRESSION_FRAME};
pub use value::Value;
