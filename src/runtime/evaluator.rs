use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::parser::{BinaryOp, Block, Call, Node, Program, RoutineKind, UnaryOp, Var};
use crate::runtime::{CallStack, FrameKind, Value};

/// Name of the temporary root frame used by [`Evaluator::evaluate_expression`]
pub const EXPRESSION_FRAME: &str = "expression";

/// Default for [`EvaluatorConfig::max_call_depth`]
///
/// Every routine call recurses through several evaluator frames, so this stays
/// well inside a 2 MiB thread stack in unoptimized builds. Raise it only when
/// evaluating on a thread with a larger stack.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 64;

/// Evaluator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Maximum number of live frames, root frame included (default: 64)
    pub max_call_depth: usize,
    /// Capture the root frame dump in [`Outcome::dump`] (default: false)
    pub dump_bindings: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            dump_bindings: false,
        }
    }
}

impl EvaluatorConfig {
    /// Loads a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Result of evaluating a program
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    /// Program name
    pub program: String,
    /// Final root-frame bindings
    pub bindings: BTreeMap<String, Value>,
    /// Frame dump taken just before the root frame was discarded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dump: Option<String>,
}

impl Outcome {
    /// Looks up a final binding by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Final bindings as a JSON object
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(&self.bindings)
    }
}

/// Tree-walking evaluator for minipas programs
///
/// Each node kind is handled by one arm of [`Evaluator::visit`]; expression
/// nodes produce `Some(value)`, statements produce `None`.
pub struct Evaluator {
    config: EvaluatorConfig,
    stack: CallStack,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Creates an evaluator with the default configuration
    pub fn new() -> Self {
        Self::with_config(EvaluatorConfig::default())
    }

    /// Creates an evaluator with a custom configuration
    pub fn with_config(config: EvaluatorConfig) -> Self {
        Evaluator {
            config,
            stack: CallStack::new(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Runs a program in a fresh root frame and returns its final bindings
    pub fn evaluate(&mut self, program: &Program) -> Result<Outcome> {
        let result = self.visit_program(program);
        if result.is_err() {
            self.stack.clear();
        }
        result
    }

    /// Evaluates a single expression
    ///
    /// Uses the active frame, or a temporary root frame when no program is running.
    pub fn evaluate_expression(&mut self, node: &Node) -> Result<Value> {
        let temporary = self.stack.is_empty();
        if temporary {
            self.stack.push_root(EXPRESSION_FRAME);
        }

        let result = self.eval_value(node);
        if temporary || result.is_err() {
            self.stack.clear();
        }
        result
    }

    fn visit_program(&mut self, program: &Program) -> Result<Outcome> {
        debug!(program = %program.name, "program started");
        self.stack.push_root(&program.name);

        self.visit_block(&program.block)?;

        let dump = self.config.dump_bindings.then(|| self.stack.dump());
        let bindings = self
            .stack
            .pop()
            .map(|frame| frame.members.into_iter().collect())
            .unwrap_or_default();

        match &dump {
            Some(text) => debug!(program = %program.name, "program finished\n{}", text),
            None => debug!(program = %program.name, "program finished"),
        }

        Ok(Outcome {
            program: program.name.clone(),
            bindings,
            dump,
        })
    }

    fn visit_block(&mut self, block: &Block) -> Result<()> {
        self.visit_statements(&block.declarations)?;
        self.visit_statements(&block.body.children)
    }

    /// Dispatches on the node kind
    fn visit(&mut self, node: &Node) -> Result<Option<Value>> {
        match node {
            Node::Num(n) => Ok(Some(Value::Number(*n))),
            Node::Boolean(b) => Ok(Some(Value::Boolean(*b))),

            Node::Var(var) => self.visit_var(var).map(Some),
            Node::UnaryOp { op, operand } => self.visit_unary(*op, operand).map(Some),
            Node::BinaryOp { op, left, right } => self.visit_binary(*op, left, right).map(Some),

            Node::Assign { target, value } => {
                self.visit_assign(target, value)?;
                Ok(None)
            }

            Node::Compound(compound) => {
                self.visit_statements(&compound.children)?;
                Ok(None)
            }

            Node::Block(block) => {
                self.visit_block(block)?;
                Ok(None)
            }

            Node::FunctionDecl(decl) => {
                self.stack.set(&decl.name, Value::routine(decl.clone()))?;
                Ok(None)
            }

            Node::Call(call) => self.visit_call(call),

            Node::Program(program) => {
                self.visit_program(program)?;
                Ok(None)
            }

            Node::NoOp | Node::VarDecl(_) | Node::Type(_) | Node::Param(_) => Ok(None),
        }
    }

    // Arm bodies live in separate non-inlined functions so the dispatch frame,
    // which sits on every level of a routine call, stays small.

    #[inline(never)]
    fn visit_var(&mut self, var: &Var) -> Result<Value> {
        match self.stack.get(&var.name) {
            Some(value) => Ok(value.clone()),
            None => Err(Error::UndefinedVariable {
                name: var.name.clone(),
            }),
        }
    }

    #[inline(never)]
    fn visit_unary(&mut self, op: UnaryOp, operand: &Node) -> Result<Value> {
        let value = self.eval_value(operand)?;
        apply_unary_op(op, value)
    }

    #[inline(never)]
    fn visit_binary(&mut self, op: BinaryOp, left: &Node, right: &Node) -> Result<Value> {
        let left = self.eval_value(left)?;
        let right = self.eval_value(right)?;
        apply_binary_op(op, left, right)
    }

    #[inline(never)]
    fn visit_assign(&mut self, target: &Var, value: &Node) -> Result<()> {
        let value = self.eval_value(value)?;
        trace!(name = %target.name, value = %value, depth = self.stack.depth(), "assign");
        self.stack.set(&target.name, value)
    }

    #[inline(never)]
    fn visit_statements(&mut self, statements: &[Node]) -> Result<()> {
        for statement in statements {
            self.visit(statement)?;
        }
        Ok(())
    }

    #[inline(never)]
    fn visit_call(&mut self, call: &Call) -> Result<Option<Value>> {
        let decl = match self.stack.get_routine(&call.name).and_then(Value::as_routine) {
            Some(decl) => Arc::clone(decl),
            None => {
                return Err(match self.stack.get(&call.name) {
                    Some(other) => Error::NotCallable {
                        name: call.name.clone(),
                        type_name: other.type_name(),
                    },
                    None => Error::UndefinedFunction {
                        name: call.name.clone(),
                    },
                })
            }
        };

        // Arguments are evaluated in the caller's frame
        let args = call
            .args
            .iter()
            .map(|arg| self.eval_value(arg))
            .collect::<Result<Vec<_>>>()?;

        if args.len() != decl.params.len() {
            return Err(Error::ArityMismatch {
                name: decl.name.clone(),
                expected: decl.params.len(),
                got: args.len(),
            });
        }

        if self.stack.depth() >= self.config.max_call_depth {
            return Err(Error::CallDepthExceeded {
                limit: self.config.max_call_depth,
            });
        }

        let kind = match decl.kind {
            RoutineKind::Function => FrameKind::Function,
            RoutineKind::Procedure => FrameKind::Procedure,
        };
        self.stack.push_call(&decl.name, kind);
        debug!(routine = %decl.name, depth = self.stack.depth(), "call entered");

        for (param, value) in decl.params.iter().zip(args) {
            self.stack.set(&param.var.name, value)?;
        }

        self.visit_block(&decl.block)?;

        let frame = self.stack.pop();
        debug!(routine = %decl.name, depth = self.stack.depth(), "call exited");

        Ok(match decl.kind {
            RoutineKind::Function => frame.and_then(|mut f| f.members.remove(&decl.name)),
            RoutineKind::Procedure => None,
        })
    }

    /// Evaluates a node that must produce a value
    fn eval_value(&mut self, node: &Node) -> Result<Value> {
        match self.visit(node)? {
            Some(value) => Ok(value),
            None => Err(match node {
                Node::Call(call) => Error::NoReturnValue {
                    name: call.name.clone(),
                },
                _ => Error::TypeError {
                    expected: "expression".to_string(),
                    got: "statement".to_string(),
                },
            }),
        }
    }
}

fn apply_unary_op(op: UnaryOp, value: Value) -> Result<Value> {
    match op {
        UnaryOp::Plus => {
            value.as_int()?;
            Ok(value)
        }
        UnaryOp::Minus => Ok(Value::Number(value.as_int()?.wrapping_neg())),
        UnaryOp::Not => {
            value.as_int()?;
            Ok(Value::Boolean(!value.is_truthy()))
        }
    }
}

fn apply_binary_op(op: BinaryOp, left: Value, right: Value) -> Result<Value> {
    // Both operands are checked up front, there is no short-circuiting
    let l = left.as_int()?;
    let r = right.as_int()?;

    Ok(match op {
        BinaryOp::Add => Value::Number(l.wrapping_add(r)),
        BinaryOp::Sub => Value::Number(l.wrapping_sub(r)),
        BinaryOp::Mul => Value::Number(l.wrapping_mul(r)),
        BinaryOp::Div => {
            if r == 0 {
                return Err(Error::DivisionByZero);
            }
            Value::Number(l.wrapping_div(r))
        }

        BinaryOp::And => Value::Boolean(left.is_truthy() && right.is_truthy()),
        BinaryOp::Or => Value::Boolean(left.is_truthy() || right.is_truthy()),

        BinaryOp::Eq => Value::Boolean(l == r),
        BinaryOp::NotEq => Value::Boolean(l != r),
        BinaryOp::Lt => Value::Boolean(l < r),
        BinaryOp::LtEq => Value::Boolean(l <= r),
        BinaryOp::Gt => Value::Boolean(l > r),
        BinaryOp::GtEq => Value::Boolean(l >= r),
    })
}
