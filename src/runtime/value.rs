use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::parser::{FunctionDecl, RoutineKind};

/// Runtime value representation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// 64-bit integer value
    Number(i64),
    /// Boolean value
    Boolean(bool),
    /// Declared FUNCTION or PROCEDURE (shared with the AST it came from)
    Function(#[serde(serialize_with = "serialize_routine")] Arc<FunctionDecl>),
}

fn serialize_routine<S>(decl: &Arc<FunctionDecl>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&RoutineLabel(decl))
}

struct RoutineLabel<'a>(&'a FunctionDecl);

impl fmt::Display for RoutineLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0.kind {
            RoutineKind::Function => write!(f, "<function {}>", self.0.name),
            RoutineKind::Procedure => write!(f, "<procedure {}>", self.0.name),
        }
    }
}

impl Value {
    /// Wraps a routine declaration as a callable value
    pub fn routine(decl: FunctionDecl) -> Self {
        Value::Function(Arc::new(decl))
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> String {
        match self {
            Value::Number(_) => "integer".to_string(),
            Value::Boolean(_) => "boolean".to_string(),
            Value::Function(decl) => match decl.kind {
                RoutineKind::Function => "function".to_string(),
                RoutineKind::Procedure => "procedure".to_string(),
            },
        }
    }

    /// Returns true if the value is truthy in a boolean context
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0,
            Value::Boolean(b) => *b,
            Value::Function(_) => true,
        }
    }

    /// Converts value to a 64-bit integer (booleans become 1 or 0)
    pub fn as_int(&self) -> Result<i64> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Boolean(b) => Ok(if *b { 1 } else { 0 }),
            Value::Function(_) => Err(Error::TypeError {
                expected: "integer".to_string(),
                got: self.type_name(),
            }),
        }
    }

    /// Returns the routine declaration, if this value is callable
    pub fn as_routine(&self) -> Option<&Arc<FunctionDecl>> {
        match self {
            Value::Function(decl) => Some(decl),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(true) => write!(f, "TRUE"),
            Value::Boolean(false) => write!(f, "FALSE"),
            Value::Function(decl) => write!(f, "{}", RoutineLabel(decl)),
        }
    }
}
