use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use crate::error::{Error, Result};
use crate::runtime::Value;

/// Kind of code a frame was created for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Main program body
    Program,
    /// PROCEDURE invocation
    Procedure,
    /// FUNCTION invocation
    Function,
}

impl FrameKind {
    fn label(self) -> &'static str {
        match self {
            FrameKind::Program => "PROGRAM",
            FrameKind::Procedure => "PROCEDURE",
            FrameKind::Function => "FUNCTION",
        }
    }
}

/// Bindings for one program or routine invocation
#[derive(Debug, Clone)]
pub struct ActivationRecord {
    /// Program or routine name
    pub name: String,
    /// What this frame was created for
    pub kind: FrameKind,
    /// 1 for the root frame; calls inherit the caller's level
    pub nesting_level: usize,
    /// Index of the caller frame (None for the root frame)
    pub parent: Option<usize>,
    /// Variables bound in this frame
    pub members: HashMap<String, Value>,
}

impl ActivationRecord {
    /// Looks up a binding in this frame only
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.members.get(name)
    }

    /// Binds a value in this frame, overwriting any previous binding
    pub fn set(&mut self, name: &str, value: Value) {
        self.members.insert(name.to_string(), value);
    }
}

/// Stack of live activation records
///
/// Frames refer to their caller by index, so name resolution follows the
/// call chain rather than declaration nesting.
#[derive(Debug, Clone, Default)]
pub struct CallStack {
    frames: Vec<ActivationRecord>,
}

impl CallStack {
    /// Creates an empty call stack
    pub fn new() -> Self {
        CallStack { frames: Vec::new() }
    }

    /// Pushes the root frame for a program
    pub fn push_root(&mut self, name: &str) {
        self.frames.push(ActivationRecord {
            name: name.to_string(),
            kind: FrameKind::Program,
            nesting_level: 1,
            parent: None,
            members: HashMap::new(),
        });
    }

    /// Pushes a call frame whose parent is the currently active frame
    pub fn push_call(&mut self, name: &str, kind: FrameKind) {
        let parent = self.frames.len().checked_sub(1);
        let nesting_level = self.current().map(|f| f.nesting_level).unwrap_or(1);
        self.frames.push(ActivationRecord {
            name: name.to_string(),
            kind,
            nesting_level,
            parent,
            members: HashMap::new(),
        });
    }

    /// Removes and returns the active frame
    pub fn pop(&mut self) -> Option<ActivationRecord> {
        self.frames.pop()
    }

    /// The active frame, if any
    pub fn current(&self) -> Option<&ActivationRecord> {
        self.frames.last()
    }

    /// Number of live frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// True when no frame is live
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drops every frame
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Resolves a name from the active frame outward through its callers
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.chain().find_map(|frame| frame.get(name))
    }

    /// Resolves a name to the nearest routine binding, skipping plain values
    ///
    /// Inside a function its own name holds the result being built, while a
    /// call through that name still reaches the routine in an outer frame.
    pub fn get_routine(&self, name: &str) -> Option<&Value> {
        self.chain()
            .filter_map(|frame| frame.get(name))
            .find(|value| value.as_routine().is_some())
    }

    /// Binds a name in the active frame
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.set(name, value);
                Ok(())
            }
            None => Err(Error::UndefinedVariable {
                name: name.to_string(),
            }),
        }
    }

    /// All bindings reachable from the active frame, inner frames shadowing outer
    pub fn visible_bindings(&self) -> BTreeMap<String, Value> {
        let mut result = BTreeMap::new();
        for frame in self.chain() {
            for (k, v) in &frame.members {
                result.entry(k.clone()).or_insert_with(|| v.clone());
            }
        }
        result
    }

    /// Renders the active frame chain, innermost first
    ///
    /// Each frame is a `NAME (kind=KIND, level=N)` header followed by one
    /// tab-indented `name : value` line per binding, sorted by name.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for frame in self.chain() {
            let _ = writeln!(
                out,
                "{} (kind={}, level={})",
                frame.name,
                frame.kind.label(),
                frame.nesting_level
            );
            let sorted: BTreeMap<_, _> = frame.members.iter().collect();
            for (name, value) in sorted {
                let _ = writeln!(out, "\t{} : {}", name, value);
            }
        }
        out
    }

    fn chain(&self) -> impl Iterator<Item = &ActivationRecord> {
        let mut next = self.frames.len().checked_sub(1);
        std::iter::from_fn(move || {
            let idx = next?;
            let frame = self.frames.get(idx)?;
            next = frame.parent;
            Some(frame)
        })
    }
}
