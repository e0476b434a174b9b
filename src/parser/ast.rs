use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete minipas program (root node)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Name from the `PROGRAM name;` header (`main` when omitted)
    pub name: String,
    /// Top-level block
    pub block: Block,
}

/// Declarations followed by a compound statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// `VarDecl` and `FunctionDecl` nodes, in source order
    pub declarations: Vec<Node>,
    /// Statement body
    pub body: Compound,
}

/// BEGIN ... END statement sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Compound {
    /// Statements in execution order
    pub children: Vec<Node>,
}

/// Variable reference, used both as an assignment target and as a read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Var {
    /// Variable name (exact spelling)
    pub name: String,
}

impl Var {
    /// Creates a variable reference
    pub fn new(name: impl Into<String>) -> Self {
        Var { name: name.into() }
    }
}

/// Built-in type names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeName {
    /// INTEGER
    Integer,
    /// BOOLEAN
    Boolean,
}

/// Type annotation in a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSpec {
    /// Declared type
    pub name: TypeName,
}

/// Variable declaration: `x : INTEGER`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    /// Declared variable
    pub var: Var,
    /// Declared type
    pub type_spec: TypeSpec,
}

/// Formal parameter: `a : BOOLEAN`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter variable
    pub var: Var,
    /// Parameter type
    pub type_spec: TypeSpec,
}

/// Whether a routine was declared with FUNCTION or PROCEDURE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutineKind {
    /// Produces a value by assigning to its own name
    Function,
    /// Never produces a value
    Procedure,
}

/// FUNCTION or PROCEDURE declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Routine name
    pub name: String,
    /// FUNCTION or PROCEDURE
    pub kind: RoutineKind,
    /// Formal parameters in positional order
    pub params: Vec<Param>,
    /// Declared result type (functions only, optional)
    pub return_type: Option<TypeSpec>,
    /// Routine body
    pub block: Block,
}

/// Routine call: `f(1, x)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    /// Callee name
    pub name: String,
    /// Actual argument expressions in positional order
    pub args: Vec<Node>,
}

/// AST nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    // Literals
    /// Integer literal
    Num(i64),
    /// Boolean literal
    Boolean(bool),

    /// Variable reference
    Var(Var),

    /// Unary operation
    UnaryOp {
        /// Unary operator to apply
        op: UnaryOp,
        /// Operand expression
        operand: Box<Node>,
    },

    /// Binary operation
    BinaryOp {
        /// Binary operator to apply
        op: BinaryOp,
        /// Left operand expression
        left: Box<Node>,
        /// Right operand expression
        right: Box<Node>,
    },

    /// Assignment: `target := value`
    Assign {
        /// Variable being written
        target: Var,
        /// Value expression
        value: Box<Node>,
    },

    /// BEGIN ... END
    Compound(Compound),
    /// Empty statement
    NoOp,

    // Declarations (no runtime effect beyond registering names)
    /// Variable declaration
    VarDecl(VarDecl),
    /// Type annotation
    Type(TypeSpec),
    /// Formal parameter
    Param(Param),
    /// Declarations plus body
    Block(Block),
    /// Routine declaration
    FunctionDecl(FunctionDecl),

    /// Routine call (statement or expression)
    Call(Call),

    /// Root node
    Program(Program),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Multiplication (*)
    Mul,
    /// Integer division (/)
    Div,

    // Logical
    /// Logical AND (&&)
    And,
    /// Logical OR (||)
    Or,

    // Comparison
    /// Equality (==)
    Eq,
    /// Inequality (!=)
    NotEq,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    LtEq,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    GtEq,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Identity (+)
    Plus,
    /// Negation (-)
    Minus,
    /// Logical NOT (!)
    Not,
}

impl Node {
    /// Builds a binary operation node
    pub fn binary(op: BinaryOp, left: Node, right: Node) -> Node {
        Node::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Builds a unary operation node
    pub fn unary(op: UnaryOp, operand: Node) -> Node {
        Node::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    /// Builds an assignment node
    pub fn assign(target: impl Into<String>, value: Node) -> Node {
        Node::Assign {
            target: Var::new(target),
            value: Box::new(value),
        }
    }

    /// Builds a variable reference node
    pub fn var(name: impl Into<String>) -> Node {
        Node::Var(Var::new(name))
    }

    /// Renders the tree as tab-indented XML-like markup
    pub fn to_xml(&self) -> String {
        let mut writer = XmlWriter::default();
        self.write_xml(&mut writer);
        writer.out
    }
}

impl Program {
    /// Renders the tree as tab-indented XML-like markup
    pub fn to_xml(&self) -> String {
        let mut writer = XmlWriter::default();
        self.write_xml(&mut writer);
        writer.out
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeName::Integer => write!(f, "INTEGER"),
            TypeName::Boolean => write!(f, "BOOLEAN"),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
            BinaryOp::And => write!(f, "&&"),
            BinaryOp::Or => write!(f, "||"),
            BinaryOp::Eq => write!(f, "=="),
            BinaryOp::NotEq => write!(f, "!="),
            BinaryOp::Lt => write!(f, "<"),
            BinaryOp::LtEq => write!(f, "<="),
            BinaryOp::Gt => write!(f, ">"),
            BinaryOp::GtEq => write!(f, ">="),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOp::Plus => write!(f, "+"),
            UnaryOp::Minus => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

// ============================================================================
// Tree dump
// ============================================================================

#[derive(Default)]
struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push('\t');
        }
    }

    fn leaf(&mut self, tag: &str, text: impl fmt::Display) {
        self.indent();
        self.out.push_str(&format!("<{tag}>{text}</{tag}>\n"));
    }

    fn empty(&mut self, tag: &str) {
        self.indent();
        self.out.push_str(&format!("<{tag} />\n"));
    }

    fn open(&mut self, tag: &str, name: Option<&str>) {
        self.indent();
        match name {
            Some(name) => self.out.push_str(&format!("<{tag} name=\"{name}\">\n")),
            None => self.out.push_str(&format!("<{tag}>\n")),
        }
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth -= 1;
        self.indent();
        self.out.push_str(&format!("</{tag}>\n"));
    }
}

trait WriteXml {
    fn write_xml(&self, w: &mut XmlWriter);
}

impl WriteXml for Program {
    fn write_xml(&self, w: &mut XmlWriter) {
        w.open("program", Some(&self.name));
        self.block.write_xml(w);
        w.close("program");
    }
}

impl WriteXml for Block {
    fn write_xml(&self, w: &mut XmlWriter) {
        w.open("block", None);
        for decl in &self.declarations {
            decl.write_xml(w);
        }
        self.body.write_xml(w);
        w.close("block");
    }
}

impl WriteXml for Compound {
    fn write_xml(&self, w: &mut XmlWriter) {
        w.open("compound", None);
        for child in &self.children {
            child.write_xml(w);
        }
        w.close("compound");
    }
}

impl WriteXml for Var {
    fn write_xml(&self, w: &mut XmlWriter) {
        w.leaf("var", &self.name);
    }
}

impl WriteXml for TypeSpec {
    fn write_xml(&self, w: &mut XmlWriter) {
        w.leaf("type", self.name);
    }
}

impl WriteXml for Param {
    fn write_xml(&self, w: &mut XmlWriter) {
        w.open("param", None);
        self.var.write_xml(w);
        self.type_spec.write_xml(w);
        w.close("param");
    }
}

impl WriteXml for FunctionDecl {
    fn write_xml(&self, w: &mut XmlWriter) {
        let tag = match self.kind {
            RoutineKind::Function => "function",
            RoutineKind::Procedure => "procedure",
        };
        w.open(tag, Some(&self.name));
        for param in &self.params {
            param.write_xml(w);
        }
        if let Some(return_type) = &self.return_type {
            return_type.write_xml(w);
        }
        self.block.write_xml(w);
        w.close(tag);
    }
}

impl WriteXml for Node {
    fn write_xml(&self, w: &mut XmlWriter) {
        match self {
            Node::Num(n) => w.leaf("integer", n),
            Node::Boolean(b) => w.leaf("boolean", if *b { "TRUE" } else { "FALSE" }),
            Node::Var(var) => var.write_xml(w),
            Node::UnaryOp { op, operand } => {
                let tag = op.to_string();
                w.open(&tag, None);
                operand.write_xml(w);
                w.close(&tag);
            }
            Node::BinaryOp { op, left, right } => {
                let tag = op.to_string();
                w.open(&tag, None);
                left.write_xml(w);
                right.write_xml(w);
                w.close(&tag);
            }
            Node::Assign { target, value } => {
                w.open(":=", None);
                target.write_xml(w);
                value.write_xml(w);
                w.close(":=");
            }
            Node::Compound(compound) => compound.write_xml(w),
            Node::NoOp => w.empty("noop"),
            Node::VarDecl(decl) => {
                w.open("vardecl", None);
                decl.var.write_xml(w);
                decl.type_spec.write_xml(w);
                w.close("vardecl");
            }
            Node::Type(type_spec) => type_spec.write_xml(w),
            Node::Param(param) => param.write_xml(w),
            Node::Block(block) => block.write_xml(w),
            Node::FunctionDecl(decl) => decl.write_xml(w),
            Node::Call(call) => {
                w.open("call", Some(&call.name));
                for arg in &call.args {
                    arg.write_xml(w);
                }
                w.close("call");
            }
            Node::Program(program) => program.write_xml(w),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let node = Node::binary(BinaryOp::Add, Node::Num(1), Node::var("x"));
        assert_eq!(
            node,
            Node::BinaryOp {
                op: BinaryOp::Add,
                left: Box::new(Node::Num(1)),
                right: Box::new(Node::Var(Var {
                    name: "x".to_string()
                })),
            }
        );
    }

    #[test]
    fn test_operator_display() {
        assert_eq!(BinaryOp::LtEq.to_string(), "<=");
        assert_eq!(BinaryOp::And.to_string(), "&&");
        assert_eq!(UnaryOp::Not.to_string(), "!");
        assert_eq!(TypeName::Boolean.to_string(), "BOOLEAN");
    }

    #[test]
    fn test_xml_dump() {
        let node = Node::Compound(Compound {
            children: vec![
                Node::assign(
                    "a",
                    Node::binary(
                        BinaryOp::Mul,
                        Node::Num(4),
                        Node::unary(UnaryOp::Minus, Node::Num(2)),
                    ),
                ),
                Node::NoOp,
            ],
        });
        let expected = "<compound>\n\
                        \t<:=>\n\
                        \t\t<var>a</var>\n\
                        \t\t<*>\n\
                        \t\t\t<integer>4</integer>\n\
                        \t\t\t<->\n\
                        \t\t\t\t<integer>2</integer>\n\
                        \t\t\t</->\n\
                        \t\t</*>\n\
                        \t</:=>\n\
                        \t<noop />\n\
                        </compound>\n";
        assert_eq!(node.to_xml(), expected);
    }

    #[test]
    fn test_serde_roundtrip_preserves_tree() {
        let node = Node::Call(Call {
            name: "f".to_string(),
            args: vec![Node::Boolean(true), Node::var("n")],
        });
        let json = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
