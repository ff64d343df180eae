// ABOUTME: Runtime values produced by the evaluator

use crate::ast;
use crate::env::Environment;
use std::fmt;
use std::rc::Rc;

/// Signature of a native builtin. Builtins receive already-evaluated
/// arguments and do their own arity and type checking.
pub type BuiltinFn = fn(&[Object]) -> Object;

/// The tag of a runtime value, used for operator dispatch and error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Integer,
    Float,
    String,
    Boolean,
    Void,
    List,
    Tuple,
    Function,
    Builtin,
    Return,
    Error,
}

impl ObjectKind {
    /// Uppercase name used inside error messages.
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Integer => "INTEGER",
            ObjectKind::Float => "FLOAT",
            ObjectKind::String => "STRING",
            ObjectKind::Boolean => "BOOLEAN",
            ObjectKind::Void => "VOID",
            ObjectKind::List => "LIST",
            ObjectKind::Tuple => "TUPLE",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::Builtin => "BUILTIN",
            ObjectKind::Return => "RETURN",
            ObjectKind::Error => "ERROR",
        }
    }

    /// Lowercase name used inside type specs.
    pub fn short_name(self) -> &'static str {
        match self {
            ObjectKind::Integer => "int",
            ObjectKind::Float => "float",
            ObjectKind::String => "str",
            ObjectKind::Boolean => "bool",
            ObjectKind::Void => "void",
            ObjectKind::List => "list",
            ObjectKind::Tuple => "tuple",
            ObjectKind::Function => "function",
            ObjectKind::Builtin => "builtin",
            ObjectKind::Return => "return",
            ObjectKind::Error => "error",
        }
    }
}

/// The body of a function value: either a user-written block, or the
/// sequencing of two captured callables produced by the `.` operator.
#[derive(Debug, Clone)]
pub enum FunctionBody {
    Block(ast::Block),
    Composition {
        outer: Box<Object>,
        inner: Box<Object>,
    },
}

/// A function value: parameter identifiers, the declared parameter and
/// output types, the body, and the environment captured at definition.
#[derive(Debug, Clone)]
pub struct FunctionValue {
    pub parameters: Vec<ast::Identifier>,
    pub type_parameters: Vec<ast::TypeValue>,
    pub type_output: ast::TypeValue,
    pub body: FunctionBody,
    pub env: Rc<Environment>,
}

#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Void,
    List(Vec<Object>),
    Tuple(Vec<Object>),
    Function(FunctionValue),
    Builtin {
        func: BuiltinFn,
        io_type: &'static str,
    },
    Return(Box<Object>),
    Error {
        message: String,
        line: Option<usize>,
    },
}

impl Object {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Integer(_) => ObjectKind::Integer,
            Object::Float(_) => ObjectKind::Float,
            Object::String(_) => ObjectKind::String,
            Object::Boolean(_) => ObjectKind::Boolean,
            Object::Void => ObjectKind::Void,
            Object::List(_) => ObjectKind::List,
            Object::Tuple(_) => ObjectKind::Tuple,
            Object::Function(_) => ObjectKind::Function,
            Object::Builtin { .. } => ObjectKind::Builtin,
            Object::Return(_) => ObjectKind::Return,
            Object::Error { .. } => ObjectKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error { .. })
    }

    /// The canonical type spec of a value: `int`, `str`, `[int]` (or `list`
    /// for an empty list), `(int,str)`. This string form is what `let`,
    /// call, and return sites compare against declared `TypeValue`s.
    pub fn spec(&self) -> String {
        match self {
            Object::List(values) => match values.first() {
                Some(first) => format!("[{}]", first.spec()),
                None => "list".to_string(),
            },
            Object::Tuple(values) => {
                let specs: Vec<String> = values.iter().map(|v| v.spec()).collect();
                format!("({})", specs.join(","))
            }
            other => other.kind().short_name().to_string(),
        }
    }

    /// Render the value for display at the REPL or via `printLn`.
    pub fn inspect(&self) -> String {
        match self {
            Object::Integer(value) => value.to_string(),
            Object::Float(value) => format!("{:?}", value),
            Object::String(value) => value.clone(),
            Object::Boolean(value) => (if *value { "true" } else { "false" }).to_string(),
            Object::Void => "null".to_string(),
            Object::List(values) => format!("[{}]", inspect_items(values)),
            Object::Tuple(values) => format!("({})", inspect_items(values)),
            Object::Function(function) => {
                let params: Vec<String> = function
                    .parameters
                    .iter()
                    .zip(function.type_parameters.iter())
                    .map(|(param, spec)| format!("{}::{}", param, spec))
                    .collect();
                format!(
                    "fn {} -> {} {{\n\t{}\n}}",
                    params.join(", "),
                    function.type_output,
                    function.body
                )
            }
            Object::Builtin { io_type, .. } => (*io_type).to_string(),
            Object::Return(value) => value.inspect(),
            Object::Error { message, line } => match line {
                Some(line) => format!("Error: {} [Line {}]", message, line),
                None => format!("Error: {}", message),
            },
        }
    }
}

/// Elements render like `inspect`, except strings keep their quotes.
fn inspect_items(values: &[Object]) -> String {
    let rendered: Vec<String> = values
        .iter()
        .map(|value| match value {
            Object::String(s) => format!("\"{}\"", s),
            other => other.inspect(),
        })
        .collect();
    rendered.join(", ")
}

impl fmt::Display for FunctionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionBody::Block(block) => write!(f, "{}", block),
            FunctionBody::Composition { outer, inner } => {
                write!(f, "=> {} . {};", outer.inspect(), inner.inspect())
            }
        }
    }
}

/// Structural equality. Functions and builtins never compare equal; error
/// and return wrappers are not user-comparable values.
impl PartialEq for Object {
    fn eq(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Float(a), Object::Float(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::Void, Object::Void) => true,
            (Object::List(a), Object::List(b)) => a == b,
            (Object::Tuple(a), Object::Tuple(b)) => a == b,
            _ => false,
        }
    }
}
