// ABOUTME: Error types for parsing, evaluation, and the driver

use crate::token::TokenKind;
use crate::value::Object;
use thiserror::Error;

/// A parser diagnostic. Parsing never aborts: diagnostics accumulate in the
/// parser's error list and are rendered through these display templates,
/// which are the user-visible contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("The next token was expected to be of type {expected}, but {obtained} was obtained")]
    UnexpectedToken {
        expected: TokenKind,
        obtained: TokenKind,
    },

    #[error("It was not possible to parse {literal} like Integer")]
    InvalidInteger { literal: String },

    #[error("It was not possible to parse {literal} like Float")]
    InvalidFloat { literal: String },

    /// No prefix rule matched the token that opened an expression.
    #[error("It was not possible to parse {literal}")]
    NoParseRule { literal: String },
}

/// The evaluator's user-visible message catalogue. Each variant renders to
/// the exact string tests match on; `into_object` packages it as the
/// first-class `Error` value that flows through evaluation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Type Discrepancy: It is not possible to do the operation '{operator}', for an {left} and a {right}")]
    TypeMismatch {
        operator: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("Type Discrepancy: It was expected type {declared} and it was obtained type {actual}")]
    TypeAnnotation { declared: String, actual: String },

    #[error("Unknown Operator: The operator '{operator}' is unknown for {kind}")]
    UnknownPrefixOperator {
        operator: String,
        kind: &'static str,
    },

    #[error("Unknown Operator: The operator '{operator}' is unknown between {kind}")]
    UnknownInfixOperator {
        operator: String,
        kind: &'static str,
    },

    #[error("Division by zero: It is not possible to divide by zero")]
    DivisionByZero,

    #[error("Identifier not found: {name}")]
    IdentifierNotFound { name: String },

    #[error("Non-modifiable Value: The value of {name} is not modifiable")]
    NonModifiableValue { name: String },

    #[error("Wrong number of indexes: {count} indexes were delivered and between 1 and 3 are required")]
    WrongNumberOfIndexes { count: usize },

    #[error("Wrong number of indexes: The tuple only required an index, and it was delivered {count} indexes")]
    WrongNumberOfTupleIndexes { count: usize },

    #[error("Out range: The length of the {iterable} is {length}")]
    OutOfRange {
        iterable: &'static str,
        length: usize,
    },

    #[error("Not a iterable: The object delivered is not a iterable type is of type {spec}")]
    NotAnIterable { spec: String },

    #[error("Wrong index: The index of a {iterable} must be of type int, but {spec} was obtained")]
    WrongIndexType {
        iterable: &'static str,
        spec: String,
    },

    #[error("Wrong step: The step of a slice must be a positive integer, but {step} was obtained")]
    WrongStep { step: i64 },

    #[error("Arguments wrongs: The function expected to receive types {declared} and receives {received}")]
    WrongArguments { declared: String, received: String },

    #[error("Output wrongs: The function expected to return type {declared} and return {returned}")]
    WrongOutput { declared: String, returned: String },

    #[error("Incompatible Composition: It is not possible the composition of {left} and {right}")]
    IncompatibleComposition {
        left: &'static str,
        right: &'static str,
    },

    #[error("Incompatible list operation: It is not possible to do the operation {operator} between a {left} List and a {right} List")]
    IncompatibleListOperation {
        operator: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("Incompatible tuple operation: It is not possible to do the operation {operator} between a {left} Tuple and a {right} Tuple")]
    IncompatibleTupleOperation {
        operator: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("It is not a function: {kind}")]
    NotAFunction { kind: &'static str },

    #[error("Incorrect Number of arguments for {name}, it was received {received} arguments, and is needed only {needed}")]
    WrongNumberOfArguments {
        name: &'static str,
        received: usize,
        needed: usize,
    },

    #[error("Argument to {name} without support, it was received a {kind}")]
    UnsupportedArgument {
        name: &'static str,
        kind: &'static str,
    },

    #[error("It is not possible to parser since {from} to {to}")]
    ParseConversion { from: &'static str, to: String },

    #[error("It is not possible to append a {item} to a list of {element}")]
    WrongAppendType {
        item: &'static str,
        element: &'static str,
    },

    #[error("Maximum recursion depth exceeded while being evaluated")]
    MaxRecursionDepth,
}

impl RuntimeError {
    /// Package the rendered message as a first-class `Error` value.
    pub fn into_object(self) -> Object {
        Object::Error {
            message: self.to_string(),
            line: None,
        }
    }

    /// Same, carrying the source line the error was raised at.
    pub fn at_line(self, line: usize) -> Object {
        Object::Error {
            message: self.to_string(),
            line: Some(line),
        }
    }
}

/// Driver-side failures: file access and the interactive line editor.
#[derive(Error, Debug)]
pub enum ReplError {
    #[error("The path {path} does not exist")]
    PathDoesNotExist { path: String },

    #[error("The path {path} is not a SigmaF file")]
    NotASigmaFFile { path: String },

    #[error("File not found on {path}")]
    FileNotFound { path: String },

    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
