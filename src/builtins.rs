// ABOUTME: Built-in functions exposed to every SigmaF program

use crate::error::RuntimeError;
use crate::value::{BuiltinFn, Object};

/// Resolve a builtin by name. The registry is consulted only after the
/// environment misses, so user bindings shadow builtins. Each entry carries
/// its `io_type` signature, shown when the value itself is inspected.
pub fn lookup(name: &str) -> Option<Object> {
    let entry = |func: BuiltinFn, io_type| Some(Object::Builtin { func, io_type });
    match name {
        "length" => entry(builtin_length, "builtin fn (list|tuple|str) -> int"),
        "printLn" => entry(builtin_println, "builtin fn (any) -> null"),
        "not" => entry(builtin_not, "builtin fn (bool) -> bool"),
        "pow" => entry(builtin_pow, "builtin fn (int|float, int|float) -> float"),
        "parse" => entry(
            builtin_parse,
            "builtin fn (int|float|str|list|tuple, str) -> value",
        ),
        "append" => entry(builtin_append, "builtin fn (list, any) -> list"),
        "type" => entry(builtin_type, "builtin fn (any) -> str"),
        _ => None,
    }
}

/// Element count of a list or tuple, codepoint count of a string.
fn builtin_length(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_arity("length", args.len(), 1);
    }
    match &args[0] {
        Object::String(value) => Object::Integer(value.chars().count() as i64),
        Object::List(values) => Object::Integer(values.len() as i64),
        Object::Tuple(values) => Object::Integer(values.len() as i64),
        other => unsupported("length", other),
    }
}

/// Print a value followed by a newline. Strings expand the `\n` and `\t`
/// escape sequences; everything else prints its `inspect` form. Errors
/// pass through untouched.
fn builtin_println(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_arity("printLn", args.len(), 1);
    }
    match &args[0] {
        error @ Object::Error { .. } => error.clone(),
        Object::String(value) => {
            println!("{}", value.replace("\\n", "\n").replace("\\t", "\t"));
            Object::Void
        }
        other => {
            println!("{}", other.inspect());
            Object::Void
        }
    }
}

fn builtin_not(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_arity("not", args.len(), 1);
    }
    match &args[0] {
        Object::Boolean(value) => Object::Boolean(!value),
        other => unsupported("not", other),
    }
}

/// The n-th root of the first argument: `pow(x, n)` is `x^(1/n)`.
fn builtin_pow(args: &[Object]) -> Object {
    if args.len() != 2 {
        return wrong_arity("pow", args.len(), 2);
    }
    let radicand = match as_number(&args[0]) {
        Some(value) => value,
        None => return unsupported("pow", &args[0]),
    };
    let index = match as_number(&args[1]) {
        Some(value) => value,
        None => return unsupported("pow", &args[1]),
    };
    if index == 0.0 {
        return RuntimeError::DivisionByZero.into_object();
    }
    Object::Float(radicand.powf(1.0 / index))
}

/// Convert between value shapes: int <-> float <-> str, str -> list of
/// single-character strings, list <-> tuple.
fn builtin_parse(args: &[Object]) -> Object {
    if args.len() != 2 {
        return wrong_arity("parse", args.len(), 2);
    }
    let target = match &args[1] {
        Object::String(value) => value.as_str(),
        other => return unsupported("parse", other),
    };

    match (&args[0], target) {
        (Object::Integer(value), "float") => Object::Float(*value as f64),
        (Object::Integer(value), "str") => Object::String(value.to_string()),
        (Object::Float(value), "int") => Object::Integer(*value as i64),
        (Object::Float(value), "str") => Object::String(format!("{:?}", value)),
        (Object::String(value), "int") => match value.trim().parse::<i64>() {
            Ok(parsed) => Object::Integer(parsed),
            Err(_) => conversion_error(&args[0], target),
        },
        (Object::String(value), "float") => match value.trim().parse::<f64>() {
            Ok(parsed) => Object::Float(parsed),
            Err(_) => conversion_error(&args[0], target),
        },
        (Object::String(value), "list") => Object::List(
            value
                .chars()
                .map(|c| Object::String(c.to_string()))
                .collect(),
        ),
        (Object::List(values), "tuple") => Object::Tuple(values.clone()),
        (Object::Tuple(values), "list") => Object::List(values.clone()),
        _ => conversion_error(&args[0], target),
    }
}

/// Append an element to a list, returning the extended list. The element
/// kind must match the list's; appending into an empty list fixes its
/// element type.
fn builtin_append(args: &[Object]) -> Object {
    if args.len() != 2 {
        return wrong_arity("append", args.len(), 2);
    }
    let values = match &args[0] {
        Object::List(values) => values,
        other => return unsupported("append", other),
    };
    let item = &args[1];

    if let Some(first) = values.first() {
        if first.kind() != item.kind() {
            return RuntimeError::WrongAppendType {
                item: item.kind().name(),
                element: first.kind().name(),
            }
            .into_object();
        }
    }

    let mut extended = values.clone();
    extended.push(item.clone());
    Object::List(extended)
}

/// The canonical type spec of a value, as a string.
fn builtin_type(args: &[Object]) -> Object {
    if args.len() != 1 {
        return wrong_arity("type", args.len(), 1);
    }
    Object::String(args[0].spec())
}

fn as_number(value: &Object) -> Option<f64> {
    match value {
        Object::Integer(value) => Some(*value as f64),
        Object::Float(value) => Some(*value),
        _ => None,
    }
}

fn wrong_arity(name: &'static str, received: usize, needed: usize) -> Object {
    RuntimeError::WrongNumberOfArguments {
        name,
        received,
        needed,
    }
    .into_object()
}

fn unsupported(name: &'static str, value: &Object) -> Object {
    RuntimeError::UnsupportedArgument {
        name,
        kind: value.kind().name(),
    }
    .into_object()
}

fn conversion_error(value: &Object, target: &str) -> Object {
    RuntimeError::ParseConversion {
        from: value.kind().name(),
        to: target.to_string(),
    }
    .into_object()
}
