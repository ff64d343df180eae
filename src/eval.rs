// ABOUTME: Tree-walking evaluator executing the AST against an environment

use crate::ast::{Block, Expression, LetStatement, Program, Statement};
use crate::builtins;
use crate::config;
use crate::env::Environment;
use crate::error::RuntimeError;
use crate::value::{FunctionBody, FunctionValue, Object, ObjectKind};
use std::cell::Cell;
use std::rc::Rc;

thread_local! {
    static CALL_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// RAII guard bounding user-function call depth. Exhaustion surfaces the
/// recursion-depth error instead of overflowing the native stack.
struct DepthGuard;

impl DepthGuard {
    fn enter() -> Option<DepthGuard> {
        CALL_DEPTH.with(|depth| {
            if depth.get() >= config::MAX_CALL_DEPTH {
                None
            } else {
                depth.set(depth.get() + 1);
                Some(DepthGuard)
            }
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        CALL_DEPTH.with(|depth| depth.set(depth.get() - 1));
    }
}

/// Evaluate a program. `None` means the last statement produced no value
/// (a binding). A `Return` at the top level is unwrapped; the first `Error`
/// stops execution.
pub fn evaluate(program: &Program, env: &Rc<Environment>) -> Option<Object> {
    let mut result = None;
    for statement in &program.statements {
        match eval_statement(statement, env) {
            Some(Object::Return(value)) => return Some(*value),
            Some(error @ Object::Error { .. }) => return Some(error),
            other => result = other,
        }
    }
    result
}

fn eval_statement(statement: &Statement, env: &Rc<Environment>) -> Option<Object> {
    match statement {
        Statement::Expression(statement) => Some(eval_expression(&statement.expression, env)),
        Statement::Return(statement) => {
            let value = eval_expression(&statement.value, env);
            if value.is_error() {
                return Some(value);
            }
            Some(Object::Return(Box::new(value)))
        }
        Statement::Let(statement) => eval_let_statement(statement, env),
    }
}

/// `let` evaluates the value, checks an optional type annotation, rejects
/// rebinding in the current scope, and produces no value.
fn eval_let_statement(statement: &LetStatement, env: &Rc<Environment>) -> Option<Object> {
    let value = eval_expression(&statement.value, env);
    if value.is_error() {
        return Some(value);
    }

    if let Some(declared) = &statement.name.type_value {
        let actual = value.spec();
        if actual != declared.value {
            return Some(
                RuntimeError::TypeAnnotation {
                    declared: declared.value.clone(),
                    actual,
                }
                .at_line(statement.name.token.line),
            );
        }
    }

    if env.contains_local(&statement.name.value) {
        return Some(
            RuntimeError::NonModifiableValue {
                name: statement.name.value.clone(),
            }
            .at_line(statement.name.token.line),
        );
    }
    env.define(statement.name.value.clone(), value);
    None
}

/// Statements run in order; the first `Return` or `Error` stops the block
/// and is handed to the enclosing call or program.
fn eval_block(block: &Block, env: &Rc<Environment>) -> Option<Object> {
    let mut result = None;
    for statement in &block.statements {
        result = eval_statement(statement, env);
        if let Some(object) = &result {
            if matches!(object, Object::Return(_) | Object::Error { .. }) {
                return result;
            }
        }
    }
    result
}

fn eval_expression(expression: &Expression, env: &Rc<Environment>) -> Object {
    match expression {
        Expression::Integer { value, .. } => Object::Integer(*value),
        Expression::Float { value, .. } => Object::Float(*value),
        Expression::StringLiteral { value, .. } => Object::String(value.clone()),
        Expression::Boolean { value, .. } => Object::Boolean(*value),
        Expression::Void { .. } => Object::Void,
        Expression::Identifier(identifier) => match env.get(&identifier.value) {
            Some(value) => value,
            None => match builtins::lookup(&identifier.value) {
                Some(builtin) => builtin,
                None => RuntimeError::IdentifierNotFound {
                    name: identifier.value.clone(),
                }
                .into_object(),
            },
        },
        Expression::Prefix {
            operator, right, ..
        } => {
            let right = eval_expression(right, env);
            if right.is_error() {
                return right;
            }
            eval_prefix_expression(operator, right)
        }
        Expression::Infix {
            left,
            operator,
            right,
            ..
        } => {
            let left = eval_expression(left, env);
            if left.is_error() {
                return left;
            }
            let right = eval_expression(right, env);
            if right.is_error() {
                return right;
            }
            eval_infix_expression(operator, left, right)
        }
        Expression::If {
            condition,
            consequence,
            alternative,
            ..
        } => {
            let condition = eval_expression(condition, env);
            if condition.is_error() {
                return condition;
            }
            if matches!(condition, Object::Boolean(true)) {
                eval_block(consequence, env).unwrap_or(Object::Void)
            } else if let Some(alternative) = alternative {
                eval_block(alternative, env).unwrap_or(Object::Void)
            } else {
                Object::Void
            }
        }
        Expression::Function(literal) => Object::Function(FunctionValue {
            parameters: literal.parameters.clone(),
            type_parameters: literal.type_parameters.clone(),
            type_output: literal.type_output.clone(),
            body: FunctionBody::Block(literal.body.clone()),
            env: env.clone(),
        }),
        Expression::Call {
            token,
            function,
            arguments,
        } => {
            let callee = eval_expression(function, env);
            if callee.is_error() {
                return callee;
            }
            let mut values = Vec::with_capacity(arguments.len());
            for argument in arguments {
                let value = eval_expression(argument, env);
                if value.is_error() {
                    return value;
                }
                values.push(value);
            }
            call_function(callee, values, token.line)
        }
        Expression::ListValues { values, .. } => match eval_items(values, env) {
            Ok(items) => Object::List(items),
            Err(error) => error,
        },
        Expression::TupleValues { values, .. } => match eval_items(values, env) {
            Ok(items) => Object::Tuple(items),
            Err(error) => error,
        },
        Expression::CallList {
            iterable, range, ..
        } => eval_index_expression(iterable, range, env),
    }
}

/// Elements evaluate left to right; the first `Error` aborts the aggregate.
fn eval_items(values: &[Expression], env: &Rc<Environment>) -> Result<Vec<Object>, Object> {
    let mut items = Vec::with_capacity(values.len());
    for value in values {
        let evaluated = eval_expression(value, env);
        if evaluated.is_error() {
            return Err(evaluated);
        }
        items.push(evaluated);
    }
    Ok(items)
}

fn eval_prefix_expression(operator: &str, right: Object) -> Object {
    match operator {
        "-" => match right {
            Object::Integer(value) => Object::Integer(value.wrapping_neg()),
            Object::Float(value) => Object::Float(-value),
            other => RuntimeError::UnknownPrefixOperator {
                operator: operator.to_string(),
                kind: other.kind().name(),
            }
            .into_object(),
        },
        _ => RuntimeError::UnknownPrefixOperator {
            operator: operator.to_string(),
            kind: right.kind().name(),
        }
        .into_object(),
    }
}

/// Operator dispatch by operand kind pair. Mismatched kinds are a type
/// discrepancy; matched kinds with no rule are an unknown operator.
fn eval_infix_expression(operator: &str, left: Object, right: Object) -> Object {
    match (left, right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix(operator, l, r),
        (Object::Float(l), Object::Float(r)) => eval_float_infix(operator, l, r),
        (Object::String(l), Object::String(r)) => eval_string_infix(operator, l, r),
        (Object::Boolean(l), Object::Boolean(r)) => eval_boolean_infix(operator, l, r),
        (Object::List(l), Object::List(r)) => eval_list_infix(operator, l, r),
        (Object::Tuple(l), Object::Tuple(r)) => eval_tuple_infix(operator, l, r),
        (Object::Function(l), Object::Function(r)) => eval_function_infix(operator, l, r),
        (left, right) => {
            if left.kind() != right.kind() {
                RuntimeError::TypeMismatch {
                    operator: operator.to_string(),
                    left: left.kind().name(),
                    right: right.kind().name(),
                }
                .into_object()
            } else {
                RuntimeError::UnknownInfixOperator {
                    operator: operator.to_string(),
                    kind: right.kind().name(),
                }
                .into_object()
            }
        }
    }
}

fn eval_integer_infix(operator: &str, left: i64, right: i64) -> Object {
    match operator {
        "+" => Object::Integer(left.wrapping_add(right)),
        "-" => Object::Integer(left.wrapping_sub(right)),
        "*" => Object::Integer(left.wrapping_mul(right)),
        "**" => eval_integer_power(left, right),
        "/" => {
            if right == 0 {
                RuntimeError::DivisionByZero.into_object()
            } else if left % right == 0 {
                Object::Integer(left / right)
            } else {
                Object::Float(left as f64 / right as f64)
            }
        }
        "%" => {
            if right == 0 {
                RuntimeError::DivisionByZero.into_object()
            } else {
                Object::Integer(left % right)
            }
        }
        "<" => Object::Boolean(left < right),
        ">" => Object::Boolean(left > right),
        "<=" => Object::Boolean(left <= right),
        ">=" => Object::Boolean(left >= right),
        "==" => Object::Boolean(left == right),
        "!=" => Object::Boolean(left != right),
        _ => RuntimeError::UnknownInfixOperator {
            operator: operator.to_string(),
            kind: ObjectKind::Integer.name(),
        }
        .into_object(),
    }
}

/// Integer exponentiation stays integral while it fits; a negative exponent
/// or an overflowing result promotes to float.
fn eval_integer_power(base: i64, exponent: i64) -> Object {
    if exponent >= 0 {
        if let Ok(exponent) = u32::try_from(exponent) {
            if let Some(value) = base.checked_pow(exponent) {
                return Object::Integer(value);
            }
        }
    }
    Object::Float((base as f64).powf(exponent as f64))
}

fn eval_float_infix(operator: &str, left: f64, right: f64) -> Object {
    match operator {
        "+" => Object::Float(left + right),
        "-" => Object::Float(left - right),
        "*" => Object::Float(left * right),
        "**" => Object::Float(left.powf(right)),
        "/" => {
            if right == 0.0 {
                RuntimeError::DivisionByZero.into_object()
            } else {
                Object::Float(left / right)
            }
        }
        "%" => {
            if right == 0.0 {
                RuntimeError::DivisionByZero.into_object()
            } else {
                Object::Float(left % right)
            }
        }
        "<" => Object::Boolean(left < right),
        ">" => Object::Boolean(left > right),
        "<=" => Object::Boolean(left <= right),
        ">=" => Object::Boolean(left >= right),
        "==" => Object::Boolean(left == right),
        "!=" => Object::Boolean(left != right),
        _ => RuntimeError::UnknownInfixOperator {
            operator: operator.to_string(),
            kind: ObjectKind::Float.name(),
        }
        .into_object(),
    }
}

fn eval_string_infix(operator: &str, left: String, right: String) -> Object {
    match operator {
        "+" => Object::String(format!("{}{}", left, right)),
        "==" => Object::Boolean(left == right),
        "!=" => Object::Boolean(left != right),
        _ => RuntimeError::UnknownInfixOperator {
            operator: operator.to_string(),
            kind: ObjectKind::String.name(),
        }
        .into_object(),
    }
}

fn eval_boolean_infix(operator: &str, left: bool, right: bool) -> Object {
    match operator {
        "==" => Object::Boolean(left == right),
        "!=" => Object::Boolean(left != right),
        "||" => Object::Boolean(left || right),
        "&&" => Object::Boolean(left && right),
        _ => RuntimeError::UnknownInfixOperator {
            operator: operator.to_string(),
            kind: ObjectKind::Boolean.name(),
        }
        .into_object(),
    }
}

fn eval_list_infix(operator: &str, left: Vec<Object>, right: Vec<Object>) -> Object {
    match operator {
        "+" => {
            if !left.is_empty() && !right.is_empty() && left[0].kind() != right[0].kind() {
                return RuntimeError::IncompatibleListOperation {
                    operator: operator.to_string(),
                    left: left[0].kind().name(),
                    right: right[0].kind().name(),
                }
                .into_object();
            }
            let mut values = left;
            values.extend(right);
            Object::List(values)
        }
        "==" => Object::Boolean(left == right),
        "!=" => Object::Boolean(left != right),
        _ => RuntimeError::UnknownInfixOperator {
            operator: operator.to_string(),
            kind: ObjectKind::List.name(),
        }
        .into_object(),
    }
}

/// Tuples combine element-wise; both sides must have the same length and
/// the same element kinds at every position.
fn eval_tuple_infix(operator: &str, left: Vec<Object>, right: Vec<Object>) -> Object {
    let compatible = left.len() == right.len()
        && left
            .iter()
            .zip(right.iter())
            .all(|(l, r)| l.kind() == r.kind());

    match operator {
        "+" | "-" => {
            if !compatible {
                return RuntimeError::IncompatibleTupleOperation {
                    operator: operator.to_string(),
                    left: first_kind_name(&left),
                    right: first_kind_name(&right),
                }
                .into_object();
            }
            let mut values = Vec::with_capacity(left.len());
            for (l, r) in left.into_iter().zip(right.into_iter()) {
                let combined = eval_infix_expression(operator, l, r);
                if combined.is_error() {
                    return combined;
                }
                values.push(combined);
            }
            Object::Tuple(values)
        }
        "==" | "!=" => {
            if !compatible {
                return RuntimeError::IncompatibleTupleOperation {
                    operator: operator.to_string(),
                    left: first_kind_name(&left),
                    right: first_kind_name(&right),
                }
                .into_object();
            }
            let equal = left == right;
            Object::Boolean(if operator == "==" { equal } else { !equal })
        }
        _ => RuntimeError::UnknownInfixOperator {
            operator: operator.to_string(),
            kind: ObjectKind::Tuple.name(),
        }
        .into_object(),
    }
}

fn first_kind_name(values: &[Object]) -> &'static str {
    values
        .first()
        .map(|value| value.kind().name())
        .unwrap_or(ObjectKind::Void.name())
}

fn eval_function_infix(operator: &str, left: FunctionValue, right: FunctionValue) -> Object {
    match operator {
        "." => compose_functions(left, right),
        _ => RuntimeError::UnknownInfixOperator {
            operator: operator.to_string(),
            kind: ObjectKind::Function.name(),
        }
        .into_object(),
    }
}

/// `left . right` builds a function with `right`'s parameters and `left`'s
/// output whose body calls the two captured functions in sequence. The
/// composition is rejected when `right`'s output type cannot feed `left`'s
/// parameter list (one matching type, or a tuple spec matching the whole
/// list, which unpacks at the call).
fn compose_functions(left: FunctionValue, right: FunctionValue) -> Object {
    let compatible = if left.type_parameters.len() > 1 {
        let specs: Vec<String> = left
            .type_parameters
            .iter()
            .map(|spec| spec.value.clone())
            .collect();
        right.type_output.value == format!("({})", specs.join(","))
    } else {
        match left.type_parameters.first() {
            Some(spec) => right.type_output.value == spec.value,
            None => false,
        }
    };

    if !compatible {
        return RuntimeError::IncompatibleComposition {
            left: ObjectKind::Function.name(),
            right: ObjectKind::Function.name(),
        }
        .into_object();
    }

    Object::Function(FunctionValue {
        parameters: right.parameters.clone(),
        type_parameters: right.type_parameters.clone(),
        type_output: left.type_output.clone(),
        env: right.env.clone(),
        body: FunctionBody::Composition {
            outer: Box::new(Object::Function(left)),
            inner: Box::new(Object::Function(right)),
        },
    })
}

/// The call protocol: unpack a lone tuple argument when its arity matches,
/// check argument types against the declared parameters, run the body in a
/// child of the captured environment, unwrap `Return`, and check the
/// output type. Builtins skip all of it and self-check.
fn call_function(function: Object, mut arguments: Vec<Object>, line: usize) -> Object {
    match function {
        Object::Function(function) => {
            let Some(_guard) = DepthGuard::enter() else {
                return RuntimeError::MaxRecursionDepth.into_object();
            };

            if arguments.len() == 1 {
                if let Object::Tuple(values) = &arguments[0] {
                    if values.len() == function.type_parameters.len() {
                        arguments = values.clone();
                    }
                }
            }

            if let Some(error) = check_argument_types(&function, &arguments) {
                return error;
            }

            match &function.body {
                FunctionBody::Block(block) => {
                    let scope = Environment::with_parent(function.env.clone());
                    for (parameter, value) in
                        function.parameters.iter().zip(arguments.into_iter())
                    {
                        scope.define(parameter.value.clone(), value);
                    }

                    let result = eval_block(block, &scope).unwrap_or(Object::Void);
                    let result = unwrap_return(result);
                    if result.is_error() {
                        return result;
                    }

                    if spec_matches(&function.type_output.value, &result.spec()) {
                        result
                    } else {
                        RuntimeError::WrongOutput {
                            declared: function.type_output.value.clone(),
                            returned: result.kind().short_name().to_string(),
                        }
                        .at_line(line)
                    }
                }
                FunctionBody::Composition { outer, inner } => {
                    let intermediate = call_function((**inner).clone(), arguments, line);
                    if intermediate.is_error() {
                        return intermediate;
                    }
                    call_function((**outer).clone(), vec![intermediate], line)
                }
            }
        }
        Object::Builtin { func, .. } => func(&arguments),
        other => RuntimeError::NotAFunction {
            kind: other.kind().name(),
        }
        .into_object(),
    }
}

fn check_argument_types(function: &FunctionValue, arguments: &[Object]) -> Option<Object> {
    let declared: Vec<String> = function
        .type_parameters
        .iter()
        .map(|spec| spec.value.clone())
        .collect();

    if arguments.len() != declared.len() {
        return Some(wrong_arguments_error(&declared, arguments));
    }
    for (spec, argument) in declared.iter().zip(arguments) {
        if !spec_matches(spec, &argument.spec()) {
            return Some(wrong_arguments_error(&declared, arguments));
        }
    }
    None
}

fn wrong_arguments_error(declared: &[String], arguments: &[Object]) -> Object {
    let received: Vec<String> = arguments
        .iter()
        .map(|argument| argument.kind().short_name().to_string())
        .collect();
    RuntimeError::WrongArguments {
        declared: join_with_and(declared),
        received: join_with_and(&received),
    }
    .into_object()
}

/// A declared `[elem]` additionally accepts the bare `list` spec, which
/// only an empty list produces.
fn spec_matches(declared: &str, actual: &str) -> bool {
    actual == declared
        || (actual == "list" && declared.starts_with('[') && declared.ends_with(']'))
}

fn join_with_and(items: &[String]) -> String {
    match items.len() {
        0 => String::new(),
        1 => items[0].clone(),
        _ => format!(
            "{}, and {}",
            items[..items.len() - 1].join(", "),
            items[items.len() - 1]
        ),
    }
}

fn unwrap_return(object: Object) -> Object {
    match object {
        Object::Return(value) => *value,
        other => other,
    }
}

fn eval_index_expression(
    iterable: &Expression,
    range: &[Expression],
    env: &Rc<Environment>,
) -> Object {
    let target = eval_expression(iterable, env);
    if target.is_error() {
        return target;
    }

    let mut indexes = Vec::with_capacity(range.len());
    for expression in range {
        let value = eval_expression(expression, env);
        if value.is_error() {
            return value;
        }
        indexes.push(value);
    }

    match target {
        Object::List(values) => index_list(values, &indexes),
        Object::Tuple(values) => index_tuple(values, &indexes),
        other => RuntimeError::NotAnIterable {
            spec: other.kind().short_name().to_string(),
        }
        .into_object(),
    }
}

fn as_index(value: &Object, iterable: &'static str) -> Result<i64, Object> {
    match value {
        Object::Integer(index) => Ok(*index),
        other => Err(RuntimeError::WrongIndexType {
            iterable,
            spec: other.spec(),
        }
        .into_object()),
    }
}

fn index_tuple(values: Vec<Object>, indexes: &[Object]) -> Object {
    if indexes.len() != 1 {
        return RuntimeError::WrongNumberOfTupleIndexes {
            count: indexes.len(),
        }
        .into_object();
    }
    let index = match as_index(&indexes[0], "tuple") {
        Ok(index) => index,
        Err(error) => return error,
    };
    if index < 0 || index as usize >= values.len() {
        return RuntimeError::OutOfRange {
            iterable: "tuple",
            length: values.len(),
        }
        .into_object();
    }
    values[index as usize].clone()
}

/// One index is an element lookup; two are a `[start, end)` slice whose
/// overlong `end` yields `null`; three add a step, with `end` clamped.
fn index_list(values: Vec<Object>, indexes: &[Object]) -> Object {
    let length = values.len();
    match indexes {
        [index] => {
            let index = match as_index(index, "list") {
                Ok(index) => index,
                Err(error) => return error,
            };
            if index < 0 || index as usize >= length {
                return RuntimeError::OutOfRange {
                    iterable: "list",
                    length,
                }
                .into_object();
            }
            values[index as usize].clone()
        }
        [start, end] => {
            let (start, end) = match (as_index(start, "list"), as_index(end, "list")) {
                (Ok(start), Ok(end)) => (start, end),
                (Err(error), _) | (_, Err(error)) => return error,
            };
            if start < 0 || end < 0 {
                return RuntimeError::OutOfRange {
                    iterable: "list",
                    length,
                }
                .into_object();
            }
            if end as usize > length {
                return Object::Void;
            }
            let (start, end) = (start as usize, end as usize);
            if start >= end {
                return Object::List(Vec::new());
            }
            Object::List(values[start..end].to_vec())
        }
        [start, end, step] => {
            let (start, end, step) = match (
                as_index(start, "list"),
                as_index(end, "list"),
                as_index(step, "list"),
            ) {
                (Ok(start), Ok(end), Ok(step)) => (start, end, step),
                (Err(error), _, _) | (_, Err(error), _) | (_, _, Err(error)) => return error,
            };
            if step <= 0 {
                return RuntimeError::WrongStep { step }.into_object();
            }
            if start < 0 || end < 0 {
                return RuntimeError::OutOfRange {
                    iterable: "list",
                    length,
                }
                .into_object();
            }
            let end = (end as usize).min(length);
            let mut selected = Vec::new();
            let mut position = start as usize;
            while position < end {
                selected.push(values[position].clone());
                position += step as usize;
            }
            Object::List(selected)
        }
        _ => RuntimeError::WrongNumberOfIndexes {
            count: indexes.len(),
        }
        .into_object(),
    }
}
