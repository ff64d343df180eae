// ABOUTME: End-to-end evaluator tests driving the full pipeline

use sigmaf::env::Environment;
use sigmaf::eval::evaluate;
use sigmaf::lexer::Lexer;
use sigmaf::parser::Parser;
use sigmaf::value::Object;

fn run(source: &str) -> Object {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    assert!(
        parser.errors().is_empty(),
        "unexpected parse errors for {:?}: {:?}",
        source,
        parser.errors()
    );
    let env = Environment::new();
    evaluate(&program, &env).expect("expected the program to produce a value")
}

fn assert_integer(source: &str, expected: i64) {
    match run(source) {
        Object::Integer(value) => assert_eq!(value, expected, "source: {}", source),
        other => panic!("expected Integer for {:?}, got {:?}", source, other),
    }
}

fn assert_float(source: &str, expected: f64) {
    match run(source) {
        Object::Float(value) => assert_eq!(value, expected, "source: {}", source),
        other => panic!("expected Float for {:?}, got {:?}", source, other),
    }
}

fn assert_boolean(source: &str, expected: bool) {
    match run(source) {
        Object::Boolean(value) => assert_eq!(value, expected, "source: {}", source),
        other => panic!("expected Boolean for {:?}, got {:?}", source, other),
    }
}

fn assert_null(source: &str) {
    let result = run(source);
    assert!(
        matches!(result, Object::Void),
        "expected null for {:?}, got {:?}",
        source,
        result
    );
    assert_eq!(result.inspect(), "null");
}

fn assert_error(source: &str, expected: &str) {
    match run(source) {
        Object::Error { message, .. } => assert_eq!(message, expected, "source: {}", source),
        other => panic!("expected Error for {:?}, got {:?}", source, other),
    }
}

#[test]
fn test_integer_evaluation() {
    let cases = [
        ("5", 5),
        ("10", 10),
        ("-5", -5),
        ("-10", -10),
        ("5 + 5", 10),
        ("2 ** 4", 16),
        ("2 * 5 - 3", 7),
        ("10 % 5", 0),
        ("50 / 10 + 32", 37),
        ("-2 ** 5 * 2", -64),
    ];
    for (source, expected) in cases {
        assert_integer(source, expected);
    }
}

#[test]
fn test_float_evaluation() {
    let cases = [
        ("5.0", 5.0),
        ("10.0", 10.0),
        ("-5.0", -5.0),
        ("-10.0", -10.0),
        ("5 / 2", 2.5),
        ("2.5 * 2.0 + 7.0", 12.0),
    ];
    for (source, expected) in cases {
        assert_float(source, expected);
    }
}

#[test]
fn test_double_negation_round_trips() {
    for n in [0i64, 1, 5, 123456] {
        assert_integer(&format!("-(-{})", n), n);
    }
    assert_float("-(-2.5)", 2.5);
}

#[test]
fn test_boolean_evaluation() {
    let cases = [
        ("true", true),
        ("false", false),
        ("1 == 1", true),
        ("3 != 3", false),
        ("1 > 3", false),
        ("3 > 2", true),
        ("1 < 3", true),
        ("3 < 2", false),
        ("3 >= 3", true),
        ("3 <= 2", false),
        ("true == true", true),
        ("false != false", false),
        ("(1 > 2) == true", false),
        ("(1 < 2) == true", true),
        ("\"hello\" != \"hola\"", true),
        ("\"hello\" == \"hello\"", true),
    ];
    for (source, expected) in cases {
        assert_boolean(source, expected);
    }
}

#[test]
fn test_boolean_connectives() {
    let cases = [
        ("true || true;", true),
        ("true || false;", true),
        ("false || true;", true),
        ("false || false;", false),
        ("true && true;", true),
        ("true && false;", false),
        ("false && true;", false),
        ("false && false;", false),
    ];
    for (source, expected) in cases {
        assert_boolean(source, expected);
    }
}

#[test]
fn test_string_evaluation() {
    match run("\"sigmaF\"") {
        Object::String(value) => assert_eq!(value, "sigmaF"),
        other => panic!("expected String, got {:?}", other),
    }
    match run("\"Hello, \" + \"World\"") {
        Object::String(value) => assert_eq!(value, "Hello, World"),
        other => panic!("expected String, got {:?}", other),
    }
}

#[test]
fn test_if_else_evaluation() {
    assert_integer("if (true) then {=> 10}", 10);
    assert_null("if (false) then {=> 10}");
    assert_integer("if (1 < 2) then {=> 10}", 10);
    assert_null("if (1 > 2) then {=> 10}");
    assert_integer("if (true) then {=> 10} else {=> 20}", 10);
    assert_integer("if (false) then {=> 10} else {=> 20}", 20);
    assert_integer("if (1 == 1) then {=> 10} else {=> 20}", 10);
    assert_integer("if (1 != 1) then {=> 10} else {=> 20}", 20);
}

#[test]
fn test_only_true_is_truthy() {
    // Non-boolean conditions take the else branch rather than coercing.
    assert_integer("if 1 then {=> 10} else {=> 20}", 20);
    assert_integer("if null then {=> 10} else {=> 20}", 20);
}

#[test]
fn test_return_evaluation() {
    let cases = [
        ("=> 10;", 10),
        ("=> 10; 9;", 10),
        ("9; => 10; 2 * 4;", 10),
        ("3; => 2 * 4; 0", 8),
        (
            "if 10 > 1 then { if 20 > 10 then { => 1; } else { => 0; } }",
            1,
        ),
    ];
    for (source, expected) in cases {
        assert_integer(source, expected);
    }
}

#[test]
fn test_let_bindings() {
    let cases = [
        ("let a = 5; a;", 5),
        ("let a = 5; let b = a; b", 5),
        ("let a = 5; let b = 3; b;", 3),
        ("let a = 5; let b = 3; let c = b * a + 5; c;", 20),
    ];
    for (source, expected) in cases {
        assert_integer(source, expected);
    }
}

#[test]
fn test_let_rebinding_is_an_error() {
    match run("let a = 5; let a = 6;") {
        Object::Error { message, .. } => {
            assert!(message.starts_with("Non-modifiable Value"));
            assert_eq!(
                message,
                "Non-modifiable Value: The value of a is not modifiable"
            );
        }
        other => panic!("expected Error, got {:?}", other),
    }
}

#[test]
fn test_let_shadowing_in_inner_scope_is_allowed() {
    assert_integer(
        "let a = 5; let f = fn x::int -> int { let a = 10; => a + x; }; f(1);",
        11,
    );
}

#[test]
fn test_let_type_annotation() {
    assert_integer("let a::int = 5; a;", 5);
    assert_error(
        "let a::str = 5;",
        "Type Discrepancy: It was expected type str and it was obtained type int",
    );
}

#[test]
fn test_error_handling() {
    let cases = [
        (
            "5 + true",
            "Type Discrepancy: It is not possible to do the operation '+', for an INTEGER and a BOOLEAN",
        ),
        (
            "5 + true; 9;",
            "Type Discrepancy: It is not possible to do the operation '+', for an INTEGER and a BOOLEAN",
        ),
        (
            "-true;",
            "Unknown Operator: The operator '-' is unknown for BOOLEAN",
        ),
        (
            "true - false;",
            "Unknown Operator: The operator '-' is unknown between BOOLEAN",
        ),
        (
            "true + false; true",
            "Unknown Operator: The operator '+' is unknown between BOOLEAN",
        ),
        (
            "if 10 > 1 then { => true * false; }",
            "Unknown Operator: The operator '*' is unknown between BOOLEAN",
        ),
        (
            "if 10 > 1 then { => true / false; }",
            "Unknown Operator: The operator '/' is unknown between BOOLEAN",
        ),
        (
            "if 10 > 1 then { => true % false; }",
            "Unknown Operator: The operator '%' is unknown between BOOLEAN",
        ),
        ("foobar;", "Identifier not found: foobar"),
    ];
    for (source, expected) in cases {
        assert_error(source, expected);
    }
}

#[test]
fn test_division_by_zero() {
    let expected = "Division by zero: It is not possible to divide by zero";
    assert_error("5 / 0;", expected);
    assert_error("5.0 / 0.0;", expected);
    assert_error("5 % 0;", expected);
}

#[test]
fn test_function_literal_evaluation() {
    match run("fn x::int -> int {=> x + 2;}") {
        Object::Function(function) => {
            assert_eq!(function.parameters.len(), 1);
            assert_eq!(function.type_parameters.len(), 1);
            assert_eq!(function.parameters[0].value, "x");
            assert_eq!(function.type_parameters[0].value, "int");
            assert_eq!(function.type_output.value, "int");
            assert_eq!(function.body.to_string(), "=> (x + 2);");
        }
        other => panic!("expected Function, got {:?}", other),
    }
}

#[test]
fn test_function_calls() {
    let cases = [
        ("let identity = fn x::int -> int { x }; identity(5);", 5),
        ("let identity = fn x::int -> int { => x; }; identity(5)", 5),
        ("let double = fn x::int -> int { => x * 2; }; double(5);", 10),
        (
            "let sum = fn x::int, y::int -> int { => x + y; }; sum(3,8);",
            11,
        ),
        (
            "let sum = fn x::int, y::int -> int { => x + y; }; sum( 5 + 5, sum(10, 10));",
            30,
        ),
        ("fn x::int -> int {=> x}(5);", 5),
        ("fn x::[int] -> int {=> length(x);}([1,2,3,4,5]);", 5),
    ];
    for (source, expected) in cases {
        assert_integer(source, expected);
    }
}

#[test]
fn test_recursive_function() {
    let source = "
        let sum = fn xs::[int] -> int {
            if length(xs) == 0 then {=> 0;};
            => xs[0] + sum(xs[1,length(xs)]);
        }
        sum([1,2,3,4,5]);
    ";
    assert_integer(source, 15);
}

#[test]
fn test_recursion_with_return_keyword() {
    let source = "
        let tail = fn l::[int] -> [int] { return l[1,length(l)]; }
        let lsum = fn l::[int] -> int {
            if length(l) == 1 then { return l[0]; };
            return l[0] + lsum(tail(l));
        }
        lsum([1,2,3,4,5,6,7,8,9,10]);
    ";
    assert_integer(source, 55);
}

#[test]
fn test_closures_capture_definition_environment() {
    let source = "
        let base = 10;
        let add_base = fn x::int -> int { => x + base; }
        add_base(5);
    ";
    assert_integer(source, 15);
}

#[test]
fn test_function_call_void() {
    assert_null("let nullable = fn i::int -> void {=> null;} nullable(5);");
    assert_null("let nullable = fn n::void -> void {=> n;} nullable(null);");
}

#[test]
fn test_tuple_argument_unpacking() {
    let source = "
        let sum_tuple = fn x::int, y::int -> int { => x + y; }
        sum_tuple((3, 4));
    ";
    assert_integer(source, 7);
}

#[test]
fn test_tuple_parameter_indexing() {
    let source = "
        let sum_tuple = fn t::(int,int) -> int { => t[0] + t[1]; }
        sum_tuple((1,2));
    ";
    assert_integer(source, 3);
}

#[test]
fn test_composition() {
    let cases = [
        (
            "let two = fn x::int -> int {=> x * 2;}
             let five = fn i::int -> int {=> i * 5;}
             let ten = five . two;
             ten(3);",
            30,
        ),
        (
            "(fn x::int -> int {=> x * 2;} . fn x::int -> int {=> x * 5;})(1);",
            10,
        ),
        (
            "let two = fn x::int -> int {=> x * 2;}
             let five = fn i::int -> int {=> i * 5;}
             let ten = fn i::int -> int {=> i * 10;};
             two . five . ten (3);",
            300,
        ),
        (
            "let tail = fn l::[int] -> [int] { return l[1,length(l)]; }
             let sum = fn xs::[int] -> int {
                 if length(xs) == 1 then { return xs[0]; }
                 return xs[0] + sum . tail(xs);
             }
             sum([1,2,3,4,5]);",
            15,
        ),
    ];
    for (source, expected) in cases {
        assert_integer(source, expected);
    }
}

#[test]
fn test_composition_law() {
    // (f . g)(x) == f(g(x)) across a few sample points.
    for x in [0i64, 1, 2, 7] {
        let composed = format!(
            "let f = fn a::int -> int {{ => a * 3; }}
             let g = fn b::int -> int {{ => b + 4; }}
             (f . g)({});",
            x
        );
        let direct = format!(
            "let f = fn a::int -> int {{ => a * 3; }}
             let g = fn b::int -> int {{ => b + 4; }}
             f(g({}));",
            x
        );
        assert_eq!(run(&composed), run(&direct), "x = {}", x);
    }
}

#[test]
fn test_composition_through_tuple_output() {
    let source = "
        let sum_tuple = fn x::int, y::int -> int { return x + y; }
        let by_two = fn x::str -> (int,int) {
            let len = length(x);
            return (len, len * 2);
        }
        sum_tuple . by_two (\"a\");
    ";
    assert_integer(source, 3);
}

#[test]
fn test_incompatible_composition() {
    assert_error(
        "let f = fn x::str -> str { => x; }
         let g = fn y::int -> int { => y; }
         f . g;",
        "Incompatible Composition: It is not possible the composition of FUNCTION and FUNCTION",
    );
}

#[test]
fn test_output_type_mismatch() {
    let cases = [
        (
            "let identity = fn x::int -> str { => x; } identity(5);",
            "Output wrongs: The function expected to return type str and return int",
        ),
        (
            "let identity = fn x::int -> float { => x; }; identity(5)",
            "Output wrongs: The function expected to return type float and return int",
        ),
        (
            "let double = fn x::int -> list { => x * 2; }; double(5);",
            "Output wrongs: The function expected to return type list and return int",
        ),
        (
            "let sum = fn x::int, y::int -> tuple { => x + y; }; sum(3,8);",
            "Output wrongs: The function expected to return type tuple and return int",
        ),
    ];
    for (source, expected) in cases {
        assert_error(source, expected);
    }
}

#[test]
fn test_argument_type_mismatch() {
    assert_error(
        "let double = fn x::int -> int { => x * 2; }; double(\"a\");",
        "Arguments wrongs: The function expected to receive types int and receives str",
    );
    assert_error(
        "let sum = fn x::int, y::int -> int { => x + y; }; sum(1, \"a\");",
        "Arguments wrongs: The function expected to receive types int, and int and receives int, and str",
    );
}

#[test]
fn test_call_signature_type_law() {
    // Well-typed arguments produce a value of the declared output type.
    let source = "
        let pair = fn a::int, b::str -> (int,str) { => (a, b); }
        type(pair(1, \"x\"));
    ";
    match run(source) {
        Object::String(spec) => assert_eq!(spec, "(int,str)"),
        other => panic!("expected String, got {:?}", other),
    }
}

#[test]
fn test_empty_list_satisfies_list_parameter() {
    assert_integer(
        "let count = fn xs::[int] -> int { => length(xs); } count([]);",
        0,
    );
}

#[test]
fn test_list_literals_and_indexing() {
    let cases = [
        ("let identity = [1,2,3]; identity[1];", 2),
        ("let identity = [1,2,3]; identity[0];", 1),
        ("let double = [1,1,2,3,4,5]; double[5];", 5),
        ("let sum = [1,1,2,3,5,8,13,21]; sum[7];", 21),
        ("let sum = [1,4,5,4,4,4,5]; sum[1 + 1];", 5),
        ("[1,2,3,4,5][0];", 1),
    ];
    for (source, expected) in cases {
        assert_integer(source, expected);
    }
}

#[test]
fn test_list_index_matches_literal_elements() {
    for (index, expected) in [(0, 7), (1, 8), (2, 9)] {
        assert_integer(&format!("[7,8,9][{}]", index), expected);
    }
}

#[test]
fn test_tuple_indexing() {
    let cases = [
        ("let identity = (1,2,3); identity[1];", 2),
        ("let identity = (1,2,3); identity[0];", 1),
        ("let double = (1,1,2,3,4,5); double[5];", 5),
        ("let sum = (1,1,2,3,5,8,13,21); sum[7];", 21),
        ("let sum = (1,4,5,4,4,4,5); sum[1 + 1];", 5),
        ("(1,2,3,4,5)[0];", 1),
    ];
    for (source, expected) in cases {
        assert_integer(source, expected);
    }
}

#[test]
fn test_list_out_of_range() {
    assert_error(
        "let identity = [1,2,3]; identity[3];",
        "Out range: The length of the list is 3",
    );
    assert_error(
        "let identity = [1,2,3,1,2,3]; identity[100];",
        "Out range: The length of the list is 6",
    );
}

#[test]
fn test_tuple_out_of_range() {
    assert_error(
        "let identity = (1,2,3); identity[3];",
        "Out range: The length of the tuple is 3",
    );
    assert_error(
        "let identity = (1,2,3,1,2,3); identity[100];",
        "Out range: The length of the tuple is 6",
    );
}

#[test]
fn test_tuple_rejects_slices() {
    assert_error(
        "(1,2,3)[0,2];",
        "Wrong number of indexes: The tuple only required an index, and it was delivered 2 indexes",
    );
}

#[test]
fn test_list_slicing() {
    assert_eq!(
        run("[1,2,3,4,5][1,3];"),
        Object::List(vec![Object::Integer(2), Object::Integer(3)])
    );
    assert_eq!(run("[1,2,3][1,1];"), Object::List(vec![]));
    assert_eq!(
        run("[1,2,3,4,5][0,5,2];"),
        Object::List(vec![
            Object::Integer(1),
            Object::Integer(3),
            Object::Integer(5)
        ])
    );
}

#[test]
fn test_list_slice_past_end_is_null() {
    assert_null("[1,2,3][0,10];");
}

#[test]
fn test_too_many_indexes() {
    assert_error(
        "[1,2,3][0,1,1,1];",
        "Wrong number of indexes: 4 indexes were delivered and between 1 and 3 are required",
    );
}

#[test]
fn test_indexing_non_iterable() {
    assert_error(
        "5[0];",
        "Not a iterable: The object delivered is not a iterable type is of type int",
    );
}

#[test]
fn test_list_concatenation() {
    assert_eq!(run("[] + []"), Object::List(vec![]));
    assert_eq!(
        run("[1,2,3] + [4,5,6]"),
        Object::List(
            (1..=6).map(Object::Integer).collect::<Vec<_>>()
        )
    );
    assert_eq!(
        run("[1,2,3] + []"),
        Object::List(vec![
            Object::Integer(1),
            Object::Integer(2),
            Object::Integer(3)
        ])
    );
    assert_eq!(
        run("[] + [1,2,3]"),
        Object::List(vec![
            Object::Integer(1),
            Object::Integer(2),
            Object::Integer(3)
        ])
    );
}

#[test]
fn test_incompatible_list_concatenation() {
    assert_error(
        "[1,2] + [\"a\", \"b\"];",
        "Incompatible list operation: It is not possible to do the operation + between a INTEGER List and a STRING List",
    );
}

#[test]
fn test_list_equality() {
    assert_boolean("[1,2,3] == [1,2,3]", true);
    assert_boolean("[1,2,3] != [1,2,4]", true);
    assert_boolean("[1,2,3] == [1,2]", false);
}

#[test]
fn test_tuple_arithmetic() {
    assert_eq!(
        run("(1,2) + (3,4)"),
        Object::Tuple(vec![Object::Integer(4), Object::Integer(6)])
    );
    assert_eq!(
        run("(5,6) - (1,2)"),
        Object::Tuple(vec![Object::Integer(4), Object::Integer(4)])
    );
    assert_boolean("(1,2) == (1,2)", true);
    assert_boolean("(1,2) != (2,1)", true);
}

#[test]
fn test_incompatible_tuple_operation() {
    assert_error(
        "(1,2) + (1,2,3)",
        "Incompatible tuple operation: It is not possible to do the operation + between a INTEGER Tuple and a INTEGER Tuple",
    );
    assert_error(
        "(1,2) + (\"a\",\"b\")",
        "Incompatible tuple operation: It is not possible to do the operation + between a INTEGER Tuple and a STRING Tuple",
    );
}

#[test]
fn test_errors_short_circuit_aggregates() {
    assert_error("[1/0, 2];", "Division by zero: It is not possible to divide by zero");
    assert_error("(1/0, 2);", "Division by zero: It is not possible to divide by zero");
    assert_error(
        "let f = fn x::int -> int { => x; }; f(1/0);",
        "Division by zero: It is not possible to divide by zero",
    );
}

#[test]
fn test_evaluation_is_deterministic() {
    let source = "let f = fn x::int -> int { => x * x; } f(3) + f(4);";
    let first = run(source);
    let second = run(source);
    assert_eq!(first, second);
    assert_eq!(first, Object::Integer(25));
}

#[test]
fn test_recursion_depth_is_bounded() {
    assert_error(
        "let loop = fn x::int -> int { => loop(x); } loop(1);",
        "Maximum recursion depth exceeded while being evaluated",
    );
}

#[test]
fn test_calling_a_non_function() {
    assert_error("let a = 5; a(1);", "It is not a function: INTEGER");
}
