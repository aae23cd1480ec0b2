use super::*;
use crate::lexer::Lexer;
use crate::parser::Parser;
use pretty_assertions::assert_eq;

fn run(src: &str) -> Result<Option<Object>, RuntimeError> {
    let tokens = Lexer::new(src).tokenize().unwrap();
    let program = Parser::new(tokens).parse_program().unwrap();
    eval_program(&program, &Env::new())
}

fn eval_ok(src: &str) -> Object {
    match run(src) {
        Ok(Some(v)) => v,
        other => panic!("{} evaluated to {:?}", src, other),
    }
}

fn eval_err(src: &str) -> String {
    match run(src) {
        Err(e) => e.to_string(),
        other => panic!("{} should fail, got {:?}", src, other),
    }
}

fn assert_int(src: &str, expected: i64) {
    assert_eq!(eval_ok(src), Object::Integer(expected), "source: {}", src);
}

fn assert_bool(src: &str, expected: bool) {
    assert_eq!(eval_ok(src), Object::native_bool(expected), "source: {}", src);
}

#[test]
fn test_integer_arithmetic() {
    let cases = [
        ("5", 5),
        ("-10", -10),
        ("5 + 5 + 5 + 5 - 10", 10),
        ("2 * 2 * 2 * 2 * 2", 32),
        ("-50 + 100 + -50", 0),
        ("20 + 2 * -10", 0),
        ("50 / 2 * 2 + 10", 60),
        ("3 * (3 * 3) + 10", 37),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
    ];
    for (src, expected) in cases {
        assert_int(src, expected);
    }
}

#[test]
fn test_division_truncates_toward_zero() {
    assert_int("7 / 2", 3);
    assert_int("-7 / 2", -3);
    assert_int("7 / -2", -3);
}

#[test]
fn test_division_by_zero_is_an_error() {
    assert_eq!(eval_err("1 / 0"), "division by zero");
}

#[test]
fn test_overflow_wraps() {
    assert_int("9223372036854775807 + 1", i64::MIN);
}

#[test]
fn test_comparisons() {
    let cases = [
        ("1 < 2", true),
        ("1 > 2", false),
        ("1 == 1", true),
        ("1 != 1", false),
        ("true == true", true),
        ("true != false", true),
        ("(1 < 2) == true", true),
        ("(1 > 2) == true", false),
    ];
    for (src, expected) in cases {
        assert_bool(src, expected);
    }
}

#[test]
fn test_bang_uses_numeric_truthiness() {
    assert_bool("!true", false);
    assert_bool("!false", true);
    assert_bool("!5", false);
    assert_bool("!0", true);
    assert_bool("!!5", true);
}

#[test]
fn test_bang_rejects_other_types() {
    assert_eq!(eval_err("!\"a\""), "undefined behavior with ! operator and STRING");
    assert_eq!(eval_err("![]"), "undefined behavior with ! operator and ARRAY");
}

#[test]
fn test_if_treats_zero_as_truthy() {
    assert_int("if (0) { 1 } else { 2 }", 1);
    assert_int("if (!0) { 1 } else { 2 }", 2);
}

#[test]
fn test_if_else() {
    assert_int("if (true) { 10 }", 10);
    assert_eq!(eval_ok("if (false) { 10 }"), NULL);
    assert_int("if (1 < 2) { 10 } else { 20 }", 10);
    assert_int("if (1 > 2) { 10 } else { 20 }", 20);
    assert_eq!(eval_ok("if (if (false) { 1 }) { 10 }"), NULL);
}

#[test]
fn test_return_statements() {
    assert_int("return 10;", 10);
    assert_int("return 10; 9;", 10);
    assert_int("9; return 2 * 5; 9;", 10);
    assert_int(
        "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
        10,
    );
}

#[test]
fn test_error_messages() {
    let cases = [
        ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
        ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
        ("1 + \"a\"", "type mismatch: INTEGER + STRING"),
        ("-true", "unknown operator: -BOOLEAN"),
        ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
        ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
        ("if (10 > 1) { true + false; }", "unknown operator: BOOLEAN + BOOLEAN"),
        (
            "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
            "unknown operator: BOOLEAN + BOOLEAN",
        ),
        ("\"Hello\" - \"World\"", "unknown operator: STRING - STRING"),
        ("foobar", "identifier not found: foobar"),
        ("{\"name\": \"Lark\"}[fn(x) { x }];", "unusable as hash key: FUNCTION"),
        ("{[1]: 2}", "unusable as hash key: ARRAY"),
        ("5(1)", "not a function: INTEGER"),
        ("1[0]", "index operator not supported: INTEGER"),
        ("[1][true]", "index operator not supported: ARRAY"),
    ];
    for (src, expected) in cases {
        assert_eq!(eval_err(src), expected, "source: {}", src);
    }
}

#[test]
fn test_error_stops_later_statements() {
    let env = Env::new();
    let tokens = Lexer::new("let a = 1; a + true; let b = 2;").tokenize().unwrap();
    let program = Parser::new(tokens).parse_program().unwrap();
    assert!(eval_program(&program, &env).is_err());
    assert_eq!(env.get("a"), Some(Object::Integer(1)));
    assert_eq!(env.get("b"), None);
}

#[test]
fn test_blocks_share_the_enclosing_scope() {
    assert_int("if (true) { let x = 7; }; x", 7);
    assert_int("let x = 1; if (true) { let x = 2; }; x", 2);

    let env = Env::new();
    let tokens = Lexer::new("if (true) { 1 + true; let leaked = 1; }").tokenize().unwrap();
    let program = Parser::new(tokens).parse_program().unwrap();
    assert!(eval_program(&program, &env).is_err());
    assert_eq!(env.get("leaked"), None);
}

#[test]
fn test_error_skips_right_operand_when_left_fails() {
    let env = Env::new();
    let tokens = Lexer::new("missing + bump()").tokenize().unwrap();
    let program = Parser::new(tokens).parse_program().unwrap();
    assert_eq!(
        eval_program(&program, &env),
        Err(RuntimeError::IdentifierNotFound("missing".into()))
    );
}

#[test]
fn test_let_statements() {
    assert_int("let a = 5; a;", 5);
    assert_int("let a = 5 * 5; a;", 25);
    assert_int("let a = 5; let b = a; b;", 5);
    assert_int("let a = 5; let b = a; let c = a + b + 5; c;", 15);
    assert_int("let a = 1; let a = a + 1; a", 2);
}

#[test]
fn test_let_produces_no_value() {
    assert_eq!(run("let a = 5;"), Ok(None));
    assert_eq!(run(""), Ok(None));
}

#[test]
fn test_let_in_block_yields_null() {
    assert_eq!(eval_ok("let f = fn() { let x = 1; }; f()"), NULL);
}

#[test]
fn test_function_object() {
    match eval_ok("fn(x) { x + 2; };") {
        Object::Function(func) => {
            assert_eq!(func.parameters, vec![Identifier("x".into())]);
            assert_eq!(func.body.to_string(), "(x + 2)");
        }
        other => panic!("expected function, got {:?}", other),
    }
}

#[test]
fn test_function_application() {
    let cases = [
        ("let identity = fn(x) { x; }; identity(5);", 5),
        ("let identity = fn(x) { return x; }; identity(5);", 5),
        ("let double = fn(x) { x * 2; }; double(5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5, 5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", 20),
        ("fn(x) { x; }(5)", 5),
    ];
    for (src, expected) in cases {
        assert_int(src, expected);
    }
}

#[test]
fn test_return_only_leaves_the_innermost_function() {
    assert_int("let f = fn() { return 1; }; f(); 2", 2);
    assert_int("let f = fn() { let g = fn() { return 1; }; g() + 10 }; f()", 11);
}

#[test]
fn test_closures_capture_definition_env() {
    assert_int(
        "let makeAdder = fn(x) { fn(y) { x + y } }; let addTwo = makeAdder(2); addTwo(3);",
        5,
    );
}

#[test]
fn test_parameters_shadow_outer_bindings() {
    assert_int("let x = 10; let f = fn(x) { x }; f(1) + x", 11);
}

#[test]
fn test_calls_do_not_leak_bindings() {
    assert_eq!(
        eval_err("let f = fn() { let inner = 1; inner }; f(); inner"),
        "identifier not found: inner"
    );
}

#[test]
fn test_arity_mismatch() {
    assert_eq!(
        eval_err("let add = fn(a, b) { a + b }; add(1)"),
        "Argument mismatch, function FUNCTION expected 2 parameter(s), but got 1"
    );
}

#[test]
fn test_recursion() {
    assert_int(
        "let fact = fn(n) { if (n < 2) { 1 } else { n * fact(n - 1) } }; fact(5);",
        120,
    );
}

#[test]
fn test_first_argument_error_wins() {
    assert_eq!(
        eval_err("let f = fn(a, b) { a }; f(x, y)"),
        "identifier not found: x"
    );
}

#[test]
fn test_strings() {
    assert_eq!(eval_ok("\"Hello\" + \" \" + \"World!\"").inspect(), "Hello World!");
    assert_bool("\"ab\" == \"ab\"", true);
    assert_bool("\"ab\" != \"ab\"", false);
    assert_bool("\"ab\" == \"ba\"", false);
}

#[test]
fn test_equality_by_identity() {
    assert_bool("[1, 2] == [1, 2]", false);
    assert_bool("let a = [1, 2]; a == a", true);
    assert_bool("{1: 2} == {1: 2}", false);
    assert_bool("let f = fn() { 1 }; f == f", true);
    assert_bool("fn() { 1 } == fn() { 1 }", false);
    assert_bool("len == len", true);
    assert_bool("5 == 5", true);
    assert_bool("1 == true", false);
    assert_bool("\"1\" != 1", true);
}

#[test]
fn test_mismatched_ordering_is_an_error() {
    assert_eq!(eval_err("1 < true"), "type mismatch: INTEGER < BOOLEAN");
}

#[test]
fn test_arrays() {
    assert_eq!(eval_ok("[1, 2 * 2, 3 + 3]").inspect(), "[1, 4, 6]");
    let cases = [
        ("[1, 2, 3][0]", 1),
        ("[1, 2, 3][2]", 3),
        ("let i = 0; [1][i];", 1),
        ("[1, 2, 3][1 + 1];", 3),
        ("let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];", 6),
    ];
    for (src, expected) in cases {
        assert_int(src, expected);
    }
}

#[test]
fn test_out_of_range_index_is_null() {
    assert_eq!(eval_ok("[1, 2, 3][5]"), NULL);
    assert_eq!(eval_ok("[1, 2, 3][3]"), NULL);
    assert_eq!(eval_ok("[1, 2, 3][-1]"), NULL);
}

#[test]
fn test_array_element_error_short_circuits() {
    assert_eq!(eval_err("[1, nope, 1 / 0]"), "identifier not found: nope");
}

#[test]
fn test_hash_literals() {
    let src = r#"
        let two = "two";
        {
            "one": 10 - 9,
            two: 1 + 1,
            "thr" + "ee": 6 / 2,
            4: 4,
            true: 5,
            false: 6
        }
    "#;
    let hash = match eval_ok(src) {
        Object::Hash(pairs) => pairs,
        other => panic!("expected hash, got {:?}", other),
    };
    let expected = [
        (Object::string("one"), 1),
        (Object::string("two"), 2),
        (Object::string("three"), 3),
        (Object::Integer(4), 4),
        (Object::native_bool(true), 5),
        (Object::native_bool(false), 6),
    ];
    let pairs = hash.borrow();
    assert_eq!(pairs.len(), expected.len());
    for (key, value) in expected {
        let pair = pairs.get(&key.hash_key().unwrap()).unwrap();
        assert_eq!(pair.value, Object::Integer(value));
    }
}

#[test]
fn test_hash_index() {
    assert_int("{\"foo\": 5}[\"foo\"]", 5);
    assert_int("let key = \"foo\"; {\"foo\": 5}[key]", 5);
    assert_int("{5: 5}[5]", 5);
    assert_int("{true: 5}[true]", 5);
    assert_eq!(eval_ok("{\"a\": 1}[\"b\"]"), NULL);
    assert_eq!(eval_ok("{}[\"foo\"]"), NULL);
}

#[test]
fn test_duplicate_hash_keys_overwrite() {
    assert_int("{\"a\": 1, \"a\": 2}[\"a\"]", 2);
    assert_int("len({\"a\": 1, \"a\": 2})", 1);
}

#[test]
fn test_builtins_resolve_after_env() {
    assert_int("len(\"four\")", 4);
    assert_int("len([1, 2])", 2);
    assert_int("let len = fn(x) { 99 }; len(\"four\")", 99);
    assert_eq!(eval_err("len(1)"), "argument to `len` not supported, got INTEGER");
    assert_eq!(
        eval_err("len(\"one\", \"two\")"),
        "wrong number of arguments to `len`: got=2, want=1"
    );
}

#[test]
fn test_builtins_compose() {
    let src = r#"
        let map = fn(arr, f) {
            let iter = fn(arr, acc) {
                if (len(arr) == 0) { acc } else { iter(rest(arr), push(acc, f(first(arr)))) }
            };
            iter(arr, []);
        };
        map([1, 2, 3], fn(x) { x * 2 })
    "#;
    assert_eq!(eval_ok(src).inspect(), "[2, 4, 6]");
    assert_int("last([1, 2, 3])", 3);
}

#[test]
fn test_builtin_inspection() {
    assert_eq!(eval_ok("len").inspect(), "builtin function len");
}

#[test]
fn test_signal_rendering() {
    let err = Signal::from(RuntimeError::IdentifierNotFound("x".into()));
    assert_eq!(err.type_name(), ObjectType::Error);
    assert_eq!(err.to_string(), "ERROR: identifier not found: x");
    let ret = Signal::Return(Object::Integer(1));
    assert_eq!(ret.type_name(), ObjectType::ReturnValue);
    assert_eq!(ret.to_string(), "1");
}

#[test]
fn test_is_truthy() {
    assert!(!is_truthy(&NULL));
    assert!(!is_truthy(&Object::native_bool(false)));
    assert!(is_truthy(&Object::Integer(0)));
    assert!(is_truthy(&Object::string("")));
    assert!(is_truthy(&Object::array(vec![])));
}
