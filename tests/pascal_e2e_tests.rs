/// End-to-end integration tests
/// Demonstrates: Lexer → Parser → Evaluator working together
use minipas::lexer::{Lexer, TokenKind};
use minipas::parser::{BinaryOp, Node, Parser};
use minipas::runtime::{Evaluator, Value};
use minipas::Error;

#[test]
fn test_e2e_expression_tree_and_value() {
    let source = "4 * 2 + 3";

    // Parse
    let mut parser = Parser::new(Lexer::from_source(source));
    let node = parser.parse_expression().unwrap();
    assert_eq!(
        node,
        Node::binary(
            BinaryOp::Add,
            Node::binary(BinaryOp::Mul, Node::Num(4), Node::Num(2)),
            Node::Num(3)
        )
    );

    // Evaluate
    let mut evaluator = Evaluator::new();
    assert_eq!(evaluator.evaluate_expression(&node).unwrap(), Value::Number(11));
}

#[test]
fn test_e2e_headerless_program() {
    let outcome = minipas::run(&[
        "BEGIN",
        "    number := 2;",
        "    a := number;",
        "    b := 10 * a + 10 * number / 4;",
        "    c := a - - b",
        "END.",
    ])
    .unwrap();

    assert_eq!(outcome.program, "main");
    assert_eq!(outcome.bindings.len(), 4);
    assert_eq!(outcome.get("number"), Some(&Value::Number(2)));
    assert_eq!(outcome.get("a"), Some(&Value::Number(2)));
    assert_eq!(outcome.get("b"), Some(&Value::Number(25)));
    assert_eq!(outcome.get("c"), Some(&Value::Number(27)));
}

#[test]
fn test_e2e_token_stream() {
    let kinds: Vec<TokenKind> = Lexer::from_source("6+2 - 3 * 10 / 5")
        .tokenize()
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![
            TokenKind::IntegerConst(6),
            TokenKind::Plus,
            TokenKind::IntegerConst(2),
            TokenKind::Minus,
            TokenKind::IntegerConst(3),
            TokenKind::Multiply,
            TokenKind::IntegerConst(10),
            TokenKind::Divide,
            TokenKind::IntegerConst(5),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_e2e_undefined_variable() {
    let err = minipas::run(&["PROGRAM t;", "BEGIN", "    x := y + 1", "END."]).unwrap_err();
    assert!(err.is_runtime_error());
    assert_eq!(
        err,
        Error::UndefinedVariable {
            name: "y".to_string()
        }
    );
}

#[test]
fn test_e2e_missing_final_dot() {
    let err = minipas::parse(&["BEGIN a := 1 END"]).unwrap_err();
    match err {
        Error::UnexpectedToken {
            expected,
            found,
            line,
            column,
        } => {
            assert_eq!(expected, "`.`");
            assert_eq!(found, "end of input");
            assert_eq!((line, column), (1, 17));
        }
        other => panic!("Expected UnexpectedToken, got {:?}", other),
    }
}

#[test]
fn test_e2e_declarations_and_nested_blocks() {
    let outcome = minipas::run(&[
        "PROGRAM nested;",
        "VAR x, y : INTEGER;",
        "    done : BOOLEAN;",
        "BEGIN",
        "    x := 1;",
        "    BEGIN",
        "        y := x + 1;",
        "        BEGIN x := y * 10 END;",
        "    END;",
        "    done := (x >= 20) && (y == 2);",
        "    ;",
        "END.",
    ])
    .unwrap();

    assert_eq!(outcome.get("x"), Some(&Value::Number(20)));
    assert_eq!(outcome.get("y"), Some(&Value::Number(2)));
    assert_eq!(outcome.get("done"), Some(&Value::Boolean(true)));
}

#[test]
fn test_e2e_declared_but_unassigned_is_unbound() {
    let outcome = minipas::run(&["VAR z : INTEGER; BEGIN END."]).unwrap();
    assert!(outcome.get("z").is_none());
    assert!(outcome.bindings.is_empty());
}

#[test]
fn test_e2e_functions_and_procedures() {
    let outcome = minipas::run(&[
        "PROGRAM calls;",
        "FUNCTION max2(a, b : INTEGER) : INTEGER;",
        "BEGIN",
        "    max2 := (a > b) * a + (a <= b) * b",
        "END;",
        "PROCEDURE record(v : INTEGER; flag : BOOLEAN);",
        "BEGIN",
        "    last := v;",
        "    seen := flag",
        "END;",
        "BEGIN",
        "    m := max2(3, 9) + max2(-4, -8);",
        "    record(m, TRUE)",
        "END.",
    ])
    .unwrap();

    assert_eq!(outcome.get("m"), Some(&Value::Number(5)));
    // Bindings made inside the procedure frame are discarded on return
    assert!(outcome.get("last").is_none());
    assert!(outcome.get("seen").is_none());
    assert_eq!(outcome.get("max2").map(Value::type_name), Some("function".to_string()));
    assert_eq!(outcome.get("record").map(Value::type_name), Some("procedure".to_string()));
}

#[test]
fn test_e2e_function_without_result() {
    let err = minipas::run(&[
        "FUNCTION nothing(a : INTEGER);",
        "BEGIN b := a END;",
        "BEGIN r := nothing(1) END.",
    ])
    .unwrap_err();
    assert_eq!(
        err,
        Error::NoReturnValue {
            name: "nothing".to_string()
        }
    );
}

#[test]
fn test_e2e_call_statement_discards_result() {
    let outcome = minipas::run(&[
        "FUNCTION one : INTEGER; BEGIN one := 1 END;",
        "BEGIN one(); r := 2 END.",
    ])
    .unwrap();
    assert_eq!(outcome.get("r"), Some(&Value::Number(2)));
}

#[test]
fn test_e2e_arity_mismatch() {
    let err = minipas::run(&[
        "FUNCTION add(a, b : INTEGER) : INTEGER; BEGIN add := a + b END;",
        "BEGIN r := add(1, 2, 3) END.",
    ])
    .unwrap_err();
    assert_eq!(
        err,
        Error::ArityMismatch {
            name: "add".to_string(),
            expected: 2,
            got: 3,
        }
    );
}

#[test]
fn test_e2e_division_by_zero() {
    let err = minipas::run(&["BEGIN a := 0; b := 10 / a END."]).unwrap_err();
    assert_eq!(err, Error::DivisionByZero);
    assert!(err.to_string().contains("Division by zero"));
}

#[test]
fn test_e2e_comments_ignored() {
    let outcome = minipas::run(&[
        "{ header comment }",
        "BEGIN",
        "    a := 1 { trailing",
        "             spans lines }",
        "END.",
    ])
    .unwrap();
    assert_eq!(outcome.get("a"), Some(&Value::Number(1)));
}

#[test]
fn test_e2e_lex_error_reported_with_position() {
    let err = minipas::run(&["BEGIN", "  a := 1 = 2", "END."]).unwrap_err();
    assert_eq!(
        err,
        Error::InvalidCharacter {
            ch: '=',
            line: 2,
            column: 10,
        }
    );
}

#[test]
fn test_e2e_outcome_json() {
    let outcome = minipas::run(&["BEGIN n := 3; big := n > 2 END."]).unwrap();
    assert_eq!(outcome.to_json().unwrap(), serde_json::json!({ "big": true, "n": 3 }));
}
