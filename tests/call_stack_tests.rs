//! Call-chain name resolution and activation record lifecycle
use minipas::{
    CallStack, Error, Evaluator, EvaluatorConfig, FrameKind, Value, DEFAULT_MAX_CALL_DEPTH,
};

fn run_with(config: EvaluatorConfig, lines: &[&str]) -> minipas::Result<minipas::Outcome> {
    let program = minipas::parse(lines)?;
    Evaluator::with_config(config).evaluate(&program)
}

#[test]
fn test_callee_sees_caller_locals() {
    // `peek` is declared at top level, so no enclosing block binds `secret`;
    // it only resolves because `outer` is on the call chain.
    let outcome = minipas::run(&[
        "FUNCTION peek : INTEGER;",
        "BEGIN peek := secret * 2 END;",
        "FUNCTION outer : INTEGER;",
        "BEGIN",
        "    secret := 21;",
        "    outer := peek()",
        "END;",
        "BEGIN r := outer() END.",
    ])
    .unwrap();

    assert_eq!(outcome.get("r"), Some(&Value::Number(42)));
    assert!(outcome.get("secret").is_none());
}

#[test]
fn test_caller_binding_missing_outside_chain() {
    let err = minipas::run(&[
        "FUNCTION peek : INTEGER;",
        "BEGIN peek := secret END;",
        "BEGIN r := peek() END.",
    ])
    .unwrap_err();
    assert_eq!(
        err,
        Error::UndefinedVariable {
            name: "secret".to_string()
        }
    );
}

#[test]
fn test_parameters_shadow_caller_bindings() {
    let outcome = minipas::run(&[
        "FUNCTION echo(x : INTEGER) : INTEGER;",
        "BEGIN echo := x END;",
        "BEGIN",
        "    x := 1;",
        "    r := echo(x + 99);",
        "    s := x",
        "END.",
    ])
    .unwrap();

    assert_eq!(outcome.get("r"), Some(&Value::Number(100)));
    assert_eq!(outcome.get("s"), Some(&Value::Number(1)));
}

#[test]
fn test_assignment_in_callee_does_not_leak() {
    let outcome = minipas::run(&[
        "PROCEDURE clobber;",
        "BEGIN counter := 999 END;",
        "BEGIN",
        "    counter := 1;",
        "    clobber()",
        "END.",
    ])
    .unwrap();
    assert_eq!(outcome.get("counter"), Some(&Value::Number(1)));
}

#[test]
fn test_nested_routine_declared_inside_function() {
    let outcome = minipas::run(&[
        "FUNCTION outer(n : INTEGER) : INTEGER;",
        "    FUNCTION inner : INTEGER;",
        "    BEGIN inner := n + 1 END;",
        "BEGIN outer := inner() * 2 END;",
        "BEGIN r := outer(4) END.",
    ])
    .unwrap();

    assert_eq!(outcome.get("r"), Some(&Value::Number(10)));
    // `inner` lived in the `outer` frame only
    assert!(outcome.get("inner").is_none());
}

#[test]
fn test_runaway_recursion_hits_depth_limit() {
    let lines = [
        "FUNCTION down(n : INTEGER) : INTEGER;",
        "BEGIN down := down(n - 1) END;",
        "BEGIN r := down(10) END.",
    ];

    let config = EvaluatorConfig::from_json(r#"{"max_call_depth": 32}"#).unwrap();
    let err = run_with(config, &lines).unwrap_err();
    assert_eq!(err, Error::CallDepthExceeded { limit: 32 });

    let config = EvaluatorConfig::from_json(r#"{"max_call_depth": 3}"#).unwrap();
    let err = run_with(config, &lines).unwrap_err();
    assert_eq!(err, Error::CallDepthExceeded { limit: 3 });
}

#[test]
fn test_runaway_recursion_with_default_config() {
    // Runs on the default test thread stack, so the default limit must be
    // reached before the native stack is exhausted.
    let err = minipas::run(&[
        "FUNCTION down(n : INTEGER) : INTEGER;",
        "BEGIN down := down(n - 1) END;",
        "BEGIN r := down(10) END.",
    ])
    .unwrap_err();
    assert_eq!(
        err,
        Error::CallDepthExceeded {
            limit: DEFAULT_MAX_CALL_DEPTH
        }
    );
    assert_eq!(EvaluatorConfig::default().max_call_depth, DEFAULT_MAX_CALL_DEPTH);
}

#[test]
fn test_depth_limit_counts_root_frame() {
    let lines = [
        "FUNCTION one : INTEGER; BEGIN one := 1 END;",
        "BEGIN r := one() END.",
    ];

    let config = EvaluatorConfig {
        max_call_depth: 2,
        ..Default::default()
    };
    assert!(run_with(config, &lines).is_ok());

    let config = EvaluatorConfig {
        max_call_depth: 1,
        ..Default::default()
    };
    assert_eq!(
        run_with(config, &lines).unwrap_err(),
        Error::CallDepthExceeded { limit: 1 }
    );
}

#[test]
fn test_evaluation_is_repeatable() {
    let program = minipas::parse(&[
        "PROGRAM twice;",
        "FUNCTION inc(v : INTEGER) : INTEGER; BEGIN inc := v + 1 END;",
        "BEGIN a := inc(1); b := inc(a) END.",
    ])
    .unwrap();

    let mut evaluator = Evaluator::new();
    let first = evaluator.evaluate(&program).unwrap();
    let second = evaluator.evaluate(&program).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.get("b"), Some(&Value::Number(3)));
}

#[test]
fn test_root_frame_dump() {
    let config = EvaluatorConfig {
        dump_bindings: true,
        ..Default::default()
    };
    let outcome = run_with(
        config,
        &[
            "PROGRAM Part10;",
            "BEGIN number := 2; a := number; flag := !FALSE END.",
        ],
    )
    .unwrap();

    assert_eq!(
        outcome.dump.as_deref(),
        Some("Part10 (kind=PROGRAM, level=1)\n\ta : 2\n\tflag : TRUE\n\tnumber : 2\n")
    );
}

#[test]
fn test_call_stack_directly() {
    let mut stack = CallStack::new();
    stack.push_root("main");
    stack.set("x", Value::Number(1)).unwrap();
    stack.push_call("f", FrameKind::Function);
    stack.push_call("g", FrameKind::Procedure);

    assert_eq!(stack.depth(), 3);
    assert_eq!(stack.get("x"), Some(&Value::Number(1)));
    assert_eq!(stack.current().map(|f| f.kind), Some(FrameKind::Procedure));

    stack.pop();
    stack.pop();
    stack.pop();
    assert!(stack.is_empty());
    assert_eq!(stack.get("x"), None);
}
