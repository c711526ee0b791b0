// tests/parser_tests.rs
//! Parser tests over the scripts in `test_scripts/`.
//!
//! These check the shape of the trees the parser hands to the compiler, not
//! any annotation the passes add later.


use bumpalo::Bump;
use tau::ParseErrorKind;
use tau_parser::ast::{BinaryOp, Expr, Stmt, TypeKind};
use test_harness::TestHarness;

#[test]
fn test_every_valid_script_parses() {
    let harness = TestHarness::new();
    let scripts = [
        ("hello.tau", 1),
        ("factorial.tau", 2),
        ("short_circuit.tau", 2),
        ("arrays.tau", 3),
        ("loops.tau", 3),
    ];
    for (script, functions) in scripts {
        let arena = Bump::new();
        let program = harness.parse_ok(script, &arena);
        assert_eq!(program.functions.len(), functions, "{script}");
        assert!(program.function("main").is_some(), "{script}");
    }
}

#[test]
fn test_semantic_errors_still_parse() {
    let harness = TestHarness::new();
    for script in [
        "undefined_symbol.tau",
        "type_mismatch.tau",
        "duplicate.tau",
        "arity.tau",
        "no_main.tau",
    ] {
        let arena = Bump::new();
        harness.parse_ok(script, &arena);
    }
}

#[test]
fn test_unclosed_paren_is_reported() {
    let harness = TestHarness::new();
    let arena = Bump::new();
    let err = harness.parse("parse_error.tau", &arena).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::ExpectedToken);
    // Points at the `}` where `)` was expected.
    assert_eq!(err.span.line, 4);
    assert!(err.message.contains("found"));
}

#[test]
fn test_array_parameters_and_locals() {
    let harness = TestHarness::new();
    let arena = Bump::new();
    let program = harness.parse_ok("arrays.tau", &arena);

    let sum = program.function("sum").unwrap();
    assert_eq!(sum.params.len(), 2);
    assert_eq!(sum.params[0].name.name, "a");
    assert!(matches!(
        sum.params[0].type_expr.kind,
        TypeKind::Array { size: None, .. }
    ));
    assert!(matches!(sum.ret.kind, TypeKind::Int));

    let main = program.function("main").unwrap();
    assert!(matches!(main.ret.kind, TypeKind::Void));
    assert_eq!(main.body.decls.len(), 1);
    assert!(matches!(
        main.body.decls[0].type_expr.kind,
        TypeKind::Array { size: Some(5), .. }
    ));

    // call fill(squares, 5); print sum(squares, 5); print squares[4]
    let stmts = main.body.stmts;
    assert_eq!(stmts.len(), 3);
    let Stmt::Call(call) = &stmts[0] else {
        panic!("expected a call statement, got {:?}", stmts[0]);
    };
    assert_eq!(call.call.callee.name, "fill");
    assert_eq!(call.call.args.len(), 2);
    let Stmt::Print(print) = &stmts[2] else {
        panic!("expected a print statement, got {:?}", stmts[2]);
    };
    let Expr::ArrayCell(cell) = print.value else {
        panic!("expected an array cell, got {:?}", print.value);
    };
    assert_eq!(cell.array.name, "squares");
    assert!(matches!(cell.index, Expr::IntLiteral(lit) if lit.value == 4));
}

#[test]
fn test_control_flow_shape() {
    let harness = TestHarness::new();
    let arena = Bump::new();
    let program = harness.parse_ok("loops.tau", &arena);

    let fib = program.function("fib").unwrap();
    assert_eq!(fib.body.decls.len(), 3);
    let Stmt::While(body) = &fib.body.stmts[2] else {
        panic!("expected a while loop, got {:?}", fib.body.stmts[2]);
    };
    let Expr::Binary(condition) = body.condition else {
        panic!("expected a comparison, got {:?}", body.condition);
    };
    assert_eq!(condition.op, BinaryOp::Greater);
    assert_eq!(body.body.stmts.len(), 4);

    let gcd = program.function("gcd").unwrap();
    let Stmt::If(check) = &gcd.body.stmts[0] else {
        panic!("expected an if, got {:?}", gcd.body.stmts[0]);
    };
    assert!(check.else_branch.is_none());
    assert!(matches!(gcd.body.stmts[1], Stmt::Return(ret) if ret.value.is_some()));

    // The loop in main wraps a nested block with its own declaration.
    let main = program.function("main").unwrap();
    let Some(Stmt::While(outer)) = main.body.stmts.last() else {
        panic!("expected main to end with a loop");
    };
    let Stmt::Compound(inner) = &outer.body.stmts[0] else {
        panic!("expected a nested block, got {:?}", outer.body.stmts[0]);
    };
    assert_eq!(inner.decls.len(), 1);
    assert_eq!(inner.decls[0].name.name, "doubled");
}

#[test]
fn test_precedence_in_gcd_argument() {
    let harness = TestHarness::new();
    let arena = Bump::new();
    let program = harness.parse_ok("loops.tau", &arena);
    let gcd = program.function("gcd").unwrap();

    // return gcd(b, a - a / b * b)
    let Stmt::Return(ret) = &gcd.body.stmts[1] else {
        panic!("expected a return");
    };
    let Some(Expr::Call(call)) = ret.value else {
        panic!("expected a call, got {:?}", ret.value);
    };
    let Expr::Binary(sub) = call.args[1] else {
        panic!("expected a subtraction");
    };
    assert_eq!(sub.op, BinaryOp::Sub);
    let Expr::Binary(mul) = sub.right else {
        panic!("expected a multiplication");
    };
    assert_eq!(mul.op, BinaryOp::Mul);
    assert!(matches!(mul.left, Expr::Binary(div) if div.op == BinaryOp::Div));
}

#[test]
fn test_parse_leaves_annotations_empty() {
    let harness = TestHarness::new();
    let arena = Bump::new();
    let program = harness.parse_ok("factorial.tau", &arena);

    assert!(program.scope().is_none());
    for func in program.functions {
        assert!(func.name.symbol().is_none());
        assert!(func.frame_size().is_none());
        assert!(func.register_pool().is_none());
        assert!(func.body.scope().is_none());
    }
}
