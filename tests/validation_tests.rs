// tests/validation_tests.rs
//! Rejection tests: programs that parse but must not compile, and programs
//! that must not parse at all.


use tau::{CompilationError, ParseErrorKind, TauError, Unit};
use test_harness::TestHarness;

fn compile_error(harness: &TestHarness, script: &str) -> CompilationError {
    match harness.build(script) {
        Err(TauError::Compilation(err)) => err,
        Err(other) => panic!("{script}: expected a compilation error, got {other}"),
        Ok(compiled) => panic!("{script}: expected an error, got:\n{compiled}"),
    }
}

fn source_error(source: &str) -> CompilationError {
    let mut unit = Unit::new();
    unit.add_source("inline.tau", source);
    match unit.build() {
        Err(TauError::Compilation(err)) => err,
        Err(other) => panic!("expected a compilation error, got {other}"),
        Ok(compiled) => panic!("expected an error, got:\n{compiled}"),
    }
}

// =============================================================================
// Scripts
// =============================================================================

#[test]
fn test_undefined_symbol() {
    let harness = TestHarness::new();
    match compile_error(&harness, "undefined_symbol.tau") {
        CompilationError::UndefinedSymbol { name, span } => {
            assert_eq!(name, "y");
            assert_eq!(span.line, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_type_mismatch() {
    let harness = TestHarness::new();
    let err = compile_error(&harness, "type_mismatch.tau");
    assert!(
        matches!(err, CompilationError::TypeMismatch { .. }),
        "unexpected error: {err}"
    );
    assert_eq!(err.span().line, 3);
}

#[test]
fn test_duplicate_local() {
    let harness = TestHarness::new();
    match compile_error(&harness, "duplicate.tau") {
        CompilationError::DuplicateIdentifier { name, span } => {
            assert_eq!(name, "x");
            assert_eq!(span.line, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_arity_mismatch() {
    let harness = TestHarness::new();
    match compile_error(&harness, "arity.tau") {
        CompilationError::ArityMismatch {
            name,
            expected,
            found,
            ..
        } => {
            assert_eq!(name, "f");
            assert_eq!(expected, 1);
            assert_eq!(found, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_main() {
    let harness = TestHarness::new();
    let err = compile_error(&harness, "no_main.tau");
    assert!(matches!(err, CompilationError::MissingEntryPoint { .. }));
    assert!(err.to_string().contains("main"));
}

#[test]
fn test_parse_error_stops_the_build() {
    let harness = TestHarness::new();
    match harness.build("parse_error.tau") {
        Err(TauError::Parse(err)) => assert_eq!(err.kind, ParseErrorKind::ExpectedToken),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

// =============================================================================
// Inline programs
// =============================================================================

#[test]
fn test_condition_must_be_bool() {
    let err = source_error("func main(): void { if 1 { print 1 } }");
    assert!(matches!(err, CompilationError::TypeMismatch { .. }));

    let err = source_error("func main(): void { while 0 { } }");
    assert!(matches!(err, CompilationError::TypeMismatch { .. }));
}

#[test]
fn test_return_must_match_function_type() {
    let err = source_error(
        "func f(): int { return true }
         func main(): void { print f() }",
    );
    assert!(matches!(err, CompilationError::TypeMismatch { .. }));

    let err = source_error("func main(): void { return 1 }");
    assert!(matches!(err, CompilationError::TypeMismatch { .. }));

    let err = source_error(
        "func f(): int { return }
         func main(): void { print f() }",
    );
    assert!(matches!(err, CompilationError::TypeMismatch { .. }));
}

#[test]
fn test_whole_array_assignment_is_rejected() {
    let err = source_error(
        "func main(): void {
             var a: [2]int
             var b: [2]int
             a = b
         }",
    );
    assert!(matches!(err, CompilationError::TypeMismatch { .. }));
}

#[test]
fn test_constant_index_is_bounds_checked() {
    let err = source_error(
        "func main(): void {
             var a: [2]int
             a[2] = 1
         }",
    );
    assert!(matches!(err, CompilationError::TypeMismatch { .. }));
}

#[test]
fn test_duplicate_function() {
    let err = source_error(
        "func f(): void { }
         func f(): void { }
         func main(): void { }",
    );
    assert!(matches!(
        err,
        CompilationError::DuplicateIdentifier { ref name, .. } if name == "f"
    ));
}

#[test]
fn test_parameter_and_local_share_a_name_in_nested_block() {
    // A nested block opens a new scope, so shadowing is allowed there.
    let mut unit = Unit::new();
    unit.add_source(
        "shadow.tau",
        "func f(x: int): int {
             {
                 var x: int
                 x = 5
             }
             return x
         }
         func main(): void { print f(2) }",
    );
    assert_eq!(unit.run().unwrap().output, [2]);
}

#[test]
fn test_call_before_declaration_is_undefined() {
    let err = source_error(
        "func main(): void { print later() }
         func later(): int { return 1 }",
    );
    assert!(matches!(
        err,
        CompilationError::UndefinedSymbol { ref name, .. } if name == "later"
    ));
}
