//! End-to-end tests for the Lit resolver: source text in, a [`Report`] of
//! diagnostics out. Each test parses a complete program and resolves it
//! against an empty externals table, then checks the resulting diagnostics
//! (or their absence) the way a caller of [`lit_resolve::resolve`] would.

use lit_resolve::error::{Report, ResolveError};
use lit_resolve::file::SourceFile;
use lit_resolve::nom_tools::State;
use lit_resolve::resolver::scope::Scope;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn resolve_source(code: &str) -> Report {
    let state = State::new(SourceFile::new(vec!["<test>".into()], code.to_string()));
    let mut ast = lit_resolve::parse(&state).expect("source should parse");
    lit_resolve::resolve(&mut ast, Scope::default())
}

fn assert_clean(code: &str) {
    let report = resolve_source(code);
    assert!(report.errors.is_empty(), "expected no diagnostics, got {:#?}", report.errors);
}

fn assert_single_error(code: &str) -> ResolveError {
    let mut report = resolve_source(code);
    assert_eq!(report.errors.len(), 1, "expected exactly one diagnostic, got {:#?}", report.errors);
    report.errors.pop().unwrap()
}

#[test]
fn numeric_widening_initializer_resolves_cleanly() {
    // var x = 1; var y: double = x;  -> success, y : double
    assert_clean("fun main() > void { var x = 1; var y: double = x; }");
}

#[test]
fn function_call_with_matching_argument_type_resolves() {
    assert_clean("fun f(int a) > int { return a; } fun main() > void { f(1); }");
}

#[test]
fn function_call_with_mismatched_argument_type_errors() {
    let error = assert_single_error("fun f(int a) > int { return a; } fun main() > void { f(true); }");
    assert!(matches!(error, ResolveError::TypeMismatch(_)), "expected a type mismatch, got {error:?}");
}

#[test]
fn missing_return_statement_is_reported_by_name() {
    let error = assert_single_error("fun g() > int { }");
    match error {
        ResolveError::MissingReturn(missing) => {
            assert_eq!(missing.name, "g");
            assert_eq!(missing.kind, "function");
        }
        other => panic!("expected a missing-return diagnostic, got {other:?}"),
    }
}

#[test]
fn void_function_with_no_return_gets_one_synthesized() {
    // The resolver appends an implicit `return;` rather than erroring.
    assert_clean("fun noop() > void { }");
}

#[test]
fn child_class_field_overwrites_inherited_field() {
    // class A { int x; }  class B : A { int x; }  -> success; one `x` survives.
    assert_clean("class A { int x = 1; } class B : A { int x = 2; }");
}

#[test]
fn matching_private_override_resolves() {
    assert_clean(
        "class A { private fun p() > void { } } \
         class B : A { override private fun p() > void { } }",
    );
}

#[test]
fn override_with_changed_access_is_an_inheritance_violation() {
    let error = assert_single_error(
        "class A { private fun p() > void { } } \
         class B : A { override public fun p() > void { } }",
    );
    assert!(matches!(error, ResolveError::InvalidOverride(_)), "expected an invalid-override diagnostic, got {error:?}");
}

#[test]
fn override_with_changed_signature_is_an_inheritance_violation() {
    let error = assert_single_error(
        "class A { private fun p() > void { } } \
         class B : A { override private fun p(int a) > void { } }",
    );
    assert!(matches!(error, ResolveError::InvalidOverride(_)));
}

#[test]
fn override_without_a_superclass_method_is_an_inheritance_violation() {
    let error = assert_single_error("class A { override private fun p() > void { } }");
    assert!(matches!(error, ResolveError::InvalidOverride(_)));
}

#[test]
fn class_cannot_inherit_itself() {
    let error = assert_single_error("class A : A { }");
    match error {
        ResolveError::SelfInheritance(inheritance) => assert_eq!(inheritance.name, "A"),
        other => panic!("expected a self-inheritance diagnostic, got {other:?}"),
    }
}

#[test]
fn inheriting_an_unknown_class_is_an_error() {
    let error = assert_single_error("class B : NoSuchClass { }");
    assert!(matches!(error, ResolveError::UnknownSuperclass(_)));
}

#[test]
fn field_read_without_this_is_rejected() {
    // class C { int x; fun m() > int { return x; } } -> error.
    let error = assert_single_error("class C { int x = 1; fun m() > int { return x; } }");
    assert!(matches!(error, ResolveError::FieldWithoutThis(_)));
}

#[test]
fn field_read_with_this_resolves_cleanly() {
    // Rewriting the same program to use `this.x` clears the diagnostic.
    assert_clean("class C { int x = 1; fun m() > int { return this.x; } }");
}

#[test]
fn field_initializer_naming_an_earlier_sibling_field_is_allowed() {
    // A bare reference from the class body itself (depth 2) is not the
    // same violation as one from inside a method body (depth > 2).
    assert_clean("class C { int x = 1; int y = x; }");
}

#[test]
fn private_member_is_inaccessible_outside_its_class() {
    let error = assert_single_error(
        "class A { private int secret = 1; fun reveal() > int { return this.secret; } } \
         fun main() > void { var a = A(); a.reveal(); a.secret; }",
    );
    assert!(matches!(error, ResolveError::AccessViolation(_)));
}

#[test]
fn protected_member_is_accessible_from_a_subclass() {
    assert_clean(
        "class A { protected int value = 1; } \
         class B : A { fun read() > int { return this.value; } }",
    );
}

#[test]
fn final_field_without_initializer_is_rejected() {
    let error = assert_single_error("class A { final int x; }");
    assert!(matches!(error, ResolveError::FinalWithoutInitializer(_)));
}

#[test]
fn final_field_cannot_be_reassigned() {
    let error = assert_single_error("class A { final int x = 1; fun reset() > void { this.x = 2; } }");
    assert!(matches!(error, ResolveError::FinalFieldAssignment(_)), "expected a final-field-assignment diagnostic, got {error:?}");
}

#[test]
fn field_with_inferred_type_from_initializer_resolves() {
    assert_clean("class Box { var value = 1; }");
}

#[test]
fn void_typed_variable_is_rejected() {
    let error = assert_single_error("fun f() > void { } fun main() > void { var x = f(); }");
    assert!(matches!(error, ResolveError::VoidTypedVariable(_)));
}

#[test]
fn self_referential_initializer_is_rejected() {
    let error = assert_single_error("fun main() > void { var x = x; }");
    assert!(matches!(error, ResolveError::SelfReferentialInitializer(_)));
}

#[test]
fn redeclaration_in_the_same_scope_is_rejected() {
    let error = assert_single_error("fun main() > void { var x = 1; var x = 2; }");
    assert!(matches!(error, ResolveError::Redeclaration(_)));
}

#[test]
fn redeclaration_in_nested_scope_shadows_without_error() {
    assert_clean("fun main() > void { var x = 1; { var x = 2; } }");
}

#[test]
fn return_outside_any_function_is_illegal_context() {
    // Top-level statements are always functions or classes in this
    // grammar, so this is exercised through a getter body instead, which
    // resolves statements but isn't itself wrapped in the function-context
    // bookkeeping that a `fun`/method body sets up.
    let error = assert_single_error("class C { int x = 1 get { return 2; } }");
    assert!(matches!(error, ResolveError::IllegalContext(_)));
}

#[test]
fn this_outside_a_method_is_illegal_context() {
    let error = assert_single_error("fun main() > void { this; }");
    assert!(matches!(error, ResolveError::IllegalContext(_)));
}

#[test]
fn super_without_a_superclass_is_illegal_context() {
    let error = assert_single_error("class A { fun m() > void { super.m(); } }");
    assert!(matches!(error, ResolveError::IllegalContext(_)));
}

#[test]
fn calling_undeclared_function_is_undefined_name() {
    let error = assert_single_error("fun main() > void { nope(); }");
    assert!(matches!(error, ResolveError::UndefinedName(_)));
}

#[test]
fn too_many_arguments_is_arity_mismatch() {
    let error = assert_single_error("fun f(int a) > void { } fun main() > void { f(1, 2); }");
    assert!(matches!(error, ResolveError::ArityMismatch(_)));
}

#[test]
fn too_few_arguments_is_arity_mismatch() {
    let error = assert_single_error("fun f(int a, int b) > void { } fun main() > void { f(1); }");
    assert!(matches!(error, ResolveError::ArityMismatch(_)));
}

#[test]
fn constructor_call_evaluates_to_an_instance_of_the_class() {
    assert_clean("class Point { int x = 1; } fun main() > void { var p: Point = Point(); }");
}

#[test]
fn any_is_compatible_with_every_declared_type_in_both_directions() {
    assert_clean("fun f(any a) > void { } fun main() > void { f(1); f(true); f(\"s\"); }");
}

#[rstest]
#[case("var x: int = 1.5;")]
#[case("var x: double = true;")]
fn incompatible_initializer_types_are_rejected(#[case] code: &str) {
    let wrapped = format!("fun main() > void {{ {code} }}");
    let report = resolve_source(&wrapped);
    assert!(!report.errors.is_empty(), "expected a diagnostic for `{code}`");
}

#[test]
fn multiple_independent_errors_are_all_collected_in_one_pass() {
    // The resolver doesn't abort on the first diagnostic (§7's propagation
    // policy): a typo in one function shouldn't hide a problem in another.
    let report = resolve_source(
        "fun a() > int { } \
         fun b() > void { nope(); }",
    );
    assert_eq!(report.errors.len(), 2, "expected both functions' problems to be reported: {:#?}", report.errors);
}

#[test]
fn lambda_body_resolves_with_its_own_scope_and_return_checking() {
    assert_clean("fun main() > void { var f: function<int, int> = fun(int x) > int { return x; }; f(1); }");
}

#[test]
fn lambda_missing_return_is_reported() {
    let error = assert_single_error("fun main() > void { var f: function<int> = fun() > int { }; }");
    assert!(matches!(error, ResolveError::MissingReturn(_)));
}

#[test]
fn static_method_called_through_an_instance_receiver_resolves_cleanly() {
    assert_clean(
        "class MathHelper { static public fun square(int n) > int { return n; } } \
         fun main() > void { var m: MathHelper = MathHelper(); m.square(2); }",
    );
}

#[test]
fn static_method_called_through_the_class_name_resolves() {
    assert_clean(
        "class MathHelper { static public fun square(int n) > int { return n; } } \
         fun main() > void { MathHelper.square(2); }",
    );
}

#[test]
fn duplicate_field_in_the_same_class_is_a_redeclaration() {
    // Unlike a child overwriting an inherited field, a field declared twice
    // in the very same class body is a redeclaration, not a silent replace.
    let error = assert_single_error("class A { int x = 1; int x = 2; }");
    assert!(matches!(error, ResolveError::Redeclaration(_)), "expected a redeclaration diagnostic, got {error:?}");
}

#[test]
fn duplicate_method_in_the_same_class_is_a_redeclaration() {
    let error = assert_single_error("class A { fun m() > void { } fun m() > void { } }");
    assert!(matches!(error, ResolveError::Redeclaration(_)), "expected a redeclaration diagnostic, got {error:?}");
}
