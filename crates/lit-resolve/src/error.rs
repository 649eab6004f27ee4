//! Diagnostics for the Lit parser and resolver.
//!
//! Every error kind from the resolver's error-handling design is its own
//! small `thiserror`/`miette::Diagnostic` struct, so each carries exactly
//! the labels and help text relevant to it. [`ResolveError`] is the sum of
//! all of them plus a syntax-error variant for parse failures, and
//! [`ErrorSink`] is where a resolver run accumulates every diagnostic it
//! raises without aborting the traversal — mirroring the `had_error` flag
//! from the source resolver, but keeping the diagnostics themselves instead
//! of just a boolean.

use std::ops::Range;

use miette::Diagnostic;
use thiserror::Error;

use crate::file::SourceFile;
use crate::nom_tools::{SpanInfo, ToRange};

/// Error type produced by the nom-based parser.
pub type ParseError<'base> = crate::parser::LitParserError<'base>;

/// A name (variable, type, class, or member) that was used but never declared.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("'{name}' is not defined")]
#[diagnostic(code(lit::undefined_name))]
pub struct UndefinedName {
    pub name: String,
    #[label("used here")]
    pub position: Range<usize>,
    #[source_code]
    pub code: miette::NamedSource<String>,
}

/// A name declared twice in the same scope.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("'{name}' is already declared in this scope")]
#[diagnostic(code(lit::redeclaration))]
pub struct Redeclaration {
    pub name: String,
    #[label("first declared here")]
    pub old_position: Range<usize>,
    #[label("redeclared here")]
    pub new_position: Range<usize>,
    #[source_code]
    pub code: miette::NamedSource<String>,
}

/// Two types that were required to be compatible were not.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("expected type '{expected}', found '{found}' ({context})")]
#[diagnostic(code(lit::type_mismatch))]
pub struct TypeMismatch {
    pub expected: String,
    pub found: String,
    /// Human-readable description of what was being checked, e.g.
    /// "assignment", "return value", "argument 2 of f", "binary operand".
    pub context: String,
    #[label("has type '{found}'")]
    pub position: Range<usize>,
    #[source_code]
    pub code: miette::NamedSource<String>,
}

/// A call site passed too few or too many arguments.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(lit::arity_mismatch))]
pub struct ArityMismatch {
    pub message: String,
    #[label("in this call")]
    pub position: Range<usize>,
    #[source_code]
    pub code: miette::NamedSource<String>,
}

/// `return`, `this`, or `super` used where the surrounding context forbids it.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(lit::illegal_context))]
pub struct IllegalContext {
    pub message: String,
    #[label("here")]
    pub position: Range<usize>,
    #[source_code]
    pub code: miette::NamedSource<String>,
}

/// A private or protected member accessed from outside its permitted scope.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("'{member}' is {access} and cannot be accessed here")]
#[diagnostic(code(lit::access_violation))]
pub struct AccessViolation {
    pub member: String,
    pub access: String,
    #[label("access not permitted here")]
    pub position: Range<usize>,
    #[source_code]
    pub code: miette::NamedSource<String>,
}

/// A class declared itself as its own superclass.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("Class Class<{name}> can't inherit self")]
#[diagnostic(code(lit::self_inheritance))]
pub struct SelfInheritance {
    pub name: String,
    #[label("inherits itself here")]
    pub position: Range<usize>,
    #[source_code]
    pub code: miette::NamedSource<String>,
}

/// A superclass name that isn't a known class.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("Can't inherit undefined class {name}")]
#[diagnostic(code(lit::unknown_superclass))]
pub struct UnknownSuperclass {
    pub name: String,
    #[label("unknown superclass")]
    pub position: Range<usize>,
    #[source_code]
    pub code: miette::NamedSource<String>,
}

/// An `override` method that doesn't validly replace an inherited one.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(lit::invalid_override))]
pub struct InvalidOverride {
    pub message: String,
    #[label("in this method")]
    pub position: Range<usize>,
    #[source_code]
    pub code: miette::NamedSource<String>,
}

/// A variable read inside its own initializer expression.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("'{name}' can't be used in its own initializer")]
#[diagnostic(code(lit::self_referential_initializer))]
pub struct SelfReferentialInitializer {
    pub name: String,
    #[label("used here before it is defined")]
    pub position: Range<usize>,
    #[source_code]
    pub code: miette::NamedSource<String>,
}

/// A `final` field with no initializer.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("Final field must have a value")]
#[diagnostic(code(lit::final_without_initializer))]
pub struct FinalWithoutInitializer {
    #[label("declared final here")]
    pub position: Range<usize>,
    #[source_code]
    pub code: miette::NamedSource<String>,
}

/// A variable declared with type `void`.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("A variable cannot have type 'void'")]
#[diagnostic(code(lit::void_typed_variable))]
pub struct VoidTypedVariable {
    #[label("declared void here")]
    pub position: Range<usize>,
    #[source_code]
    pub code: miette::NamedSource<String>,
}

/// A class field read without a `this.` qualifier from inside the class body.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("Can't access class field '{name}' without this")]
#[diagnostic(code(lit::field_without_this), help("write 'this.{name}' instead"))]
pub struct FieldWithoutThis {
    pub name: String,
    #[label("used without this")]
    pub position: Range<usize>,
    #[source_code]
    pub code: miette::NamedSource<String>,
}

/// An assignment to a field declared `final`.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("Field '{name}' is final, can't assign a value to it")]
#[diagnostic(code(lit::final_field_assignment))]
pub struct FinalFieldAssignment {
    pub name: String,
    #[label("assigned here")]
    pub position: Range<usize>,
    #[source_code]
    pub code: miette::NamedSource<String>,
}

/// A function, method, or lambda whose declared return type is not `void`
/// falls off the end of its body without returning a value on every path.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("Missing return statement in {kind} '{name}'")]
#[diagnostic(code(lit::missing_return))]
pub struct MissingReturn {
    pub kind: String,
    pub name: String,
    #[label("body ends here without returning '{expected}'")]
    pub position: Range<usize>,
    pub expected: String,
    #[source_code]
    pub code: miette::NamedSource<String>,
}

/// One parser-reported syntax problem.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(lit::syntax_error))]
pub struct SyntaxErrorItem {
    pub message: &'static str,
    #[label("{message}")]
    pub position: Range<usize>,
    #[source_code]
    pub code: miette::NamedSource<String>,
}

/// All syntax errors collected from one failed parse.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("{} syntax error(s) detected", .errors.len())]
pub struct SyntaxError {
    #[related]
    pub errors: Vec<SyntaxErrorItem>,
}

/// Every diagnostic the resolver or parser can raise.
#[derive(Clone, Debug, Error, Diagnostic)]
pub enum ResolveError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    UndefinedName(Box<UndefinedName>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Redeclaration(Box<Redeclaration>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    TypeMismatch(Box<TypeMismatch>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    ArityMismatch(Box<ArityMismatch>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    IllegalContext(Box<IllegalContext>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    AccessViolation(Box<AccessViolation>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    SelfInheritance(Box<SelfInheritance>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    UnknownSuperclass(Box<UnknownSuperclass>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidOverride(Box<InvalidOverride>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    SelfReferentialInitializer(Box<SelfReferentialInitializer>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    FinalWithoutInitializer(Box<FinalWithoutInitializer>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    VoidTypedVariable(Box<VoidTypedVariable>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    FieldWithoutThis(Box<FieldWithoutThis>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    FinalFieldAssignment(Box<FinalFieldAssignment>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    MissingReturn(Box<MissingReturn>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] Box<SyntaxError>),
}

impl ResolveError {
    pub fn undefined_name(name: impl Into<String>, span: impl Into<SpanInfo>) -> Self {
        let span = span.into();
        ResolveError::UndefinedName(Box::new(UndefinedName {
            name: name.into(),
            position: span.position,
            code: span.file.into(),
        }))
    }

    pub fn redeclaration(name: impl Into<String>, old: impl Into<SpanInfo>, new: impl Into<SpanInfo>) -> Self {
        let old = old.into();
        let new = new.into();
        ResolveError::Redeclaration(Box::new(Redeclaration {
            name: name.into(),
            old_position: old.position,
            new_position: new.position,
            code: new.file.into(),
        }))
    }

    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>, context: impl Into<String>, span: impl Into<SpanInfo>) -> Self {
        let span = span.into();
        ResolveError::TypeMismatch(Box::new(TypeMismatch {
            expected: expected.into(),
            found: found.into(),
            context: context.into(),
            position: span.position,
            code: span.file.into(),
        }))
    }

    pub fn arity_mismatch(message: impl Into<String>, span: impl Into<SpanInfo>) -> Self {
        let span = span.into();
        ResolveError::ArityMismatch(Box::new(ArityMismatch {
            message: message.into(),
            position: span.position,
            code: span.file.into(),
        }))
    }

    pub fn illegal_context(message: impl Into<String>, span: impl Into<SpanInfo>) -> Self {
        let span = span.into();
        ResolveError::IllegalContext(Box::new(IllegalContext {
            message: message.into(),
            position: span.position,
            code: span.file.into(),
        }))
    }

    pub fn access_violation(member: impl Into<String>, access: impl Into<String>, span: impl Into<SpanInfo>) -> Self {
        let span = span.into();
        ResolveError::AccessViolation(Box::new(AccessViolation {
            member: member.into(),
            access: access.into(),
            position: span.position,
            code: span.file.into(),
        }))
    }

    pub fn self_inheritance(name: impl Into<String>, span: impl Into<SpanInfo>) -> Self {
        let span = span.into();
        ResolveError::SelfInheritance(Box::new(SelfInheritance {
            name: name.into(),
            position: span.position,
            code: span.file.into(),
        }))
    }

    pub fn unknown_superclass(name: impl Into<String>, span: impl Into<SpanInfo>) -> Self {
        let span = span.into();
        ResolveError::UnknownSuperclass(Box::new(UnknownSuperclass {
            name: name.into(),
            position: span.position,
            code: span.file.into(),
        }))
    }

    pub fn invalid_override(message: impl Into<String>, span: impl Into<SpanInfo>) -> Self {
        let span = span.into();
        ResolveError::InvalidOverride(Box::new(InvalidOverride {
            message: message.into(),
            position: span.position,
            code: span.file.into(),
        }))
    }

    pub fn self_referential_initializer(name: impl Into<String>, span: impl Into<SpanInfo>) -> Self {
        let span = span.into();
        ResolveError::SelfReferentialInitializer(Box::new(SelfReferentialInitializer {
            name: name.into(),
            position: span.position,
            code: span.file.into(),
        }))
    }

    pub fn final_without_initializer(span: impl Into<SpanInfo>) -> Self {
        let span = span.into();
        ResolveError::FinalWithoutInitializer(Box::new(FinalWithoutInitializer {
            position: span.position,
            code: span.file.into(),
        }))
    }

    pub fn void_typed_variable(span: impl Into<SpanInfo>) -> Self {
        let span = span.into();
        ResolveError::VoidTypedVariable(Box::new(VoidTypedVariable {
            position: span.position,
            code: span.file.into(),
        }))
    }

    pub fn field_without_this(name: impl Into<String>, span: impl Into<SpanInfo>) -> Self {
        let span = span.into();
        ResolveError::FieldWithoutThis(Box::new(FieldWithoutThis {
            name: name.into(),
            position: span.position,
            code: span.file.into(),
        }))
    }

    pub fn final_field_assignment(name: impl Into<String>, span: impl Into<SpanInfo>) -> Self {
        let span = span.into();
        ResolveError::FinalFieldAssignment(Box::new(FinalFieldAssignment {
            name: name.into(),
            position: span.position,
            code: span.file.into(),
        }))
    }

    pub fn missing_return(kind: impl Into<String>, name: impl Into<String>, expected: impl Into<String>, span: impl Into<SpanInfo>) -> Self {
        let span = span.into();
        ResolveError::MissingReturn(Box::new(MissingReturn {
            kind: kind.into(),
            name: name.into(),
            expected: expected.into(),
            position: span.position,
            code: span.file.into(),
        }))
    }
}

/// Accumulates every diagnostic raised during one resolver pass.
///
/// Mirrors the source resolver's `had_error` flag, but keeps the
/// diagnostics themselves instead of a bare boolean: the resolver never
/// aborts early (per the error-handling design's propagation policy), it
/// just keeps pushing here and returns the sentinel `error` type so later
/// checks don't cascade.
#[derive(Debug, Default)]
pub struct ErrorSink {
    errors: Vec<ResolveError>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ResolveError) {
        self.errors.push(error);
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ResolveError] {
        &self.errors
    }

    /// Converts the accumulated diagnostics into a `Result`: `Ok(())` if
    /// nothing was recorded, otherwise every diagnostic wrapped as a
    /// [`SyntaxError`]-shaped collection via [`ResolveError::Syntax`]-like
    /// aggregation.
    pub fn into_result(self) -> Result<(), Report> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Report { errors: self.errors })
        }
    }
}

/// A finished resolver run's collected diagnostics.
#[derive(Clone, Debug, Error, Diagnostic)]
#[error("{} error(s) detected", .errors.len())]
pub struct Report {
    #[related]
    pub errors: Vec<ResolveError>,
}

/// Converts a failed parse into a [`Report`] with one [`SyntaxErrorItem`]
/// per nom context frame, using the source file carried by the failing span.
pub fn parse_error_to_report(error: ParseError<'_>) -> Report {
    let mut items = Vec::new();
    for (span, kind) in error.errors {
        if let nom_language::error::VerboseErrorKind::Context(message) = kind {
            items.push(SyntaxErrorItem {
                message,
                position: span.to_range(),
                code: (&span.extra.file).into(),
            });
        }
    }
    Report {
        errors: vec![ResolveError::Syntax(Box::new(SyntaxError { errors: items }))],
    }
}
