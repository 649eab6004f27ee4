//! Semantic analyzer: walks a [`crate::ast::FileAst`], checking names,
//! types, call signatures, and class inheritance, and mutating the AST in
//! place to fill in elided types and synthesize implicit returns.
//!
//! Split into one file per concern, the way `libtimu`'s `tir::resolver`
//! module is split (`class.rs`, `function.rs`, `statement.rs`): [`types`]
//! is the signature codec, [`scope`] the scope stack, [`registry`] the type
//! and class registries, [`statement`] the statement resolver (and function
//! body resolution), [`class`] the class pass, [`expression`] the
//! expression resolver.

pub mod class;
pub mod expression;
pub mod registry;
pub mod scope;
pub mod statement;
pub mod types;

use crate::ast::FileAst;
use crate::error::{ErrorSink, Report, ResolveError};
use crate::resolver::registry::{ClassRegistry, TypeRegistry};
use crate::resolver::scope::{Scope, ScopeStack};
use crate::resolver::types::Type;

/// What kind of callable `current_function` refers to, purely so the
/// "missing return statement" diagnostic can name it correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Function,
    Method,
    Lambda,
}

impl std::fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FunctionKind::Function => "function",
            FunctionKind::Method => "method",
            FunctionKind::Lambda => "lambda",
        })
    }
}

#[derive(Debug, Clone)]
pub struct FunctionContext {
    pub name: String,
    pub kind: FunctionKind,
    pub return_type: Type,
}

/// All the mutable state one resolver pass threads through the traversal —
/// the spec's "Resolver state", minus the `allocated_strings` bookkeeping
/// the source needed for manual memory management (Rust's ownership makes
/// that moot) and minus the `nil` tombstone concept in scope tables.
pub struct Resolver<'base> {
    pub(crate) scopes: ScopeStack<'base>,
    pub(crate) types: TypeRegistry,
    pub(crate) classes: ClassRegistry<'base>,
    pub(crate) errors: ErrorSink,
    pub(crate) current_function: Option<FunctionContext>,
    pub(crate) current_class: Option<String>,
    pub(crate) had_return: bool,
}

impl<'base> Resolver<'base> {
    pub fn new(externals: Scope<'base>) -> Self {
        Self {
            scopes: ScopeStack::new(externals),
            types: TypeRegistry::default(),
            classes: ClassRegistry::default(),
            errors: ErrorSink::new(),
            current_function: None,
            current_class: None,
            had_return: false,
        }
    }

    pub(crate) fn error(&mut self, error: ResolveError) {
        log::debug!("resolver error: {error}");
        self.errors.push(error);
    }

    /// Resolves every top-level statement in `file`, mutating it in place,
    /// then returns every diagnostic collected along the way. The resolver
    /// never aborts on the first error (§7's propagation policy): it keeps
    /// going so a single typo doesn't hide the rest of the program's
    /// problems.
    pub fn resolve_file(mut self, file: &mut FileAst<'base>) -> Result<(), Report> {
        for statement in &mut file.statements {
            self.resolve_top_level(statement);
        }
        self.errors.into_result()
    }
}

/// Parses and resolves `source` in one step, using an empty externals
/// table. Convenience wrapper for the common case — see [`crate::parse`]
/// and [`Resolver::resolve_file`] to use them separately (for example, to
/// register externals before resolving).
pub fn resolve(file: &mut FileAst<'_>) -> Result<(), Report> {
    Resolver::new(Scope::default()).resolve_file(file)
}
