//! Scope stack: declare/define/lookup of local bindings.
//!
//! Grounded in `libtimu`'s `tir::scope::Scope`, simplified to match this
//! resolver's single-module, single-pass model — there's no `module_ref` or
//! cross-module fallback here, just a stack of maps plus the externals
//! table the host populates before resolution.

use crate::error::ResolveError;
use crate::map::{DeclMap, Spanned};
use crate::nom_tools::Span;
use crate::resolver::types::Type;

/// A resolved local/global binding.
///
/// The source's `nil` tombstone flag (for deleted hash-table slots) has no
/// counterpart here: [`DeclMap`] backs onto an `IndexMap` and removal is a
/// real removal, not a marked-deleted entry.
#[derive(Debug, Clone)]
pub struct Letal<'base> {
    pub type_: Type,
    /// `false` while the binding's own initializer is being resolved, so a
    /// self-referential initializer (`var x = x;`) is rejected.
    pub defined: bool,
    /// Marks a class-body binding, which requires `this.`-qualified access
    /// from any scope nested below the class-member scope.
    pub field: bool,
    pub span: Span<'base>,
}

impl<'base> Letal<'base> {
    pub fn undefined(span: Span<'base>) -> Self {
        Letal {
            type_: Type::Void,
            defined: false,
            field: false,
            span,
        }
    }

    pub fn defined(type_: Type, field: bool, span: Span<'base>) -> Self {
        Letal {
            type_,
            defined: true,
            field,
            span,
        }
    }
}

impl Spanned for Letal<'_> {
    fn span(&self) -> Span<'_> {
        self.span.clone()
    }
}

/// One lexical level. Scope 0 is global; a class body pushes a scope at
/// depth 2 (global=1, class body=2, matching the source's depth numbering).
#[derive(Debug, Default)]
pub struct Scope<'base> {
    variables: DeclMap<String, Letal<'base>>,
}

/// The resolver's scope stack plus the externals table.
pub struct ScopeStack<'base> {
    scopes: Vec<Scope<'base>>,
    /// Host-registered native function bindings, consulted after every
    /// scope on the stack has been searched.
    externals: Scope<'base>,
}

impl<'base> ScopeStack<'base> {
    /// A fresh stack with just the global scope pushed (depth 1).
    pub fn new(externals: Scope<'base>) -> Self {
        Self {
            scopes: vec![Scope::default()],
            externals,
        }
    }

    /// Lexical depth: global=1, class body=2, and so on.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn innermost_mut(&mut self) -> &mut Scope<'base> {
        self.scopes.last_mut().expect("global scope is never popped")
    }

    /// Inserts an undefined binding in the innermost scope; errors if the
    /// name is already declared there.
    pub fn declare(&mut self, name: &str, span: Span<'base>) -> Result<(), ResolveError> {
        self.innermost_mut().variables.declare(name.to_string(), Letal::undefined(span))
    }

    /// Marks an existing binding defined, or inserts one directly if none
    /// was declared first (used for parameters, which skip the separate
    /// declare step).
    pub fn define(&mut self, name: &str, type_: Type, field: bool, span: Span<'base>) {
        let scope = self.innermost_mut();
        match scope.variables.get_mut(name) {
            Some(existing) => {
                existing.type_ = type_;
                existing.defined = true;
                existing.field = field;
            }
            None => {
                scope.variables.insert(name.to_string(), Letal::defined(type_, field, span));
            }
        }
    }

    /// One-step declare+define, used for function and class names.
    pub fn declare_and_define(&mut self, name: &str, type_: Type, span: Span<'base>) -> Result<(), ResolveError> {
        self.declare(name, span.clone())?;
        self.define(name, type_, false, span);
        Ok(())
    }

    /// Walks scopes innermost-to-outermost, then the externals table.
    /// Errors if the name isn't found, or if it's declared but not yet
    /// defined (a self-referential initializer).
    pub fn resolve_local(&self, name: &str, use_span: Span<'base>) -> Result<&Letal<'base>, ResolveError> {
        for scope in self.scopes.iter().rev() {
            if let Some(letal) = scope.variables.get(name) {
                if !letal.defined {
                    return Err(ResolveError::self_referential_initializer(name, use_span));
                }
                return Ok(letal);
            }
        }
        if let Some(letal) = self.externals.variables.get(name) {
            return Ok(letal);
        }
        Err(ResolveError::undefined_name(name, use_span))
    }
}

impl<'base> Scope<'base> {
    pub fn insert_external(&mut self, name: &str, type_: Type, span: Span<'base>) {
        self.variables.insert(name.to_string(), Letal::defined(type_, false, span));
    }
}
