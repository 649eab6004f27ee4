//! Type registry and class registry.
//!
//! Grounded in `libtimu`'s `tir::mod::build_primitive_types` (type seeding)
//! and `tir::resolver::class::ClassDefinition` (the shallow-copy-from-super
//! shape), simplified: types here are the tagged [`Type`] enum rather than
//! parsed signature strings, so "resolve_type truncated at the first `<`"
//! (needed only to cope with textual `function<...>` signatures) has no
//! counterpart — a `TypeNameAst` is always a bare name in this grammar.

use crate::ast::{AccessModifier, TypeNameAst};
use crate::error::ResolveError;
use crate::map::{DeclMap, Spanned};
use crate::nom_tools::Span;
use crate::resolver::types::Type;

/// Tracks which class names have been declared, so type references to them
/// resolve instead of erroring as undefined.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    classes: std::collections::HashSet<String>,
}

impl TypeRegistry {
    pub fn register_class(&mut self, name: &str) {
        self.classes.insert(name.to_string());
    }

    pub fn is_known_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    /// Resolves a written type reference against the primitive set plus
    /// whatever classes have been declared so far.
    pub fn resolve_type<'base>(&self, type_name: &TypeNameAst<'base>) -> Result<Type, ResolveError> {
        let text = type_name.name.text;
        Ok(match text {
            "int" => Type::Int,
            "double" => Type::Double,
            "bool" => Type::Bool,
            "char" => Type::Char,
            "String" => Type::String,
            "void" => Type::Void,
            "any" => Type::Any,
            "error" => Type::Error,
            other if self.classes.contains(other) => Type::ClassInstance(other.to_string()),
            other => return Err(ResolveError::undefined_name(other, type_name.name.clone())),
        })
    }
}

/// Field metadata attached to a class.
#[derive(Debug, Clone)]
pub struct Resource<'base> {
    pub type_: Type,
    pub access: AccessModifier,
    pub is_static: bool,
    pub is_final: bool,
    pub span: Span<'base>,
}

impl Spanned for Resource<'_> {
    fn span(&self) -> Span<'_> {
        self.span.clone()
    }
}

/// Method metadata attached to a class.
#[derive(Debug, Clone)]
pub struct Rem<'base> {
    pub signature: Type,
    pub access: AccessModifier,
    pub is_static: bool,
    pub is_overriden: bool,
    pub span: Span<'base>,
}

impl Spanned for Rem<'_> {
    fn span(&self) -> Span<'_> {
        self.span.clone()
    }
}

/// `{ name, super?, fields, methods, static_methods }`.
///
/// On creation, `fields`/`methods` are shallow-copied from the superclass
/// (see [`ClassDescriptor::inherit_from`]); `static_methods` is never
/// inherited.
#[derive(Debug, Clone)]
pub struct ClassDescriptor<'base> {
    pub name: String,
    pub super_name: Option<String>,
    pub fields: DeclMap<String, Resource<'base>>,
    pub methods: DeclMap<String, Rem<'base>>,
    pub static_methods: DeclMap<String, Rem<'base>>,
}

impl<'base> ClassDescriptor<'base> {
    pub fn new(name: String) -> Self {
        Self {
            name,
            super_name: None,
            fields: DeclMap::new(),
            methods: DeclMap::new(),
            static_methods: DeclMap::new(),
        }
    }

    /// Seeds `fields`/`methods` as a shallow copy of `super_class`'s tables.
    /// Later redefinitions in this class simply overwrite these entries —
    /// there's no further link back to the superclass after this point.
    pub fn inherit_from(&mut self, super_class: &ClassDescriptor<'base>) {
        self.super_name = Some(super_class.name.clone());
        for (name, resource) in super_class.fields.iter() {
            self.fields.insert(name.clone(), resource.clone());
        }
        for (name, rem) in super_class.methods.iter() {
            self.methods.insert(name.clone(), rem.clone());
        }
    }
}

#[derive(Debug, Default)]
pub struct ClassRegistry<'base> {
    classes: DeclMap<String, ClassDescriptor<'base>>,
}

impl<'base> ClassRegistry<'base> {
    pub fn register(&mut self, descriptor: ClassDescriptor<'base>) {
        self.classes.insert(descriptor.name.clone(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&ClassDescriptor<'base>> {
        self.classes.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ClassDescriptor<'base>> {
        self.classes.get_mut(name)
    }
}
