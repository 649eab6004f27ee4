//! Class resolution: metatype registration, superclass linking,
//! field/method processing, and override validation.
//!
//! Grounded in `libtimu`'s `tir::resolver::class`, simplified to this
//! language's shallow single-level inheritance (no interfaces, no
//! `extend`/`module_use` surface) per SPEC_FULL.md Part A §4.6-4.8.

use crate::ast::{AccessModifier, ClassDefinitionAst, FieldAst, MethodAst};
use crate::error::ResolveError;
use crate::resolver::registry::{ClassDescriptor, Rem, Resource};
use crate::resolver::types::Type;
use crate::resolver::{FunctionKind, Resolver};

impl<'base> Resolver<'base> {
    /// Resolves one class declaration: registers its metatype, links it to
    /// its superclass (if any), seeds the descriptor with inherited members,
    /// then resolves its own fields and methods in declaration order.
    pub(crate) fn resolve_class(&mut self, class: &mut ClassDefinitionAst<'base>) {
        let name = class.name.text.to_string();
        self.types.register_class(&name);

        if let Err(error) = self.scopes.declare_and_define(&name, Type::ClassMeta(name.clone()), class.name.clone()) {
            self.error(error);
        }

        let mut descriptor = ClassDescriptor::new(name.clone());

        if let Some(super_name_ast) = &class.super_name {
            let super_name = super_name_ast.name.text.to_string();
            if super_name == name {
                self.error(ResolveError::self_inheritance(name.clone(), super_name_ast.name.clone()));
            } else if !self.types.is_known_class(&super_name) {
                self.error(ResolveError::unknown_superclass(super_name.clone(), super_name_ast.name.clone()));
            } else if let Some(super_descriptor) = self.classes.get(&super_name).cloned() {
                descriptor.inherit_from(&super_descriptor);
            }
        }

        // Register the (possibly inherited-only) descriptor before resolving
        // members, so a method can refer to sibling members and `super.` calls
        // on just-inherited methods resolve even before this class adds its own.
        self.classes.register(descriptor);

        self.scopes.push_scope();
        let previous_class = self.current_class.replace(name.clone());

        // Tracks names this class itself has declared, distinct from entries
        // the shallow-copy-from-super step seeded: a name inherited from the
        // superclass is fair game to overwrite once, but declaring the same
        // field or method twice in this class's own body is a redeclaration.
        let mut own_fields = std::collections::HashSet::new();
        let mut own_methods = std::collections::HashSet::new();

        for field in &mut class.fields {
            self.resolve_field(&name, field, &mut own_fields);
        }
        for method in &mut class.methods {
            self.resolve_method(&name, method, &mut own_methods);
        }

        self.current_class = previous_class;
        self.scopes.pop_scope();
    }

    fn resolve_field(&mut self, class_name: &str, field: &mut FieldAst<'base>, own_fields: &mut std::collections::HashSet<String>) {
        let field_name = field.name.text.to_string();

        let init_type = field.init.as_mut().map(|init| self.resolve_expression(init));

        let declared_type = match (&field.type_name, &init_type) {
            (Some(type_name), _) => match self.types.resolve_type(type_name) {
                Ok(type_) => type_,
                Err(error) => {
                    self.error(error);
                    Type::Error
                }
            },
            (None, Some(init_type)) => init_type.clone(),
            (None, None) => {
                self.error(ResolveError::illegal_context(format!("field '{field_name}' needs either a declared type or an initializer"), field.name.clone()));
                Type::Error
            }
        };

        if let (Some(_), Some(init_type)) = (&field.type_name, &init_type) {
            if !init_type.is_exactly(&declared_type) {
                self.error(ResolveError::type_mismatch(declared_type.to_string(), init_type.to_string(), format!("initializer of field '{field_name}'"), field.name.clone()));
            }
        }

        if field.is_final && field.init.is_none() {
            self.error(ResolveError::final_without_initializer(field.name.clone()));
        }

        if declared_type == Type::Void {
            self.error(ResolveError::void_typed_variable(field.name.clone()));
        }

        if let Some(getter) = &mut field.getter {
            self.scopes.push_scope();
            self.resolve_body_statements(getter);
            self.scopes.pop_scope();
        }
        if let Some(setter) = &mut field.setter {
            self.scopes.push_scope();
            self.scopes.define("value", declared_type.clone(), false, field.name.clone());
            self.resolve_body_statements(setter);
            self.scopes.pop_scope();
        }

        if let Some(descriptor) = self.classes.get_mut(class_name) {
            let resource = Resource {
                type_: declared_type.clone(),
                access: field.access,
                is_static: field.is_static,
                is_final: field.is_final,
                span: field.name.clone(),
            };
            if own_fields.contains(&field_name) {
                if let Err(error) = descriptor.fields.declare(field_name.clone(), resource) {
                    self.error(error);
                }
            } else {
                descriptor.fields.insert(field_name.clone(), resource);
                own_fields.insert(field_name.clone());
            }
        }

        self.scopes.define(&field_name, declared_type, true, field.name.clone());
    }

    fn resolve_method(&mut self, class_name: &str, method: &mut MethodAst<'base>, own_methods: &mut std::collections::HashSet<String>) {
        let method_name = method.function.name.text.to_string();
        let (parameters, return_type) = self.function_signature_parts(&method.function);
        let signature = Type::function(parameters.clone(), return_type.clone());

        if method.is_overriden {
            self.validate_override(class_name, &method_name, &signature, method.access, &method.function.name);
        }

        if let Some(descriptor) = self.classes.get_mut(class_name) {
            let rem = Rem {
                signature: signature.clone(),
                access: method.access,
                is_static: method.is_static,
                is_overriden: method.is_overriden,
                span: method.function.name.clone(),
            };
            if method.is_static {
                if let Err(error) = descriptor.static_methods.declare(method_name.clone(), rem) {
                    self.error(error);
                }
            } else if own_methods.contains(&method_name) {
                if let Err(error) = descriptor.methods.declare(method_name.clone(), rem) {
                    self.error(error);
                }
            } else {
                descriptor.methods.insert(method_name.clone(), rem);
                own_methods.insert(method_name.clone());
            }
        }

        let kind = if method.is_static { FunctionKind::Function } else { FunctionKind::Method };
        self.resolve_function_body(&mut method.function, &parameters, return_type, kind, format!("{class_name}.{method_name}"));
    }

    /// Validates an `override` method: the class must have a superclass, the
    /// superclass must declare a same-named non-static method, the access
    /// modifier must match exactly, and the signature must match exactly
    /// (no widening, matching the language's strict override contract).
    fn validate_override(&mut self, class_name: &str, method_name: &str, signature: &Type, access: AccessModifier, span: &crate::nom_tools::Span<'base>) {
        let Some(super_name) = self.classes.get(class_name).and_then(|descriptor| descriptor.super_name.clone()) else {
            self.error(ResolveError::invalid_override(format!("'{class_name}' has no superclass to override '{method_name}' from"), span.clone()));
            return;
        };
        let Some(super_method) = self.classes.get(&super_name).and_then(|descriptor| descriptor.methods.get(method_name)) else {
            self.error(ResolveError::invalid_override(format!("superclass '{super_name}' has no method '{method_name}' to override"), span.clone()));
            return;
        };
        if super_method.is_static {
            self.error(ResolveError::invalid_override(format!("'{method_name}' is static in '{super_name}' and can't be overridden"), span.clone()));
            return;
        }
        if super_method.access != access {
            self.error(ResolveError::invalid_override(
                format!("'{method_name}' is {} in '{super_name}' but {access} here", super_method.access),
                span.clone(),
            ));
            return;
        }
        if super_method.signature != *signature {
            self.error(ResolveError::invalid_override(
                format!("'{method_name}' has signature '{}' in '{super_name}' but '{signature}' here", super_method.signature),
                span.clone(),
            ));
        }
    }
}
