//! Statement resolution and function/lambda body resolution.
//!
//! Grounded in `libtimu`'s `tir::resolver::function`/`tir::resolver::statement`
//! split; merged into one file here because Lit's statement grammar is a
//! single flat enum rather than the source's module-qualified variants.

use crate::ast::{
    BodyAst, BodyStatementAst, FunctionDefinitionAst, IfStatementAst, ReturnStatementAst, TopLevelAst, VariableDefinitionAst, WhileStatementAst,
};
use crate::error::ResolveError;
use crate::resolver::types::Type;
use crate::resolver::{FunctionContext, FunctionKind, Resolver};

impl<'base> Resolver<'base> {
    /// Resolves one top-level declaration: a free function or a class.
    ///
    /// Class resolution lives in [`crate::resolver::class`]; this only
    /// handles the function case directly, since a free function's
    /// signature-then-body procedure is exactly the shared
    /// [`Resolver::resolve_function_body`] used for methods and lambdas too.
    pub(crate) fn resolve_top_level(&mut self, statement: &mut TopLevelAst<'base>) {
        match statement {
            TopLevelAst::Function(function) => {
                let (parameters, return_type) = self.function_signature_parts(function);
                let signature = Type::function(parameters.clone(), return_type.clone());
                let name = function.name.text.to_string();
                if let Err(error) = self.scopes.declare_and_define(&name, signature, function.name.clone()) {
                    self.error(error);
                }
                self.resolve_function_body(function, &parameters, return_type, FunctionKind::Function, name);
            }
            TopLevelAst::Class(class) => self.resolve_class(class),
        }
    }

    /// Resolves each parameter's and the return type's `TypeNameAst` against
    /// the type registry, without touching the scope stack — used both to
    /// build a callable's advertised signature (before its body is entered)
    /// and as input to [`Resolver::resolve_function_body`].
    pub(crate) fn function_signature_parts(&mut self, function: &FunctionDefinitionAst<'base>) -> (Vec<Type>, Type) {
        let parameters = function
            .parameters
            .iter()
            .map(|parameter| match self.types.resolve_type(&parameter.type_name) {
                Ok(type_) => type_,
                Err(error) => {
                    self.error(error);
                    Type::Error
                }
            })
            .collect();
        let return_type = match self.types.resolve_type(&function.return_type) {
            Ok(type_) => type_,
            Err(error) => {
                self.error(error);
                Type::Error
            }
        };
        (parameters, return_type)
    }

    /// Resolves a function/method/lambda body: pushes one scope that holds
    /// both parameters and the body's own locals (merging what the source
    /// treats as two nested scopes — the call frame and the body block —
    /// since nothing here observes the difference), defines each parameter,
    /// resolves every statement, then synthesizes or demands a return.
    pub(crate) fn resolve_function_body(
        &mut self,
        function: &mut FunctionDefinitionAst<'base>,
        parameters: &[Type],
        return_type: Type,
        kind: FunctionKind,
        name: String,
    ) {
        self.scopes.push_scope();
        let had_return_outer = self.had_return;
        self.had_return = false;

        for (parameter, type_) in function.parameters.iter().zip(parameters.iter()) {
            self.scopes.define(parameter.name.text, type_.clone(), false, parameter.name.clone());
        }

        let previous_function = self.current_function.replace(FunctionContext {
            name: name.clone(),
            kind,
            return_type: return_type.clone(),
        });

        self.resolve_body_statements(&mut function.body);

        if !self.had_return {
            if return_type == Type::Void {
                function.body.statements.push(BodyStatementAst::Return(ReturnStatementAst {
                    value: None,
                    keyword: function.name.clone(),
                }));
            } else {
                self.error(ResolveError::missing_return(kind.to_string(), name, return_type.to_string(), function.name.clone()));
            }
        }

        self.current_function = previous_function;
        self.had_return = had_return_outer;
        self.scopes.pop_scope();
    }

    /// Resolves every statement in a block, in order, without pushing a
    /// scope of its own — callers that need a fresh scope (an explicit
    /// `{ ... }` block, a function body) push one first.
    pub(crate) fn resolve_body_statements(&mut self, body: &mut BodyAst<'base>) {
        for statement in &mut body.statements {
            self.resolve_statement(statement);
        }
    }

    pub(crate) fn resolve_statement(&mut self, statement: &mut BodyStatementAst<'base>) {
        match statement {
            BodyStatementAst::Block(body) => {
                self.scopes.push_scope();
                self.resolve_body_statements(body);
                self.scopes.pop_scope();
            }
            BodyStatementAst::If(if_statement) => self.resolve_if(if_statement),
            BodyStatementAst::While(while_statement) => self.resolve_while(while_statement),
            BodyStatementAst::Return(return_statement) => self.resolve_return(return_statement),
            BodyStatementAst::VariableDefinition(variable_definition) => self.resolve_variable_definition(variable_definition),
            BodyStatementAst::Expression(expression) => {
                self.resolve_expression(expression);
            }
        }
    }

    fn resolve_if(&mut self, if_statement: &mut IfStatementAst<'base>) {
        self.resolve_expression(&mut if_statement.condition);
        self.resolve_statement(&mut if_statement.then_branch);
        for (condition, branch) in &mut if_statement.else_ifs {
            self.resolve_expression(condition);
            self.resolve_statement(branch);
        }
        if let Some(else_branch) = &mut if_statement.else_branch {
            self.resolve_statement(else_branch);
        }
    }

    fn resolve_while(&mut self, while_statement: &mut WhileStatementAst<'base>) {
        self.resolve_expression(&mut while_statement.condition);
        self.resolve_statement(&mut while_statement.body);
    }

    fn resolve_return(&mut self, return_statement: &mut ReturnStatementAst<'base>) {
        self.had_return = true;
        let value_type = match &mut return_statement.value {
            Some(value) => self.resolve_expression(value),
            None => Type::Void,
        };
        match self.current_function.clone() {
            None => self.error(ResolveError::illegal_context("'return' used outside of a function", return_statement.keyword.clone())),
            Some(context) => {
                if !value_type.is_compatible_with(&context.return_type) {
                    self.error(ResolveError::type_mismatch(
                        context.return_type.to_string(),
                        value_type.to_string(),
                        "return value",
                        return_statement.keyword.clone(),
                    ));
                }
            }
        }
    }

    fn resolve_variable_definition(&mut self, variable_definition: &mut VariableDefinitionAst<'base>) {
        let name = variable_definition.name.text.to_string();
        if let Err(error) = self.scopes.declare(&name, variable_definition.name.clone()) {
            self.error(error);
        }

        let init_type = match &mut variable_definition.init {
            Some(init) => Some(self.resolve_expression(init)),
            None => None,
        };

        let final_type = match (&variable_definition.type_name, init_type) {
            (Some(type_name), Some(init_type)) => {
                let declared_type = match self.types.resolve_type(type_name) {
                    Ok(type_) => type_,
                    Err(error) => {
                        self.error(error);
                        Type::Error
                    }
                };
                if !init_type.is_compatible_with(&declared_type) {
                    self.error(ResolveError::type_mismatch(
                        declared_type.to_string(),
                        init_type.to_string(),
                        format!("initializer of '{name}'"),
                        variable_definition.name.clone(),
                    ));
                }
                declared_type
            }
            (Some(type_name), None) => match self.types.resolve_type(type_name) {
                Ok(type_) => type_,
                Err(error) => {
                    self.error(error);
                    Type::Error
                }
            },
            (None, Some(init_type)) => init_type,
            (None, None) => {
                self.error(ResolveError::illegal_context(
                    format!("'{name}' needs either a declared type or an initializer"),
                    variable_definition.name.clone(),
                ));
                Type::Error
            }
        };

        if final_type == Type::Void {
            self.error(ResolveError::void_typed_variable(variable_definition.name.clone()));
        }

        let is_field = self.scopes.depth() == 2;
        self.scopes.define(&name, final_type, is_field, variable_definition.name.clone());
    }
}
