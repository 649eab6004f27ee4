//! Abstract syntax tree for Lit source files.
//!
//! The AST is produced by [`crate::parser`] and consumed (and partially
//! mutated — field types get filled in, implicit returns get appended) by
//! [`crate::resolver`]. Every node borrows its identifier text from the
//! source via [`Span`], following the same lifetime-parameterized shape as
//! the rest of the parsing/resolving pipeline.

use std::borrow::Cow;

use crate::nom_tools::Span;

/// Unique identifier handed out to AST nodes as they're parsed, for
/// debugging and for keying diagnostics that need to refer back to a node.
#[derive(PartialEq, Debug, Copy, Clone, Eq, PartialOrd, Ord, Hash)]
pub struct AstIndex(pub usize);

/// A complete parsed source file: a flat list of top-level declarations.
/// Lit has no module system, so this is also the whole compilation unit.
#[derive(Debug, Clone)]
pub struct FileAst<'base> {
    pub statements: Vec<TopLevelAst<'base>>,
}

#[derive(Debug, Clone)]
pub enum TopLevelAst<'base> {
    Function(FunctionDefinitionAst<'base>),
    Class(ClassDefinitionAst<'base>),
}

/// `public`, `protected`, or `private` — defaults to `public` when omitted,
/// matching the original language's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessModifier {
    Public,
    Protected,
    Private,
}

impl Default for AccessModifier {
    fn default() -> Self {
        AccessModifier::Public
    }
}

impl std::fmt::Display for AccessModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AccessModifier::Public => "public",
            AccessModifier::Protected => "protected",
            AccessModifier::Private => "private",
        })
    }
}

/// A type reference as written in source: a bare name (`int`, `MyClass`),
/// not yet resolved against the type registry.
#[derive(Debug, Clone)]
pub struct TypeNameAst<'base> {
    pub name: Span<'base>,
}

impl std::fmt::Display for TypeNameAst<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name.text)
    }
}

#[derive(Debug, Clone)]
pub struct ParameterAst<'base> {
    pub type_name: TypeNameAst<'base>,
    pub name: Span<'base>,
}

/// A standalone function or a method body (the resolver distinguishes the
/// two by how the node is reached, not by its shape).
#[derive(Debug, Clone)]
pub struct FunctionDefinitionAst<'base> {
    pub name: Span<'base>,
    pub parameters: Vec<ParameterAst<'base>>,
    pub return_type: TypeNameAst<'base>,
    pub body: BodyAst<'base>,
    pub index: AstIndex,
}

#[derive(Debug, Clone)]
pub struct ClassDefinitionAst<'base> {
    pub name: Span<'base>,
    pub super_name: Option<TypeNameAst<'base>>,
    pub fields: Vec<FieldAst<'base>>,
    pub methods: Vec<MethodAst<'base>>,
    pub index: AstIndex,
}

#[derive(Debug, Clone)]
pub struct FieldAst<'base> {
    pub access: AccessModifier,
    pub is_static: bool,
    pub is_final: bool,
    /// Absent when the field's type is inferred entirely from `init`.
    pub type_name: Option<TypeNameAst<'base>>,
    pub name: Span<'base>,
    pub init: Option<ExpressionAst<'base>>,
    pub getter: Option<BodyAst<'base>>,
    pub setter: Option<BodyAst<'base>>,
    pub index: AstIndex,
}

#[derive(Debug, Clone)]
pub struct MethodAst<'base> {
    pub access: AccessModifier,
    pub is_static: bool,
    pub is_overriden: bool,
    pub function: FunctionDefinitionAst<'base>,
}

/// A block of statements. `statements` is empty rather than absent for a
/// body with no content — the resolver treats an empty block as a no-op and
/// appends synthesized returns directly into this vector.
#[derive(Debug, Clone, Default)]
pub struct BodyAst<'base> {
    pub statements: Vec<BodyStatementAst<'base>>,
}

#[derive(Debug, Clone)]
pub enum BodyStatementAst<'base> {
    Block(BodyAst<'base>),
    If(IfStatementAst<'base>),
    While(WhileStatementAst<'base>),
    Return(ReturnStatementAst<'base>),
    VariableDefinition(VariableDefinitionAst<'base>),
    Expression(ExpressionAst<'base>),
}

#[derive(Debug, Clone)]
pub struct IfStatementAst<'base> {
    pub condition: ExpressionAst<'base>,
    pub then_branch: Box<BodyStatementAst<'base>>,
    pub else_ifs: Vec<(ExpressionAst<'base>, BodyStatementAst<'base>)>,
    pub else_branch: Option<Box<BodyStatementAst<'base>>>,
}

#[derive(Debug, Clone)]
pub struct WhileStatementAst<'base> {
    pub condition: ExpressionAst<'base>,
    pub body: Box<BodyStatementAst<'base>>,
}

/// `return;` has `value: None`; its span is the `return` keyword itself
/// (or, for synthesized returns, the enclosing function name) so diagnostics
/// about a missing-vs-synthesized return have somewhere to point.
#[derive(Debug, Clone)]
pub struct ReturnStatementAst<'base> {
    pub value: Option<ExpressionAst<'base>>,
    pub keyword: Span<'base>,
}

#[derive(Debug, Clone)]
pub struct VariableDefinitionAst<'base> {
    pub name: Span<'base>,
    pub type_name: Option<TypeNameAst<'base>>,
    pub init: Option<ExpressionAst<'base>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Equal,
    NotEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValueAst<'base> {
    Int(i64),
    Double(f64),
    Bool(bool),
    Char(char),
    String(Cow<'base, str>),
}

#[derive(Debug, Clone)]
pub enum ExpressionAst<'base> {
    Literal(PrimitiveValueAst<'base>, Span<'base>),
    Unary(UnaryOperator, Box<ExpressionAst<'base>>, Span<'base>),
    Binary(Box<ExpressionAst<'base>>, BinaryOperator, Box<ExpressionAst<'base>>, Span<'base>),
    Grouping(Box<ExpressionAst<'base>>),
    Logical(Box<ExpressionAst<'base>>, LogicalOperator, Box<ExpressionAst<'base>>, Span<'base>),
    Var(Span<'base>),
    Assign(Box<ExpressionAst<'base>>, Box<ExpressionAst<'base>>, Span<'base>),
    Lambda(Box<FunctionDefinitionAst<'base>>, Span<'base>),
    This(Span<'base>),
    Super(Span<'base>, Span<'base>),
    Get(Box<ExpressionAst<'base>>, Span<'base>),
    Set(Box<ExpressionAst<'base>>, Span<'base>, Box<ExpressionAst<'base>>),
    Call(Box<ExpressionAst<'base>>, Vec<ExpressionAst<'base>>, Span<'base>),
}

impl<'base> ExpressionAst<'base> {
    /// The span to blame in a diagnostic about this expression as a whole.
    pub fn span(&self) -> &Span<'base> {
        match self {
            ExpressionAst::Literal(_, span) => span,
            ExpressionAst::Unary(_, _, span) => span,
            ExpressionAst::Binary(_, _, _, span) => span,
            ExpressionAst::Grouping(inner) => inner.span(),
            ExpressionAst::Logical(_, _, _, span) => span,
            ExpressionAst::Var(span) => span,
            ExpressionAst::Assign(_, _, span) => span,
            ExpressionAst::Lambda(_, span) => span,
            ExpressionAst::This(span) => span,
            ExpressionAst::Super(_, span) => span,
            ExpressionAst::Get(_, span) => span,
            ExpressionAst::Set(_, span, _) => span,
            ExpressionAst::Call(_, _, span) => span,
        }
    }
}
