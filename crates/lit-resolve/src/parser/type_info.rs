//! Type name parsing.
//!
//! Simplified from `libtimu`'s `parser::type_info` (no `ref`/`?`/qualified
//! dotted-path modifiers — this language's types are always a bare name,
//! resolved against the primitive set and the class registry in
//! [`crate::resolver::registry::TypeRegistry`]).

use nom::{IResult, Parser};

use crate::ast::TypeNameAst;
use crate::nom_tools::NomSpan;
use crate::parser::{ident, LitParserError};

impl<'base> TypeNameAst<'base> {
    pub(crate) fn parse(input: NomSpan<'base>) -> IResult<NomSpan<'base>, TypeNameAst<'base>, LitParserError<'base>> {
        let (input, name) = ident().parse(input)?;
        Ok((input, TypeNameAst { name: name.into() }))
    }
}
