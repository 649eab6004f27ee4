//! Function definition parsing: named top-level functions, class methods, and
//! anonymous lambda expressions all share this grammar.
//!
//! Parameter and return-type syntax is grounded in
//! `original_source/vm/src/lit_parser.c`'s `parse_fun_statement`: parameters
//! read `Type name` (not `libtimu`'s `name: Type`) and the return type follows
//! a `>` arrow rather than a colon, defaulting to `void` when the arrow is
//! omitted. The surrounding parameter-list and body-delimiter plumbing
//! follows `libtimu`'s `parser::function_definition`.

use std::sync::atomic::Ordering;

use nom::character::complete::char;
use nom::combinator::{cut, opt};
use nom::error::context;
use nom::multi::separated_list0;
use nom::{IResult, Parser};

use crate::ast::{AstIndex, FunctionDefinitionAst, ParameterAst, TypeNameAst};
use crate::nom_tools::{cleanup, NomSpan};
use crate::parser::statement::parse_body;
use crate::parser::{expected_ident, keyword, synthetic_span, LitParserError};

impl<'base> FunctionDefinitionAst<'base> {
    /// Parses a named function: `fun name(Type name, ...) > ReturnType { ... }`.
    /// Used both for top-level functions and for class methods, which differ
    /// only in what the caller does with the result afterward.
    pub(crate) fn parse(input: NomSpan<'base>) -> IResult<NomSpan<'base>, FunctionDefinitionAst<'base>, LitParserError<'base>> {
        let (input, _) = keyword("fun").parse(input)?;
        let (input, name) = expected_ident("Expected a function name", input)?;
        let (input, parameters) = parse_parameters(input)?;
        let (input, return_type) = parse_return_type(input)?;
        let (input, body) = parse_body(input)?;
        let index = AstIndex(input.extra.indexer.fetch_add(1, Ordering::Relaxed));

        Ok((
            input,
            FunctionDefinitionAst {
                name: name.into(),
                parameters,
                return_type,
                body,
                index,
            },
        ))
    }

    /// Parses an anonymous lambda: `fun(Type name, ...) > ReturnType { ... }`.
    /// Lambdas have no identifier of their own, so `name` borrows the `fun`
    /// keyword's span instead — enough for the resolver to blame a missing
    /// return on, but never shown to the user as a name.
    pub(crate) fn parse_lambda(input: NomSpan<'base>) -> IResult<NomSpan<'base>, FunctionDefinitionAst<'base>, LitParserError<'base>> {
        let (input, keyword_span) = keyword("fun").parse(input)?;
        let (input, parameters) = parse_parameters(input)?;
        let (input, return_type) = parse_return_type(input)?;
        let (input, body) = parse_body(input)?;
        let index = AstIndex(input.extra.indexer.fetch_add(1, Ordering::Relaxed));

        Ok((
            input,
            FunctionDefinitionAst {
                name: keyword_span.into(),
                parameters,
                return_type,
                body,
                index,
            },
        ))
    }
}

fn parse_parameters<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, Vec<ParameterAst<'base>>, LitParserError<'base>> {
    let (input, _) = context("Expected '(' after function name", cut(cleanup(char('(')))).parse(input)?;
    let (input, parameters) = separated_list0(cleanup(char(',')), ParameterAst::parse).parse(input)?;
    let (input, _) = context("Expected ')' after parameter list", cut(cleanup(char(')')))).parse(input)?;
    Ok((input, parameters))
}

/// The return type arrow is optional; an omitted arrow means `void`, matching
/// `parse_fun_statement`'s `emit_op_long` default when no `>` is seen.
fn parse_return_type<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, TypeNameAst<'base>, LitParserError<'base>> {
    let (input, arrow) = opt(cleanup(char('>'))).parse(input)?;
    match arrow {
        Some(_) => context("Expected a return type after '>'", cut(TypeNameAst::parse)).parse(input),
        None => Ok((input.clone(), TypeNameAst { name: synthetic_span(&input, "void") })),
    }
}

impl<'base> ParameterAst<'base> {
    fn parse(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ParameterAst<'base>, LitParserError<'base>> {
        let (input, type_name) = TypeNameAst::parse(input)?;
        let (input, name) = expected_ident("Expected a parameter name", input)?;
        Ok((input, ParameterAst { type_name, name: name.into() }))
    }
}

/// Wrapper matching the `parser::<module>::parse_<node>` naming `parser::mod`
/// dispatches on for every top-level alternative.
pub(crate) fn parse_function_definition(input: NomSpan<'_>) -> IResult<NomSpan<'_>, FunctionDefinitionAst<'_>, LitParserError<'_>> {
    FunctionDefinitionAst::parse(input)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::file::SourceFile;
    use crate::nom_tools::State;

    use super::*;

    #[rstest]
    #[case("fun main() { }", 0, "void")]
    #[case("fun add(int a, int b) > int { return a + b; }", 2, "int")]
    #[case("fun greet(String name) { }", 1, "void")]
    fn parses_function_headers(#[case] code: &str, #[case] parameter_count: usize, #[case] return_type: &str) {
        let state = State::new(SourceFile::new(vec!["<memory>".into()], code.to_string()));
        let input = NomSpan::new_extra(code, state);
        let (_, function) = FunctionDefinitionAst::parse(input).unwrap();
        assert_eq!(function.parameters.len(), parameter_count);
        assert_eq!(function.return_type.name.text, return_type);
    }

    #[test]
    fn parses_lambda_without_name() {
        let code = "fun(int x) > int { return x; }";
        let state = State::new(SourceFile::new(vec!["<memory>".into()], code.to_string()));
        let input = NomSpan::new_extra(code, state);
        let (_, function) = FunctionDefinitionAst::parse_lambda(input).unwrap();
        assert_eq!(function.name.text, "fun");
        assert_eq!(function.parameters.len(), 1);
    }
}
