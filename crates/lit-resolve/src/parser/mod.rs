//! Lit language parser implementation using nom combinators.
//!
//! Transforms source text into a [`FileAst`] using the same combinator style
//! as `libtimu`'s parser (`cleanup`-wrapped tokens, `nom_language`'s
//! `VerboseError` for diagnostics, one submodule per grammar area), with the
//! grammar itself grounded in `original_source/vm/src/lit_parser.c`'s
//! recursive-descent structure: the same precedence ladder for expressions,
//! the same `for`-to-`while` desugaring, and the same `>` return-type arrow
//! (chosen there because `>` already means "greater than" in expressions and
//! only appears after a closing `)` in a function header, so the two uses
//! never collide). Class, field, and method syntax has no analog in that
//! grammar (the original language had no object model); it's grounded in
//! this crate's own [`crate::ast`] data model and in `libtimu`'s
//! `parser::class`/`parser::field` modules for surface style instead.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, alphanumeric1};
use nom::combinator::{cut, map, not, peek, recognize};
use nom::error::context;
use nom::multi::{many0, many0_count};
use nom::sequence::{pair, terminated};
use nom::{IResult, Parser};
use nom_language::error::{VerboseError, VerboseErrorKind};

use crate::ast::{FileAst, TopLevelAst};
use crate::nom_tools::{cleanup, NomSpan, Span, State, ToRange};

mod class;
mod expression;
mod function;
mod primitive;
mod statement;
mod type_info;

/// Type alias for parser errors with rich context information, matching
/// `libtimu`'s `TimuParserError` shape exactly (a `nom_language::VerboseError`
/// over our located span type).
pub type LitParserError<'base> = VerboseError<NomSpan<'base>>;

/// Parses a complete Lit source file into a [`FileAst`].
pub fn parse<'base>(state: &'base State) -> IResult<NomSpan<'base>, FileAst<'base>, LitParserError<'base>> {
    let extra = state.clone();
    let input = NomSpan::new_extra(state.file.code().as_str(), extra);

    let (remaining, statements) = many0(alt((
        cleanup(map(function::parse_function_definition, TopLevelAst::Function)),
        cleanup(map(class::parse_class_definition, TopLevelAst::Class)),
    )))
    .parse(input)?;

    if !remaining.fragment().is_empty() {
        return Err(nom::Err::Failure(VerboseError {
            errors: vec![(remaining, VerboseErrorKind::Context("Unknown syntax"))],
        }));
    }

    Ok((remaining, FileAst { statements }))
}

/// Matches a reserved word as a whole token: `tag(word)` not immediately
/// followed by another identifier character, so `final` doesn't accidentally
/// consume the start of `finalize`.
pub(crate) fn keyword<'base>(word: &'static str) -> impl Parser<NomSpan<'base>, Output = NomSpan<'base>, Error = LitParserError<'base>> {
    cleanup(terminated(tag(word), peek(not(alt((alphanumeric1, tag("_")))))))
}

/// Parses a valid Lit identifier: alphabetic or `_` first, then any mix of
/// alphanumerics and `_`. Whitespace around it is cleaned up automatically.
pub(crate) fn ident<'base>() -> impl Parser<NomSpan<'base>, Output = NomSpan<'base>, Error = LitParserError<'base>> {
    cleanup(recognize(pair(alt((alpha1, tag("_"))), many0_count(alt((alphanumeric1, tag("_")))))))
}

pub(crate) fn expected_ident<'base>(message: &'static str, input: NomSpan<'base>) -> IResult<NomSpan<'base>, NomSpan<'base>, LitParserError<'base>> {
    context(message, cut(ident())).parse(input)
}

/// Builds a zero-width span at the parser's current position, carrying fixed
/// text rather than anything sliced out of the source. Used for grammar
/// elements the language lets you omit (a function's `> ReturnType` arrow, a
/// `for` loop's condition clause) but whose resolved AST still needs a span
/// to point a diagnostic at.
pub(crate) fn synthetic_span<'base>(input: &NomSpan<'base>, text: &'static str) -> Span<'base> {
    let offset = input.to_range().start;
    Span {
        text,
        position: offset..offset,
        state: input.extra.clone(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::file::SourceFile;
    use crate::nom_tools::State;

    use super::*;

    #[rstest]
    #[case("fun main() { }")]
    #[case("fun add(int a, int b) > int { return a + b; }")]
    #[case("class Animal { private String name; }")]
    #[case("class Dog : Animal { }")]
    fn parses_without_error(#[case] code: &str) {
        let source_file = SourceFile::new(vec!["<memory>".into()], code.to_string());
        let state = State::new(source_file);
        let result = parse(&state);
        assert!(result.is_ok(), "failed to parse {code:?}: {result:?}");
    }

    #[test]
    fn rejects_trailing_garbage() {
        let source_file = SourceFile::new(vec!["<memory>".into()], "fun main() { } @@@".to_string());
        let state = State::new(source_file);
        assert!(parse(&state).is_err());
    }
}
