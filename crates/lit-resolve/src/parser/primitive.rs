//! Primitive literal parsing: integers, doubles, booleans, characters, and
//! double-quoted strings with escape sequences.
//!
//! Grounded in `libtimu`'s `parser::primitive`, trimmed to this language's
//! flatter numeric model — a bare `int`/`double` split rather than the
//! teacher's automatic smallest-fitting-integer-width inference, since
//! [`crate::ast::PrimitiveValueAst`] has no room for that distinction.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, none_of, one_of};
use nom::combinator::{consumed, map, opt, recognize, value};
use nom::multi::{fold, many0, many1};
use nom::sequence::{delimited, preceded, terminated};
use nom::{IResult, Parser};

use crate::ast::PrimitiveValueAst;
use crate::nom_tools::{cleanup, NomSpan};

use super::LitParserError;

fn escaped_char(input: NomSpan<'_>) -> IResult<NomSpan<'_>, char, LitParserError<'_>> {
    let (input, c) = none_of("\"")(input)?;
    if c == '\\' {
        alt((
            value('\n', char('n')),
            value('\r', char('r')),
            value('\t', char('t')),
            value('\\', char('\\')),
            value('"', char('"')),
            value('/', char('/')),
        ))
        .parse(input)
    } else {
        Ok((input, c))
    }
}

fn string_literal<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, PrimitiveValueAst<'base>, LitParserError<'base>> {
    let (input, text) = delimited(char('"'), fold(0.., escaped_char, String::new, |mut s, c| { s.push(c); s }), char('"')).parse(input)?;
    Ok((input, PrimitiveValueAst::String(text.into())))
}

fn char_literal<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, PrimitiveValueAst<'base>, LitParserError<'base>> {
    let (input, c) = delimited(char('\''), alt((preceded(char('\\'), alt((value('\n', char('n')), value('\t', char('t')), value('\\', char('\\')), value('\'', char('\''))))), none_of("'"))), char('\''))
        .parse(input)?;
    Ok((input, PrimitiveValueAst::Char(c)))
}

fn digits(input: NomSpan<'_>) -> IResult<NomSpan<'_>, NomSpan<'_>, LitParserError<'_>> {
    recognize(many1(terminated(one_of("0123456789"), many0(char('_'))))).parse(input)
}

fn number_literal<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, PrimitiveValueAst<'base>, LitParserError<'base>> {
    let (input, (sign, (int_part, fractional))) = (
        opt(one_of("+-")),
        (digits, opt(preceded(char('.'), (digits, opt(preceded(one_of("eE"), (opt(one_of("+-")), digits))))))),
    )
        .parse(input)?;

    let int_text = int_part.fragment().replace('_', "");
    let negative = sign == Some('-');

    match fractional {
        None => {
            let value: i64 = int_text.parse().unwrap_or(0);
            Ok((input, PrimitiveValueAst::Int(if negative { -value } else { value })))
        }
        Some((fraction, exponent)) => {
            let fraction_text = fraction.fragment().replace('_', "");
            let exponent_value: i32 = match exponent {
                Some((exponent_sign, digits)) => {
                    let magnitude: i32 = digits.fragment().replace('_', "").parse().unwrap_or(0);
                    if exponent_sign == Some('-') {
                        -magnitude
                    } else {
                        magnitude
                    }
                }
                None => 0,
            };
            let value = minimal_lexical::parse_float(int_text.as_bytes().iter(), fraction_text.as_bytes().iter(), exponent_value);
            Ok((input, PrimitiveValueAst::Double(if negative { -value } else { value })))
        }
    }
}

fn bool_literal<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, PrimitiveValueAst<'base>, LitParserError<'base>> {
    alt((value(PrimitiveValueAst::Bool(true), tag("true")), value(PrimitiveValueAst::Bool(false), tag("false")))).parse(input)
}

/// Parses any primitive literal, returning both its span and value.
pub(crate) fn parse_primitive<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, (NomSpan<'base>, PrimitiveValueAst<'base>), LitParserError<'base>> {
    consumed(cleanup(map(alt((number_literal, string_literal, char_literal, bool_literal)), |value| value))).parse(input)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::file::SourceFile;
    use crate::nom_tools::State;

    use super::*;

    #[rstest]
    #[case("42", PrimitiveValueAst::Int(42))]
    #[case("-42", PrimitiveValueAst::Int(-42))]
    #[case("1_000", PrimitiveValueAst::Int(1000))]
    fn parses_integers(#[case] code: &str, #[case] expected: PrimitiveValueAst) {
        let state = State::new(SourceFile::new(vec!["<memory>".into()], code.to_string()));
        let input = NomSpan::new_extra(code, state);
        let (_, (_, value)) = parse_primitive(input).unwrap();
        assert_eq!(value, expected);
    }

    #[test]
    fn parses_double() {
        let state = State::new(SourceFile::new(vec!["<memory>".into()], "3.14".to_string()));
        let input = NomSpan::new_extra("3.14", state);
        let (_, (_, value)) = parse_primitive(input).unwrap();
        assert!(matches!(value, PrimitiveValueAst::Double(v) if (v - 3.14).abs() < 1e-9));
    }

    #[rstest]
    #[case(r#""hello""#, "hello")]
    #[case(r#""a\nb""#, "a\nb")]
    fn parses_strings(#[case] code: &str, #[case] expected: &str) {
        let state = State::new(SourceFile::new(vec!["<memory>".into()], code.to_string()));
        let input = NomSpan::new_extra(code, state);
        let (_, (_, value)) = parse_primitive(input).unwrap();
        assert_eq!(value, PrimitiveValueAst::String(expected.into()));
    }
}
