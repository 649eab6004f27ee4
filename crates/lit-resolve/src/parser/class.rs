//! Class, field, and method parsing.
//!
//! Unlike the expression/statement grammar, none of this has an analog in
//! `original_source/vm/src/lit_parser.c` — the original language has no
//! object model. It's grounded instead in this crate's own [`crate::ast`]
//! data model (which already separates a class's `fields` from its
//! `methods`, so members are sorted into the right list as they're parsed
//! rather than kept in one interleaved sequence) and in `libtimu`'s
//! `parser::class`/`parser::field` modules for the surrounding combinator
//! style (modifier-then-body parsing, a shared `parse_field`-and-dispatch
//! helper reused across contexts).

use std::sync::atomic::Ordering;

use nom::branch::alt;
use nom::character::complete::char;
use nom::combinator::{cut, map, opt, value};
use nom::error::context;
use nom::multi::many0;
use nom::sequence::preceded;
use nom::{IResult, Parser};

use crate::ast::{AccessModifier, AstIndex, ClassDefinitionAst, FieldAst, MethodAst, TypeNameAst};
use crate::nom_tools::{cleanup, NomSpan};
use crate::parser::expression::parse_expression;
use crate::parser::function::parse_function_definition;
use crate::parser::statement::parse_body;
use crate::parser::{expected_ident, keyword, LitParserError};

enum MemberAst<'base> {
    Field(FieldAst<'base>),
    Method(MethodAst<'base>),
}

pub(crate) fn parse_class_definition<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ClassDefinitionAst<'base>, LitParserError<'base>> {
    let (input, _) = keyword("class").parse(input)?;
    let (input, name) = expected_ident("Expected a class name", input)?;
    let (input, super_name) = opt(preceded(cleanup(char(':')), context("Expected a superclass name after ':'", cut(TypeNameAst::parse)))).parse(input)?;
    let (input, _) = context("Expected '{' to open a class body", cut(cleanup(char('{')))).parse(input)?;
    let (input, members) = many0(parse_member).parse(input)?;
    let (input, _) = context("Expected '}' to close a class body", cut(cleanup(char('}')))).parse(input)?;

    let mut fields = Vec::new();
    let mut methods = Vec::new();
    for member in members {
        match member {
            MemberAst::Field(field) => fields.push(field),
            MemberAst::Method(method) => methods.push(method),
        }
    }

    let index = AstIndex(input.extra.indexer.fetch_add(1, Ordering::Relaxed));

    Ok((
        input,
        ClassDefinitionAst {
            name: name.into(),
            super_name,
            fields,
            methods,
            index,
        },
    ))
}

fn parse_member<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, MemberAst<'base>, LitParserError<'base>> {
    let (input, access) = parse_access_modifier(input)?;
    let (input, is_static) = map(opt(keyword("static")), |modifier| modifier.is_some()).parse(input)?;

    alt((
        move |i| parse_method(i, access, is_static).map(|(i, method)| (i, MemberAst::Method(method))),
        move |i| parse_field(i, access, is_static).map(|(i, field)| (i, MemberAst::Field(field))),
    ))
    .parse(input)
}

fn parse_access_modifier<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, AccessModifier, LitParserError<'base>> {
    alt((
        value(AccessModifier::Public, keyword("public")),
        value(AccessModifier::Protected, keyword("protected")),
        value(AccessModifier::Private, keyword("private")),
        |i| Ok((i, AccessModifier::Public)),
    ))
    .parse(input)
}

fn parse_method<'base>(input: NomSpan<'base>, access: AccessModifier, is_static: bool) -> IResult<NomSpan<'base>, MethodAst<'base>, LitParserError<'base>> {
    let (input, is_overriden) = map(opt(keyword("override")), |modifier| modifier.is_some()).parse(input)?;
    let (input, function) = parse_function_definition(input)?;
    Ok((
        input,
        MethodAst {
            access,
            is_static,
            is_overriden,
            function,
        },
    ))
}

/// `[final] (var | Type) name [= expr] [get { ... }] [set { ... }] [;]`. A
/// field declared with `var` instead of an explicit type has its type
/// adopted from `init` during resolution (see §4.7) — the same "type may be
/// null" shape `resolve_field_statement` gives `LitFieldStatement::type` in
/// the original resolver. A field with neither accessor ends its declaration
/// in `;`; one with an accessor block ends at the closing `}` of the last
/// block parsed, no trailing `;` needed — the same shape methods use for
/// their own body.
fn parse_field<'base>(input: NomSpan<'base>, access: AccessModifier, is_static: bool) -> IResult<NomSpan<'base>, FieldAst<'base>, LitParserError<'base>> {
    let (input, is_final) = map(opt(keyword("final")), |modifier| modifier.is_some()).parse(input)?;
    let (input, type_name) = alt((value(None, keyword("var")), map(TypeNameAst::parse, Some))).parse(input)?;
    let (input, name) = expected_ident("Expected a field name", input)?;
    let (input, init) = opt(preceded(cleanup(char('=')), context("Expected an initializer expression after '='", cut(parse_expression)))).parse(input)?;

    let (input, getter) = opt(preceded(keyword("get"), context("Expected a getter body after 'get'", cut(parse_body)))).parse(input)?;
    let (input, setter) = opt(preceded(keyword("set"), context("Expected a setter body after 'set'", cut(parse_body)))).parse(input)?;

    let input = if getter.is_none() && setter.is_none() {
        let (input, _) = context("Expected ';' after a field declaration", cut(cleanup(char(';')))).parse(input)?;
        input
    } else {
        input
    };

    let index = AstIndex(input.extra.indexer.fetch_add(1, Ordering::Relaxed));

    Ok((
        input,
        FieldAst {
            access,
            is_static,
            is_final,
            type_name,
            name: name.into(),
            init,
            getter,
            setter,
            index,
        },
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::file::SourceFile;
    use crate::nom_tools::State;

    use super::*;

    fn parse(code: &str) -> ClassDefinitionAst<'_> {
        let state = State::new(SourceFile::new(vec!["<memory>".into()], code.to_string()));
        let input = NomSpan::new_extra(code, state);
        parse_class_definition(input).unwrap().1
    }

    #[test]
    fn parses_fields_and_methods_into_separate_lists() {
        let class = parse("class Animal { private String name; public fun speak() > String { return name; } }");
        assert_eq!(class.fields.len(), 1);
        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.fields[0].access, AccessModifier::Private);
        assert_eq!(class.methods[0].access, AccessModifier::Public);
    }

    #[test]
    fn parses_superclass() {
        let class = parse("class Dog : Animal { }");
        assert_eq!(class.super_name.unwrap().name.text, "Animal");
    }

    #[rstest]
    #[case("class A { final int x = 1; }")]
    #[case("class A { static private int x = 1; }")]
    #[case("class A { override fun speak() { } }")]
    fn parses_field_and_method_modifiers(#[case] code: &str) {
        assert!(parse_class_definition(NomSpan::new_extra(code, State::new(SourceFile::new(vec!["<memory>".into()], code.to_string())))).is_ok());
    }

    #[test]
    fn parses_field_with_inferred_type() {
        let class = parse("class Box { var value = 1; }");
        assert!(class.fields[0].type_name.is_none());
    }

    #[test]
    fn parses_field_with_getter_and_setter() {
        let class = parse("class Box { int value get { return value; } set { value = value; } }");
        assert!(class.fields[0].getter.is_some());
        assert!(class.fields[0].setter.is_some());
    }
}
