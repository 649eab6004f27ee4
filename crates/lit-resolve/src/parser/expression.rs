//! Expression grammar: the precedence ladder, postfix call/member access, and
//! the handful of primary forms (literals, `this`, `super`, grouping,
//! lambdas).
//!
//! The ladder itself — multiplicative, additive, comparison, equality,
//! logical-and, logical-or, then right-associative assignment — is lifted
//! directly from `original_source/vm/src/lit_parser.c`'s
//! `parse_multiplication` / `parse_addition` / `parse_comprasion` /
//! `parse_equality` / `parse_and` / `parse_or` / `parse_assigment` chain, each
//! level a left-associative loop over the level below it. `parse_call`'s
//! postfix loop (call arguments, then `.name`) and `parse_primary`'s literal
//! dispatch are carried over the same way. Assignment is widened from the
//! original's "left side must already be a `VAR_EXPRESSION`" rule to also
//! allow a `Get` target, since this AST distinguishes `Set` from `Assign`
//! rather than folding both into one node the way the original bytecode
//! compiler does.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::char;
use nom::combinator::{consumed, cut, map, opt, value};
use nom::error::context;
use nom::multi::{many0, separated_list0};
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};

use crate::ast::{BinaryOperator, ExpressionAst, FunctionDefinitionAst, LogicalOperator, UnaryOperator};
use crate::nom_tools::{cleanup, NomSpan, ToRange};
use crate::parser::primitive::parse_primitive;
use crate::parser::{expected_ident, ident, keyword, LitParserError};

/// Entry point: the lowest-precedence level, assignment.
pub(crate) fn parse_expression<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ExpressionAst<'base>, LitParserError<'base>> {
    parse_assignment(input)
}

/// Right-associative: `a = b = c` parses as `a = (b = c)`. Only evaluates the
/// left side once it knows there's an `=` to its right, so a bare expression
/// statement like `foo();` never pays for the lookahead.
fn parse_assignment<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ExpressionAst<'base>, LitParserError<'base>> {
    let (input, target) = parse_logical_or(input)?;
    let (input, equals) = opt(consumed(cleanup(char('=')))).parse(input)?;

    match equals {
        None => Ok((input, target)),
        Some((equals_span, _)) => {
            let (input, value) = context("Expected an expression after '='", cut(parse_assignment)).parse(input)?;
            let span = equals_span.into();
            match target {
                ExpressionAst::Get(object, name) => Ok((input, ExpressionAst::Set(object, name, Box::new(value)))),
                other => Ok((input, ExpressionAst::Assign(Box::new(other), Box::new(value), span))),
            }
        }
    }
}

fn parse_logical_or<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ExpressionAst<'base>, LitParserError<'base>> {
    let (mut input, mut left) = parse_logical_and(input)?;
    loop {
        let (rest, operator) = opt(consumed(keyword("or"))).parse(input.clone())?;
        let Some((operator_span, _)) = operator else { break };
        let (rest, right) = context("Expected an expression after 'or'", cut(parse_logical_and)).parse(rest)?;
        left = ExpressionAst::Logical(Box::new(left), LogicalOperator::Or, Box::new(right), operator_span.into());
        input = rest;
    }
    Ok((input, left))
}

fn parse_logical_and<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ExpressionAst<'base>, LitParserError<'base>> {
    let (mut input, mut left) = parse_equality(input)?;
    loop {
        let (rest, operator) = opt(consumed(keyword("and"))).parse(input.clone())?;
        let Some((operator_span, _)) = operator else { break };
        let (rest, right) = context("Expected an expression after 'and'", cut(parse_equality)).parse(rest)?;
        left = ExpressionAst::Logical(Box::new(left), LogicalOperator::And, Box::new(right), operator_span.into());
        input = rest;
    }
    Ok((input, left))
}

fn parse_equality<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ExpressionAst<'base>, LitParserError<'base>> {
    let (mut input, mut left) = parse_comparison(input)?;
    loop {
        let (rest, operator) = opt(consumed(alt((value(BinaryOperator::Equal, cleanup(tag("=="))), value(BinaryOperator::NotEqual, cleanup(tag("!="))))))).parse(input.clone())?;
        let Some((operator_span, operator)) = operator else { break };
        let (rest, right) = context("Expected an expression after an equality operator", cut(parse_comparison)).parse(rest)?;
        left = ExpressionAst::Binary(Box::new(left), operator, Box::new(right), operator_span.into());
        input = rest;
    }
    Ok((input, left))
}

fn parse_comparison<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ExpressionAst<'base>, LitParserError<'base>> {
    let (mut input, mut left) = parse_additive(input)?;
    loop {
        let (rest, operator) = opt(consumed(alt((
            value(BinaryOperator::GreaterEqual, cleanup(tag(">="))),
            value(BinaryOperator::LessEqual, cleanup(tag("<="))),
            value(BinaryOperator::Greater, cleanup(char('>'))),
            value(BinaryOperator::Less, cleanup(char('<'))),
        ))))
        .parse(input.clone())?;
        let Some((operator_span, operator)) = operator else { break };
        let (rest, right) = context("Expected an expression after a comparison operator", cut(parse_additive)).parse(rest)?;
        left = ExpressionAst::Binary(Box::new(left), operator, Box::new(right), operator_span.into());
        input = rest;
    }
    Ok((input, left))
}

fn parse_additive<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ExpressionAst<'base>, LitParserError<'base>> {
    let (mut input, mut left) = parse_multiplicative(input)?;
    loop {
        let (rest, operator) = opt(consumed(alt((value(BinaryOperator::Add, cleanup(char('+'))), value(BinaryOperator::Subtract, cleanup(char('-'))))))).parse(input.clone())?;
        let Some((operator_span, operator)) = operator else { break };
        let (rest, right) = context("Expected an expression after an additive operator", cut(parse_multiplicative)).parse(rest)?;
        left = ExpressionAst::Binary(Box::new(left), operator, Box::new(right), operator_span.into());
        input = rest;
    }
    Ok((input, left))
}

fn parse_multiplicative<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ExpressionAst<'base>, LitParserError<'base>> {
    let (mut input, mut left) = parse_unary(input)?;
    loop {
        let (rest, operator) = opt(consumed(alt((value(BinaryOperator::Multiply, cleanup(char('*'))), value(BinaryOperator::Divide, cleanup(char('/'))))))).parse(input.clone())?;
        let Some((operator_span, operator)) = operator else { break };
        let (rest, right) = context("Expected an expression after a multiplicative operator", cut(parse_unary)).parse(rest)?;
        left = ExpressionAst::Binary(Box::new(left), operator, Box::new(right), operator_span.into());
        input = rest;
    }
    Ok((input, left))
}

/// `!`/`-` are prefix and recurse into themselves, so `!!x` and `--x` both
/// parse, matching `parse_unary`'s own recursive-call shape.
fn parse_unary<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ExpressionAst<'base>, LitParserError<'base>> {
    let (rest, operator) = opt(consumed(alt((value(UnaryOperator::Not, cleanup(char('!'))), value(UnaryOperator::Negate, cleanup(char('-'))))))).parse(input)?;
    match operator {
        Some((operator_span, operator)) => {
            let (rest, operand) = context("Expected an expression after a unary operator", cut(parse_unary)).parse(rest)?;
            Ok((rest, ExpressionAst::Unary(operator, Box::new(operand), operator_span.into())))
        }
        None => parse_call(rest),
    }
}

/// Postfix loop: any run of `(...)` call suffixes and `.name` member
/// accesses following a primary expression, left-associative, matching
/// `parse_call`/`finish_call`'s own loop.
fn parse_call<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ExpressionAst<'base>, LitParserError<'base>> {
    let (mut input, mut expression) = parse_primary(input)?;
    loop {
        let (rest, open_paren) = opt(consumed(cleanup(char('(')))).parse(input.clone())?;
        if let Some((open_paren_span, _)) = open_paren {
            let (rest, arguments) = separated_list0(cleanup(char(',')), parse_expression).parse(rest)?;
            let (rest, _) = context("Expected ')' after call arguments", cut(cleanup(char(')')))).parse(rest)?;
            expression = ExpressionAst::Call(Box::new(expression), arguments, open_paren_span.into());
            input = rest;
            continue;
        }

        let (rest, dot) = opt(cleanup(char('.'))).parse(input.clone())?;
        if dot.is_some() {
            let (rest, name) = expected_ident("Expected a member name after '.'", rest)?;
            expression = ExpressionAst::Get(Box::new(expression), name.into());
            input = rest;
            continue;
        }

        break;
    }
    Ok((input, expression))
}

fn parse_primary<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ExpressionAst<'base>, LitParserError<'base>> {
    alt((
        parse_grouping,
        parse_lambda,
        parse_this,
        parse_super,
        map(parse_primitive, |(span, value)| ExpressionAst::Literal(value, span.into())),
        map(ident(), |name| ExpressionAst::Var(name.into())),
    ))
    .parse(input)
}

fn parse_grouping<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ExpressionAst<'base>, LitParserError<'base>> {
    map(
        delimited(cleanup(char('(')), parse_expression, context("Expected ')' to close a grouped expression", cut(cleanup(char(')'))))),
        |inner| ExpressionAst::Grouping(Box::new(inner)),
    )
    .parse(input)
}

fn parse_lambda<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ExpressionAst<'base>, LitParserError<'base>> {
    let (input, (function_span, function)) = consumed(FunctionDefinitionAst::parse_lambda).parse(input)?;
    Ok((input, ExpressionAst::Lambda(Box::new(function), function_span.into())))
}

fn parse_this<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ExpressionAst<'base>, LitParserError<'base>> {
    map(keyword("this"), |span| ExpressionAst::This(span.into())).parse(input)
}

/// `super.method` — only the member-access form appears as a primary
/// expression; a bare `super` is meaningless outside that position.
fn parse_super<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ExpressionAst<'base>, LitParserError<'base>> {
    let (input, super_span) = keyword("super").parse(input)?;
    let (input, _) = context("Expected '.' after 'super'", cut(cleanup(char('.')))).parse(input)?;
    let (input, name) = expected_ident("Expected a method name after 'super.'", input)?;
    Ok((input, ExpressionAst::Super(super_span.into(), name.into())))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::file::SourceFile;
    use crate::nom_tools::State;

    use super::*;

    fn parse(code: &str) -> ExpressionAst<'_> {
        let state = State::new(SourceFile::new(vec!["<memory>".into()], code.to_string()));
        let input = NomSpan::new_extra(code, state);
        parse_expression(input).unwrap().1
    }

    #[test]
    fn respects_arithmetic_precedence() {
        match parse("1 + 2 * 3") {
            ExpressionAst::Binary(left, BinaryOperator::Add, right, _) => {
                assert!(matches!(*left, ExpressionAst::Literal(crate::ast::PrimitiveValueAst::Int(1), _)));
                assert!(matches!(*right, ExpressionAst::Binary(_, BinaryOperator::Multiply, _, _)));
            }
            other => panic!("expected a top-level addition, got {other:?}"),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        match parse("a = b = 1") {
            ExpressionAst::Assign(_, value, _) => {
                assert!(matches!(*value, ExpressionAst::Assign(_, _, _)));
            }
            other => panic!("expected an assignment, got {other:?}"),
        }
    }

    #[test]
    fn get_on_assignment_target_becomes_set() {
        match parse("object.field = 1") {
            ExpressionAst::Set(_, name, _) => assert_eq!(name.text, "field"),
            other => panic!("expected a set expression, got {other:?}"),
        }
    }

    #[rstest]
    #[case("foo()")]
    #[case("foo(1, 2)")]
    #[case("foo().bar()")]
    fn parses_call_chains(#[case] code: &str) {
        assert!(matches!(parse(code), ExpressionAst::Call(_, _, _)));
    }

    #[test]
    fn parses_super_call() {
        match parse("super.init()") {
            ExpressionAst::Call(callee, _, _) => assert!(matches!(*callee, ExpressionAst::Super(_, _))),
            other => panic!("expected a call on a super expression, got {other:?}"),
        }
    }
}
