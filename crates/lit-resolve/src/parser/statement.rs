//! Statement and code-block parsing.
//!
//! Block/if structure follows `libtimu`'s `parser::body`/`parser::if_condition`
//! (an `alt` of statement parsers inside `many0`, an `else` chain built from
//! `many0(preceded((tag("else"), tag("if")), ...))` so a bare `else` simply
//! doesn't match the "else if" prefix and falls through). `while`, `for`,
//! `return`, and the statement terminator convention come from
//! `original_source/vm/src/lit_parser.c`'s `parse_while`, `parse_for`,
//! `parse_return_statement`, and `parse_statement` — in particular `for`'s
//! desugaring into a `while` wrapped around a block that re-runs the
//! increment, exactly as `parse_for` builds it there.

use nom::branch::alt;
use nom::character::complete::char;
use nom::combinator::{cut, map, opt};
use nom::error::context;
use nom::multi::many0;
use nom::sequence::preceded;
use nom::{IResult, Parser};

use crate::ast::{BodyAst, BodyStatementAst, ExpressionAst, IfStatementAst, PrimitiveValueAst, ReturnStatementAst, TypeNameAst, VariableDefinitionAst, WhileStatementAst};
use crate::nom_tools::{cleanup, NomSpan};
use crate::parser::expression::parse_expression;
use crate::parser::{expected_ident, keyword, synthetic_span, LitParserError};

/// Parses a brace-delimited sequence of statements, used for function bodies,
/// `if`/`else` branches, and `while` bodies alike.
pub(crate) fn parse_body<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, BodyAst<'base>, LitParserError<'base>> {
    let (input, _) = context("Expected '{' to open a block", cut(cleanup(char('{')))).parse(input)?;
    let (input, statements) = many0(parse_statement).parse(input)?;
    let (input, _) = context("Expected '}' to close a block", cut(cleanup(char('}')))).parse(input)?;
    Ok((input, BodyAst { statements }))
}

/// A single statement inside a block. `for` desugars at parse time, so it
/// never appears as its own [`BodyStatementAst`] variant — it expands
/// directly into the `Block`/`While` shape it's built from.
fn parse_statement<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, BodyStatementAst<'base>, LitParserError<'base>> {
    alt((
        map(parse_body, BodyStatementAst::Block),
        map(parse_if, BodyStatementAst::If),
        map(parse_while, BodyStatementAst::While),
        parse_for,
        map(parse_return, BodyStatementAst::Return),
        map(parse_var_declaration, BodyStatementAst::VariableDefinition),
        parse_expression_statement,
    ))
    .parse(input)
}

fn parse_if<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, IfStatementAst<'base>, LitParserError<'base>> {
    let (input, _) = keyword("if").parse(input)?;
    let (input, _) = context("Expected '(' after 'if'", cut(cleanup(char('(')))).parse(input)?;
    let (input, condition) = context("Expected a condition expression", cut(parse_expression)).parse(input)?;
    let (input, _) = context("Expected ')' after an if condition", cut(cleanup(char(')')))).parse(input)?;
    let (input, then_branch) = context("Expected a block after the if condition", cut(parse_statement)).parse(input)?;

    let (input, else_ifs) = many0(preceded(
        (keyword("else"), keyword("if")),
        (
            preceded(context("Expected '(' after 'else if'", cut(cleanup(char('(')))), context("Expected a condition expression", cut(parse_expression))),
            |i| {
                let (i, _) = context("Expected ')' after an else-if condition", cut(cleanup(char(')')))).parse(i)?;
                context("Expected a block after the else-if condition", cut(parse_statement)).parse(i)
            },
        ),
    ))
    .parse(input)?;

    let (input, else_branch) = match cleanup(opt(keyword("else"))).parse(input)? {
        (input, Some(_)) => {
            let (input, branch) = context("Expected a block after 'else'", cut(parse_statement)).parse(input)?;
            (input, Some(Box::new(branch)))
        }
        (input, None) => (input, None),
    };

    Ok((
        input,
        IfStatementAst {
            condition,
            then_branch: Box::new(then_branch),
            else_ifs,
            else_branch,
        },
    ))
}

fn parse_while<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, WhileStatementAst<'base>, LitParserError<'base>> {
    let (input, _) = keyword("while").parse(input)?;
    let (input, _) = context("Expected '(' after 'while'", cut(cleanup(char('(')))).parse(input)?;
    let (input, condition) = context("Expected a condition expression", cut(parse_expression)).parse(input)?;
    let (input, _) = context("Expected ')' after a while condition", cut(cleanup(char(')')))).parse(input)?;
    let (input, body) = context("Expected a block after the while condition", cut(parse_statement)).parse(input)?;
    Ok((input, WhileStatementAst { condition, body: Box::new(body) }))
}

/// Desugars `for (init; condition; increment) body` into
/// `{ init while (condition) { body increment } }`, matching `parse_for`'s
/// own expansion exactly: an omitted condition defaults to `true`, and the
/// increment (if present) is re-run by being appended to the loop body.
fn parse_for<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, BodyStatementAst<'base>, LitParserError<'base>> {
    let (input, _) = keyword("for").parse(input)?;
    let (input, _) = context("Expected '(' after 'for'", cut(cleanup(char('(')))).parse(input)?;

    let (input, init) = opt(alt((map(parse_var_declaration, BodyStatementAst::VariableDefinition), parse_expression_statement))).parse(input)?;
    let (input, _) = if init.is_none() {
        context("Expected ';' after the for-loop initializer", cut(cleanup(char(';')))).parse(input)?
    } else {
        (input, ())
    };

    let (input, condition) = opt(parse_expression).parse(input)?;
    let (input, _) = context("Expected ';' after the for-loop condition", cut(cleanup(char(';')))).parse(input)?;

    let (input, increment) = opt(parse_expression).parse(input)?;
    let (input, _) = context("Expected ')' after the for-loop clauses", cut(cleanup(char(')')))).parse(input)?;

    let (input, body) = context("Expected a block for the for-loop body", cut(parse_statement)).parse(input)?;

    let condition = condition.unwrap_or_else(|| ExpressionAst::Literal(PrimitiveValueAst::Bool(true), synthetic_span(&input, "true")));

    let mut loop_statements = vec![body];
    if let Some(increment) = increment {
        loop_statements.push(BodyStatementAst::Expression(increment));
    }
    let loop_body = BodyStatementAst::Block(BodyAst { statements: loop_statements });

    let while_statement = BodyStatementAst::While(WhileStatementAst { condition, body: Box::new(loop_body) });

    let statement = match init {
        Some(init) => BodyStatementAst::Block(BodyAst { statements: vec![init, while_statement] }),
        None => while_statement,
    };

    Ok((input, statement))
}

/// `return;` (no value, implicit `void`) is valid wherever a `;` immediately
/// follows the keyword, matching `parse_return_statement`'s own check for a
/// bodyless return.
fn parse_return<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, ReturnStatementAst<'base>, LitParserError<'base>> {
    let (input, keyword_span) = keyword("return").parse(input)?;
    let (input, value) = opt(parse_expression).parse(input)?;
    let (input, _) = context("Expected ';' after a return statement", cut(cleanup(char(';')))).parse(input)?;
    Ok((input, ReturnStatementAst { value, keyword: keyword_span.into() }))
}

fn parse_var_declaration<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, VariableDefinitionAst<'base>, LitParserError<'base>> {
    let (input, _) = keyword("var").parse(input)?;
    let (input, name) = expected_ident("Expected a variable name", input)?;
    let (input, type_name) = opt(preceded(cleanup(char(':')), context("Expected a type after ':'", cut(TypeNameAst::parse)))).parse(input)?;
    let (input, init) = opt(preceded(cleanup(char('=')), context("Expected an initializer expression after '='", cut(parse_expression)))).parse(input)?;
    let (input, _) = context("Expected ';' after a variable declaration", cut(cleanup(char(';')))).parse(input)?;
    Ok((input, VariableDefinitionAst { name: name.into(), type_name, init }))
}

fn parse_expression_statement<'base>(input: NomSpan<'base>) -> IResult<NomSpan<'base>, BodyStatementAst<'base>, LitParserError<'base>> {
    let (input, expression) = parse_expression(input)?;
    let (input, _) = context("Expected ';' after an expression statement", cut(cleanup(char(';')))).parse(input)?;
    Ok((input, BodyStatementAst::Expression(expression)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::file::SourceFile;
    use crate::nom_tools::State;

    use super::*;

    fn parse(code: &str) -> BodyAst<'_> {
        let state = State::new(SourceFile::new(vec!["<memory>".into()], code.to_string()));
        let input = NomSpan::new_extra(code, state);
        parse_body(input).unwrap().1
    }

    #[rstest]
    #[case("{ var x = 1; }", 1)]
    #[case("{ var x: int = 1; var y = x + 1; return y; }", 3)]
    #[case("{ }", 0)]
    fn parses_block_statement_counts(#[case] code: &str, #[case] count: usize) {
        assert_eq!(parse(code).statements.len(), count);
    }

    #[test]
    fn parses_if_else_chain() {
        let body = parse("{ if (x > 0) { return 1; } else if (x < 0) { return -1; } else { return 0; } }");
        assert_eq!(body.statements.len(), 1);
        match &body.statements[0] {
            BodyStatementAst::If(if_statement) => {
                assert_eq!(if_statement.else_ifs.len(), 1);
                assert!(if_statement.else_branch.is_some());
            }
            other => panic!("expected an if statement, got {other:?}"),
        }
    }

    #[test]
    fn desugars_for_loop_into_block_and_while() {
        let body = parse("{ for (var i = 0; i < 10; i = i + 1) { } }");
        assert_eq!(body.statements.len(), 1);
        match &body.statements[0] {
            BodyStatementAst::Block(block) => {
                assert_eq!(block.statements.len(), 2);
                assert!(matches!(block.statements[0], BodyStatementAst::VariableDefinition(_)));
                assert!(matches!(block.statements[1], BodyStatementAst::While(_)));
            }
            other => panic!("expected for-loop to desugar into a block, got {other:?}"),
        }
    }

    #[test]
    fn for_loop_defaults_missing_condition_to_true() {
        let body = parse("{ for (;;) { } }");
        match &body.statements[0] {
            BodyStatementAst::While(while_statement) => {
                assert!(matches!(while_statement.condition, ExpressionAst::Literal(PrimitiveValueAst::Bool(true), _)));
            }
            other => panic!("expected a while statement, got {other:?}"),
        }
    }

    #[test]
    fn parses_bare_return() {
        let body = parse("{ return; }");
        match &body.statements[0] {
            BodyStatementAst::Return(return_statement) => assert!(return_statement.value.is_none()),
            other => panic!("expected a return statement, got {other:?}"),
        }
    }
}
