//! Expression grammar.
//!
//! Precedence, loosest first: logical (`and`/`or`), comparison, additive,
//! multiplicative, postfix `::` cast, primary. Each binary level folds
//! left, so `a - b - c` nests as `(a - b) - c`.

use nom::{branch::alt, combinator::opt, multi::separated_list1, IResult};

use super::cst::{SyntaxKind, SyntaxNode};
use super::tokens::{
    assign, boolean_literal, datetime_literal, dynamic_literal, identifier, keyword, null_literal,
    numeric_like, string_literal, sym, trivia,
};
use super::tokens::consumed_text;

/// Conversion functions parsed as type casts rather than calls.
const CAST_FUNCTIONS: [&str; 8] = [
    "tostring",
    "toint",
    "tolong",
    "todouble",
    "tofloat",
    "tobool",
    "todatetime",
    "totimespan",
];

pub fn expression(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    logical(input)
}

fn logical(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (mut rest, mut node) = comparison(input)?;
    while let Ok((after_op, op_tok)) = alt((keyword("and"), keyword("or")))(rest) {
        let (after_right, right) = comparison(after_op)?;
        node = SyntaxNode::new(
            SyntaxKind::BinaryExpression,
            consumed_text(start, after_right),
            vec![node, op_tok, right],
        );
        rest = after_right;
    }
    Ok((rest, node))
}

fn comparison(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, left) = additive(input)?;

    // String predicates, membership and range tests bind a bare column
    // name on the left, so only try them after parsing an identifier.
    if left.kind == SyntaxKind::Identifier {
        if let Ok((rest, node)) = string_predicate(start, left.clone(), rest) {
            return Ok((rest, node));
        }
        if let Ok((rest, node)) = in_expression(start, left.clone(), rest) {
            return Ok((rest, node));
        }
        if let Ok((rest, node)) = between_expression(start, left.clone(), rest) {
            return Ok((rest, node));
        }
    }

    let (mut rest, mut node) = (rest, left);
    while let Ok((after_op, op_tok)) = comparison_op(rest) {
        let (after_right, right) = additive(after_op)?;
        node = SyntaxNode::new(
            SyntaxKind::ComparisonExpression,
            consumed_text(start, after_right),
            vec![node, op_tok, right],
        );
        rest = after_right;
    }
    Ok((rest, node))
}

fn comparison_op(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    alt((
        sym("=="),
        sym("!="),
        sym("<="),
        sym(">="),
        sym("<"),
        sym(">"),
    ))(input)
}

fn string_predicate<'a>(
    start: &'a str,
    left: SyntaxNode<'a>,
    input: &'a str,
) -> IResult<&'a str, SyntaxNode<'a>> {
    let (rest, op_tok) = alt((
        keyword("contains"),
        keyword("startswith"),
        keyword("endswith"),
        keyword("matches"),
        keyword("has"),
    ))(input)?;
    // `matches` optionally takes the `regex` qualifier.
    let (rest, regex_tok) = opt(keyword("regex"))(rest)?;
    let (rest, lit) = string_literal(rest)?;
    let mut children = vec![left, op_tok];
    if let Some(tok) = regex_tok {
        children.push(tok);
    }
    children.push(lit);
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::StringExpression,
            consumed_text(start, rest),
            children,
        ),
    ))
}

fn in_expression<'a>(
    start: &'a str,
    left: SyntaxNode<'a>,
    input: &'a str,
) -> IResult<&'a str, SyntaxNode<'a>> {
    let (rest, in_tok) = keyword("in")(input)?;
    let (rest, open) = sym("(")(rest)?;
    let (rest, list) = literal_list(rest)?;
    let (rest, close) = sym(")")(rest)?;
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::InExpression,
            consumed_text(start, rest),
            vec![left, in_tok, open, list, close],
        ),
    ))
}

fn between_expression<'a>(
    start: &'a str,
    left: SyntaxNode<'a>,
    input: &'a str,
) -> IResult<&'a str, SyntaxNode<'a>> {
    let (rest, between_tok) = keyword("between")(input)?;
    let (rest, open) = sym("(")(rest)?;
    let (rest, min) = additive(rest)?;
    let (rest, dots) = sym("..")(rest)?;
    let (rest, max) = additive(rest)?;
    let (rest, close) = sym(")")(rest)?;
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::BetweenExpression,
            consumed_text(start, rest),
            vec![left, between_tok, open, min, dots, max, close],
        ),
    ))
}

fn literal_list(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, items) = separated_list1(sym(","), literal)(input)?;
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::LiteralList,
            consumed_text(start, rest),
            items,
        ),
    ))
}

pub fn literal(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    alt((
        dynamic_literal,
        datetime_literal,
        boolean_literal,
        null_literal,
        numeric_like,
        string_literal,
    ))(input)
}

fn additive(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (mut rest, mut node) = multiplicative(input)?;
    while let Ok((after_op, op_tok)) = alt((sym("+"), sym("-")))(rest) {
        let (after_right, right) = multiplicative(after_op)?;
        node = SyntaxNode::new(
            SyntaxKind::ArithmeticExpression,
            consumed_text(start, after_right),
            vec![node, op_tok, right],
        );
        rest = after_right;
    }
    Ok((rest, node))
}

fn multiplicative(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (mut rest, mut node) = cast_postfix(input)?;
    while let Ok((after_op, op_tok)) = alt((sym("*"), sym("/"), sym("%")))(rest) {
        let (after_right, right) = cast_postfix(after_op)?;
        node = SyntaxNode::new(
            SyntaxKind::ArithmeticExpression,
            consumed_text(start, after_right),
            vec![node, op_tok, right],
        );
        rest = after_right;
    }
    Ok((rest, node))
}

/// Postfix `expr :: type` cast; binds tighter than any binary operator.
fn cast_postfix(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (mut rest, mut node) = primary(input)?;
    while let Ok((after_op, op_tok)) = sym("::")(rest) {
        let (after_type, target) = identifier(after_op)?;
        node = SyntaxNode::new(
            SyntaxKind::TypeCastExpression,
            consumed_text(start, after_type),
            vec![node, op_tok, target],
        );
        rest = after_type;
    }
    Ok((rest, node))
}

fn primary(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    alt((
        parenthesized,
        conditional_expression,
        type_cast,
        dynamic_literal,
        datetime_literal,
        boolean_literal,
        null_literal,
        numeric_like,
        string_literal,
        ident_like,
    ))(input)
}

fn parenthesized(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, open) = sym("(")(input)?;
    let (rest, inner) = expression(rest)?;
    let (rest, close) = sym(")")(rest)?;
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::ParenthesizedExpression,
            consumed_text(start, rest),
            vec![open, inner, close],
        ),
    ))
}

fn conditional_expression(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, fn_tok) = alt((keyword("iff"), keyword("case")))(input)?;
    let (rest, open) = sym("(")(rest)?;
    let (rest, args) = argument_list(rest)?;
    let (rest, close) = sym(")")(rest)?;
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::ConditionalExpression,
            consumed_text(start, rest),
            vec![fn_tok, open, args, close],
        ),
    ))
}

fn type_cast(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, name_tok) = cast_function(input)?;
    let (rest, open) = sym("(")(rest)?;
    let (rest, inner) = expression(rest)?;
    let (rest, close) = sym(")")(rest)?;
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::TypeCastExpression,
            consumed_text(start, rest),
            vec![name_tok, open, inner, close],
        ),
    ))
}

fn cast_function(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    for name in CAST_FUNCTIONS {
        if let Ok(found) = keyword(name)(input) {
            return Ok(found);
        }
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Tag,
    )))
}

/// Identifier, qualified identifier or function call, decided by one
/// token of lookahead after the name.
fn ident_like(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, name) = identifier(input)?;
    if let Ok((rest, dot)) = sym(".")(rest) {
        let (rest, column) = identifier(rest)?;
        return Ok((
            rest,
            SyntaxNode::new(
                SyntaxKind::QualifiedIdentifier,
                consumed_text(start, rest),
                vec![name, dot, column],
            ),
        ));
    }
    if let Ok((after_open, open)) = sym("(")(rest) {
        let (rest, args) = argument_list(after_open)?;
        let (rest, close) = sym(")")(rest)?;
        return Ok((
            rest,
            SyntaxNode::new(
                SyntaxKind::FunctionCall,
                consumed_text(start, rest),
                vec![name, open, args, close],
            ),
        ));
    }
    Ok((rest, name))
}

/// Comma-separated call arguments; may be empty. Each argument is either
/// an expression or a `name = expression` named argument.
pub fn argument_list(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, first) = opt(argument)(input)?;
    let mut args = Vec::new();
    let mut rest = rest;
    if let Some(first) = first {
        args.push(first);
        while let Ok((after_comma, _)) = sym(",")(rest) {
            let (after_arg, arg) = argument(after_comma)?;
            args.push(arg);
            rest = after_arg;
        }
    }
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::ArgumentList,
            consumed_text(start, rest),
            args,
        ),
    ))
}

fn argument(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    alt((named_argument, expression))(input)
}

fn named_argument(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, name) = identifier(input)?;
    let (rest, eq) = assign(rest)?;
    let (rest, value) = expression(rest)?;
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::NamedArgument,
            consumed_text(start, rest),
            vec![name, eq, value],
        ),
    ))
}
