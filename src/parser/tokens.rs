//! Lexical layer: trivia, identifiers and literal tokens.
//!
//! Every parser here consumes leading whitespace/comments itself, so node
//! spans start at the first significant character.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while},
    character::complete::{char, digit1, multispace1, not_line_ending, satisfy},
    combinator::{not, opt, peek, recognize, value},
    multi::many0,
    sequence::{pair, tuple},
    IResult,
};

use super::cst::{SyntaxKind, SyntaxNode};

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Slice of `start` consumed so far, given the remaining input.
pub(crate) fn consumed_text<'a>(start: &'a str, rest: &'a str) -> &'a str {
    &start[..start.len() - rest.len()]
}

/// Whitespace, `// ...` line comments and `/* ... */` block comments.
pub fn trivia(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((value((), multispace1), line_comment, block_comment))),
    )(input)
}

fn line_comment(input: &str) -> IResult<&str, ()> {
    value((), pair(tag("//"), not_line_ending))(input)
}

fn block_comment(input: &str) -> IResult<&str, ()> {
    value((), tuple((tag("/*"), take_until("*/"), tag("*/"))))(input)
}

/// A keyword token: the word itself, not a prefix of a longer identifier.
pub fn keyword(kw: &'static str) -> impl Fn(&str) -> IResult<&str, SyntaxNode<'_>> {
    move |input| {
        let (input, _) = trivia(input)?;
        let (rest, text) = recognize(pair(tag(kw), peek(not(satisfy(is_ident_char)))))(input)?;
        Ok((rest, SyntaxNode::token(text)))
    }
}

/// A punctuation token.
pub fn sym(s: &'static str) -> impl Fn(&str) -> IResult<&str, SyntaxNode<'_>> {
    move |input| {
        let (input, _) = trivia(input)?;
        let (rest, text) = tag(s)(input)?;
        Ok((rest, SyntaxNode::token(text)))
    }
}

/// A single `=` that is not the first half of `==`.
pub fn assign(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let (rest, text) = recognize(pair(char('='), peek(not(char('=')))))(input)?;
    Ok((rest, SyntaxNode::token(text)))
}

/// An identifier: bare `[A-Za-z_][A-Za-z0-9_]*` or bracketed `['...']`.
pub fn identifier(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    if let Ok((rest, _)) = char::<_, nom::error::Error<&str>>('[')(input) {
        let (rest, _) = trivia(rest)?;
        let (rest, lit) = string_literal(rest)?;
        let (rest, _) = trivia(rest)?;
        let (rest, _) = char(']')(rest)?;
        return Ok((
            rest,
            SyntaxNode::new(SyntaxKind::Identifier, consumed_text(start, rest), vec![lit]),
        ));
    }
    let (rest, text) = recognize(pair(
        satisfy(|c| c.is_alphabetic() || c == '_'),
        take_while(is_ident_char),
    ))(input)?;
    Ok((rest, SyntaxNode::new(SyntaxKind::Identifier, text, vec![])))
}

/// A quoted string; either quote style, no escape processing.
pub fn string_literal(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let (rest, text) = alt((
        recognize(tuple((char('\''), take_while(|c| c != '\''), char('\'')))),
        recognize(tuple((char('"'), take_while(|c| c != '"'), char('"')))),
    ))(input)?;
    Ok((
        rest,
        SyntaxNode::new(SyntaxKind::StringLiteral, text, vec![]),
    ))
}

/// A decimal number: `\d+(\.\d+)?`.
pub fn number_literal(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let (rest, text) = recognize(pair(digit1, opt(pair(char('.'), digit1))))(input)?;
    Ok((
        rest,
        SyntaxNode::new(SyntaxKind::NumberLiteral, text, vec![]),
    ))
}

/// A timespan: `\d+(\.\d+)?(d|h|m|s|ms)` at an identifier boundary.
pub fn timespan_literal(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let (rest, text) = recognize(tuple((
        digit1,
        opt(pair(char('.'), digit1)),
        alt((tag("ms"), tag("d"), tag("h"), tag("m"), tag("s"))),
        peek(not(satisfy(is_ident_char))),
    )))(input)?;
    Ok((
        rest,
        SyntaxNode::new(SyntaxKind::TimespanLiteral, text, vec![]),
    ))
}

pub fn boolean_literal(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let (rest, text) = recognize(alt((
        pair(tag("true"), peek(not(satisfy(is_ident_char)))),
        pair(tag("false"), peek(not(satisfy(is_ident_char)))),
    )))(input)?;
    Ok((
        rest,
        SyntaxNode::new(SyntaxKind::BooleanLiteral, text, vec![]),
    ))
}

pub fn null_literal(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let (rest, text) = recognize(pair(tag("null"), peek(not(satisfy(is_ident_char)))))(input)?;
    Ok((
        rest,
        SyntaxNode::new(SyntaxKind::NullLiteral, text, vec![]),
    ))
}

/// `dynamic(<opaque>)` — payload captured verbatim, parens balanced.
pub fn dynamic_literal(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    opaque_call_literal("dynamic", SyntaxKind::DynamicLiteral)(input)
}

/// `datetime(<opaque>)` — payload captured verbatim.
pub fn datetime_literal(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    opaque_call_literal("datetime", SyntaxKind::DatetimeLiteral)(input)
}

fn opaque_call_literal(
    kw: &'static str,
    kind: SyntaxKind,
) -> impl Fn(&str) -> IResult<&str, SyntaxNode<'_>> {
    move |input| {
        let (input, _) = trivia(input)?;
        let start = input;
        let (rest, kw_tok) = keyword(kw)(input)?;
        let (rest, open) = sym("(")(rest)?;
        let (rest, payload) = balanced_payload(rest)?;
        let (rest, close) = sym(")")(rest)?;
        Ok((
            rest,
            SyntaxNode::new(
                kind,
                consumed_text(start, rest),
                vec![kw_tok, open, SyntaxNode::token(payload), close],
            ),
        ))
    }
}

/// Text up to the `)` matching an already-consumed `(`, honoring nested
/// parens and quoted strings.
fn balanced_payload(input: &str) -> IResult<&str, &str> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in input.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => quote = Some(c),
                '(' => depth += 1,
                ')' => {
                    if depth == 0 {
                        return Ok((&input[i..], &input[..i]));
                    }
                    depth -= 1;
                }
                _ => {}
            },
        }
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::TakeUntil,
    )))
}

/// One numeric token with timespan tried first, shared by the literal rule.
pub fn numeric_like(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    alt((timespan_literal, number_literal))(input)
}
