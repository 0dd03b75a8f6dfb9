//! Statement grammar and error recovery.
//!
//! The source file loop never fails: a region that does not parse as a
//! statement becomes an `Error` node and parsing resumes after the next
//! `;` (or at end of input), so one pass can report several problems.

use nom::{branch::alt, IResult};

use super::cst::{SyntaxKind, SyntaxNode};
use super::expressions::expression;
use super::operators::operator_clause;
use super::tokens::{assign, consumed_text, identifier, keyword, sym, trivia};

pub fn source_file(source: &str) -> SyntaxNode<'_> {
    let mut children = Vec::new();
    let mut input = source;
    loop {
        let (rest, _) = match trivia(input) {
            Ok(r) => r,
            Err(_) => (input, ()),
        };
        if rest.is_empty() {
            break;
        }
        // Stray separators are skipped, not diagnosed.
        if let Some(after) = rest.strip_prefix(';') {
            input = after;
            continue;
        }
        match statement(rest) {
            Ok((after, node)) => {
                children.push(node);
                input = after;
            }
            Err(_) => {
                let end = rest.find(';').map(|i| i + 1).unwrap_or(rest.len());
                let bad = rest[..end].trim_end();
                children.push(SyntaxNode::error(&rest[..bad.len()], "malformed statement"));
                input = &rest[end..];
            }
        }
    }
    SyntaxNode::new(SyntaxKind::SourceFile, source, children)
}

fn statement(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    alt((let_statement, query_statement))(input)
}

/// `let <name> = <expression>;` — the terminator is required.
fn let_statement(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, kw) = keyword("let")(input)?;
    let (rest, name) = identifier(rest)?;
    let (rest, eq) = assign(rest)?;
    let (rest, value) = expression(rest)?;
    let (rest, semi) = sym(";")(rest)?;
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::LetStatement,
            consumed_text(start, rest),
            vec![kw, name, eq, value, semi],
        ),
    ))
}

/// `<Table> | op | op ...` with an optional trailing `;`.
fn query_statement(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, name) = identifier(input)?;
    let table = SyntaxNode::new(SyntaxKind::TableName, name.text, vec![name]);
    let mut children = vec![table];
    let mut rest = rest;
    while let Ok((after_pipe, pipe)) = pipe_expression(rest) {
        children.push(pipe);
        rest = after_pipe;
    }
    if let Ok((after_semi, semi)) = sym(";")(rest) {
        children.push(semi);
        rest = after_semi;
    }
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::QueryStatement,
            consumed_text(start, rest),
            children,
        ),
    ))
}

fn pipe_expression(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, bar) = sym("|")(input)?;
    let (rest, clause) = operator_clause(rest)?;
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::PipeExpression,
            consumed_text(start, rest),
            vec![bar, clause],
        ),
    ))
}
