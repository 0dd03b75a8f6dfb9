//! Top of the builder: source file and statements.

use crate::ast::{LetStatement, PipeExpression, QueryStatement, SourceFile, Statement};
use crate::error::BuildError;
use crate::parser::{SyntaxKind, SyntaxNode};

use super::expressions::build_expression;
use super::literals::identifier_name;
use super::operators::build_operator;

/// Build the typed tree for a whole parse. The caller is expected to have
/// checked for syntax errors first; an error node reaching this point is
/// reported as a build defect.
pub fn build_source_file(root: &SyntaxNode<'_>) -> Result<SourceFile, BuildError> {
    if root.kind != SyntaxKind::SourceFile {
        return Err(BuildError::unexpected("root", root.kind.name()));
    }
    let statements = root
        .children
        .iter()
        .map(build_statement)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SourceFile { statements })
}

fn build_statement(node: &SyntaxNode<'_>) -> Result<Statement, BuildError> {
    match node.kind {
        SyntaxKind::LetStatement => Ok(Statement::Let(build_let(node)?)),
        SyntaxKind::QueryStatement => Ok(Statement::Query(build_query(node)?)),
        SyntaxKind::Error => Err(BuildError::new(
            "cannot build from a tree with syntax errors",
        )),
        other => Err(BuildError::unexpected("source file", other.name())),
    }
}

fn build_let(node: &SyntaxNode<'_>) -> Result<LetStatement, BuildError> {
    // Fixed shape: `let` name `=` value `;`.
    let name = node
        .children
        .get(1)
        .ok_or_else(|| BuildError::missing("let_statement", "name"))?;
    let value = node
        .children
        .get(3)
        .ok_or_else(|| BuildError::missing("let_statement", "value"))?;
    Ok(LetStatement {
        name: identifier_name(name)?,
        value: build_expression(value)?,
        span: node.span,
    })
}

fn build_query(node: &SyntaxNode<'_>) -> Result<QueryStatement, BuildError> {
    let table = node
        .child_of(SyntaxKind::TableName)
        .ok_or_else(|| BuildError::missing("query_statement", "table name"))?;
    let name = table
        .child_of(SyntaxKind::Identifier)
        .ok_or_else(|| BuildError::missing("table_name", "identifier"))?;
    let pipes = node
        .children_of(SyntaxKind::PipeExpression)
        .map(build_pipe)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(QueryStatement {
        table: identifier_name(name)?,
        pipes,
        span: node.span,
    })
}

fn build_pipe(node: &SyntaxNode<'_>) -> Result<PipeExpression, BuildError> {
    let clause = node
        .children
        .get(1)
        .ok_or_else(|| BuildError::missing("pipe_expression", "operator"))?;
    Ok(PipeExpression {
        operator: build_operator(clause)?,
        span: node.span,
    })
}
