use serde::{Deserialize, Serialize};

use crate::ast::expr::{Expression, Identifier};
use crate::ast::operators::Operator;
use crate::parser::Span;

/// A parsed query document: zero or more statements in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SourceFile {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Let(LetStatement),
    Query(QueryStatement),
}

/// `let name = expression;` — binds a name visible to the query statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetStatement {
    pub name: Identifier,
    pub value: Expression,
    pub span: Span,
}

/// `Table | op | op ...` — a table source and its pipeline stages, in
/// source order. Stage order defines compile order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryStatement {
    pub table: Identifier,
    pub pipes: Vec<PipeExpression>,
    pub span: Span,
}

/// One `| <operator>` stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeExpression {
    pub operator: Operator,
    pub span: Span,
}
