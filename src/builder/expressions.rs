//! CST expression nodes to typed [`Expression`] values.
//!
//! Every match here is exhaustive over the kinds the grammar can emit in
//! expression position; anything else is a parser/builder lock-step
//! defect reported as a [`BuildError`].

use crate::ast::{
    ArithmeticOp, ColumnExpression, ComparisonOp, ConditionalFn, Expression, LogicalOp, StringOp,
};
use crate::error::BuildError;
use crate::parser::{SyntaxKind, SyntaxNode};

use super::literals::{build_literal, identifier_name, unquote};

pub fn build_expression(node: &SyntaxNode<'_>) -> Result<Expression, BuildError> {
    match node.kind {
        SyntaxKind::BinaryExpression => build_binary(node),
        SyntaxKind::ComparisonExpression => build_comparison(node),
        SyntaxKind::ArithmeticExpression => build_arithmetic(node),
        SyntaxKind::StringExpression => build_string_predicate(node),
        SyntaxKind::InExpression => build_in(node),
        SyntaxKind::BetweenExpression => build_between(node),
        SyntaxKind::ParenthesizedExpression => {
            let inner = expression_child(node, 0)?;
            Ok(Expression::Parenthesized(Box::new(build_expression(
                inner,
            )?)))
        }
        SyntaxKind::ConditionalExpression => build_conditional(node),
        SyntaxKind::TypeCastExpression => build_type_cast(node),
        SyntaxKind::FunctionCall => build_function_call(node),
        SyntaxKind::NamedArgument => build_named_argument(node),
        SyntaxKind::Identifier => Ok(Expression::Identifier(identifier_name(node)?)),
        SyntaxKind::QualifiedIdentifier => build_qualified(node),
        SyntaxKind::StringLiteral
        | SyntaxKind::NumberLiteral
        | SyntaxKind::BooleanLiteral
        | SyntaxKind::NullLiteral
        | SyntaxKind::DynamicLiteral
        | SyntaxKind::DatetimeLiteral
        | SyntaxKind::TimespanLiteral => Ok(Expression::Literal(build_literal(node)?)),
        other => Err(BuildError::unexpected("expression", other.name())),
    }
}

/// The n-th expression-kind child, skipping keyword and punctuation
/// tokens.
fn expression_child<'b, 'a>(
    node: &'b SyntaxNode<'a>,
    index: usize,
) -> Result<&'b SyntaxNode<'a>, BuildError> {
    node.children
        .iter()
        .filter(|c| c.kind.is_expression())
        .nth(index)
        .ok_or_else(|| BuildError::missing(node.kind.name(), "operand"))
}

fn operator_token<'b>(node: &'b SyntaxNode<'_>) -> Result<&'b str, BuildError> {
    node.children
        .iter()
        .find(|c| c.kind == SyntaxKind::Token)
        .map(|c| c.text)
        .ok_or_else(|| BuildError::missing(node.kind.name(), "operator"))
}

fn build_binary(node: &SyntaxNode<'_>) -> Result<Expression, BuildError> {
    let op = match operator_token(node)? {
        "and" => LogicalOp::And,
        "or" => LogicalOp::Or,
        other => return Err(BuildError::new(format!("unknown logical operator `{other}`"))),
    };
    Ok(Expression::Binary {
        op,
        left: Box::new(build_expression(expression_child(node, 0)?)?),
        right: Box::new(build_expression(expression_child(node, 1)?)?),
    })
}

fn build_comparison(node: &SyntaxNode<'_>) -> Result<Expression, BuildError> {
    let op = match operator_token(node)? {
        "==" => ComparisonOp::Eq,
        "!=" => ComparisonOp::Ne,
        ">" => ComparisonOp::Gt,
        "<" => ComparisonOp::Lt,
        ">=" => ComparisonOp::Gte,
        "<=" => ComparisonOp::Lte,
        other => {
            return Err(BuildError::new(format!(
                "unknown comparison operator `{other}`"
            )))
        }
    };
    Ok(Expression::Comparison {
        op,
        left: Box::new(build_expression(expression_child(node, 0)?)?),
        right: Box::new(build_expression(expression_child(node, 1)?)?),
    })
}

fn build_arithmetic(node: &SyntaxNode<'_>) -> Result<Expression, BuildError> {
    let op = match operator_token(node)? {
        "+" => ArithmeticOp::Add,
        "-" => ArithmeticOp::Sub,
        "*" => ArithmeticOp::Mul,
        "/" => ArithmeticOp::Div,
        "%" => ArithmeticOp::Rem,
        other => {
            return Err(BuildError::new(format!(
                "unknown arithmetic operator `{other}`"
            )))
        }
    };
    Ok(Expression::Arithmetic {
        op,
        left: Box::new(build_expression(expression_child(node, 0)?)?),
        right: Box::new(build_expression(expression_child(node, 1)?)?),
    })
}

fn build_string_predicate(node: &SyntaxNode<'_>) -> Result<Expression, BuildError> {
    let op = match operator_token(node)? {
        "contains" => StringOp::Contains,
        "startswith" => StringOp::StartsWith,
        "endswith" => StringOp::EndsWith,
        "matches" => StringOp::Matches,
        "has" => StringOp::Has,
        other => {
            return Err(BuildError::new(format!(
                "unknown string operator `{other}`"
            )))
        }
    };
    let left = node
        .child_of(SyntaxKind::Identifier)
        .ok_or_else(|| BuildError::missing("string_expression", "column"))?;
    let right = node
        .child_of(SyntaxKind::StringLiteral)
        .ok_or_else(|| BuildError::missing("string_expression", "string literal"))?;
    Ok(Expression::String {
        op,
        left: identifier_name(left)?,
        right: unquote(right.text).to_string(),
    })
}

fn build_in(node: &SyntaxNode<'_>) -> Result<Expression, BuildError> {
    let left = node
        .child_of(SyntaxKind::Identifier)
        .ok_or_else(|| BuildError::missing("in_expression", "column"))?;
    let list = node
        .child_of(SyntaxKind::LiteralList)
        .ok_or_else(|| BuildError::missing("in_expression", "literal list"))?;
    let values = list
        .children
        .iter()
        .map(build_literal)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Expression::In {
        left: identifier_name(left)?,
        values,
    })
}

fn build_between(node: &SyntaxNode<'_>) -> Result<Expression, BuildError> {
    // Expression children in order: column, lower bound, upper bound.
    let left = expression_child(node, 0)?;
    let min = expression_child(node, 1)?;
    let max = expression_child(node, 2)?;
    Ok(Expression::Between {
        left: identifier_name(left)?,
        min: Box::new(build_expression(min)?),
        max: Box::new(build_expression(max)?),
    })
}

fn build_conditional(node: &SyntaxNode<'_>) -> Result<Expression, BuildError> {
    let function = match operator_token(node)? {
        "iff" => ConditionalFn::Iff,
        "case" => ConditionalFn::Case,
        other => {
            return Err(BuildError::new(format!(
                "unknown conditional function `{other}`"
            )))
        }
    };
    Ok(Expression::Conditional {
        function,
        arguments: build_arguments(node)?,
    })
}

/// Both cast spellings land here: `tostring(expr)` leads with the
/// conversion keyword, `expr :: string` leads with the operand. The
/// target is normalized to the bare type name either way.
fn build_type_cast(node: &SyntaxNode<'_>) -> Result<Expression, BuildError> {
    let first = node
        .children
        .first()
        .ok_or_else(|| BuildError::missing("type_cast_expression", "operand"))?;
    if first.kind == SyntaxKind::Token {
        let target_type = first.text.strip_prefix("to").unwrap_or(first.text);
        let inner = expression_child(node, 0)?;
        return Ok(Expression::TypeCast {
            expression: Box::new(build_expression(inner)?),
            target_type: target_type.to_string(),
        });
    }
    let target = node
        .children
        .get(2)
        .ok_or_else(|| BuildError::missing("type_cast_expression", "target type"))?;
    Ok(Expression::TypeCast {
        expression: Box::new(build_expression(first)?),
        target_type: identifier_name(target)?.name,
    })
}

fn build_function_call(node: &SyntaxNode<'_>) -> Result<Expression, BuildError> {
    let name = node
        .child_of(SyntaxKind::Identifier)
        .ok_or_else(|| BuildError::missing("function_call", "name"))?;
    Ok(Expression::FunctionCall {
        name: identifier_name(name)?,
        arguments: build_arguments(node)?,
    })
}

fn build_arguments(node: &SyntaxNode<'_>) -> Result<Vec<Expression>, BuildError> {
    let list = node
        .child_of(SyntaxKind::ArgumentList)
        .ok_or_else(|| BuildError::missing(node.kind.name(), "argument list"))?;
    list.children.iter().map(build_expression).collect()
}

fn build_named_argument(node: &SyntaxNode<'_>) -> Result<Expression, BuildError> {
    let name = node
        .child_of(SyntaxKind::Identifier)
        .ok_or_else(|| BuildError::missing("named_argument", "name"))?;
    let value = node
        .children
        .iter()
        .filter(|c| c.kind.is_expression())
        .nth(1)
        .ok_or_else(|| BuildError::missing("named_argument", "value"))?;
    Ok(Expression::NamedArgument {
        name: identifier_name(name)?,
        value: Box::new(build_expression(value)?),
    })
}

fn build_qualified(node: &SyntaxNode<'_>) -> Result<Expression, BuildError> {
    let mut idents = node.children_of(SyntaxKind::Identifier);
    let table = idents
        .next()
        .ok_or_else(|| BuildError::missing("qualified_identifier", "table"))?;
    let column = idents
        .next()
        .ok_or_else(|| BuildError::missing("qualified_identifier", "column"))?;
    Ok(Expression::QualifiedIdentifier {
        table: identifier_name(table)?,
        column: identifier_name(column)?,
    })
}

/// One column-list entry: a bare column name or `name = expression`.
/// Computed entries without a name have nothing to project under, so
/// they are rejected here rather than at translation time.
pub fn build_column_expression(node: &SyntaxNode<'_>) -> Result<ColumnExpression, BuildError> {
    match node.kind {
        SyntaxKind::Identifier => Ok(ColumnExpression::Column(identifier_name(node)?)),
        SyntaxKind::ColumnAssignment => {
            let name = node
                .child_of(SyntaxKind::Identifier)
                .ok_or_else(|| BuildError::missing("column_assignment", "name"))?;
            let value = node
                .children
                .iter()
                .filter(|c| c.kind.is_expression())
                .nth(1)
                .ok_or_else(|| BuildError::missing("column_assignment", "value"))?;
            Ok(ColumnExpression::Assignment {
                name: identifier_name(name)?,
                value: build_expression(value)?,
            })
        }
        other => Err(BuildError::new(format!(
            "column list entry must be a column name or assignment, found {}",
            other.name()
        ))),
    }
}
