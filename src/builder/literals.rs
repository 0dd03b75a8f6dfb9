//! Literal and identifier extraction from CST leaves.

use crate::ast::{Identifier, Literal};
use crate::error::BuildError;
use crate::parser::{SyntaxKind, SyntaxNode};

/// Strip one pair of matching quotes, if present.
pub fn unquote(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// The name an identifier node denotes. Bracketed identifiers carry their
/// name in a string literal child; bare ones are their own text.
pub fn identifier_name(node: &SyntaxNode<'_>) -> Result<Identifier, BuildError> {
    if node.kind != SyntaxKind::Identifier {
        return Err(BuildError::unexpected("identifier", node.kind.name()));
    }
    match node.child_of(SyntaxKind::StringLiteral) {
        Some(lit) => Ok(Identifier::new(unquote(lit.text))),
        None => Ok(Identifier::new(node.text)),
    }
}

pub fn number_value(node: &SyntaxNode<'_>) -> Result<f64, BuildError> {
    node.text
        .parse::<f64>()
        .map_err(|_| BuildError::new(format!("invalid number literal `{}`", node.text)))
}

pub fn build_literal(node: &SyntaxNode<'_>) -> Result<Literal, BuildError> {
    match node.kind {
        SyntaxKind::StringLiteral => Ok(Literal::String(unquote(node.text).to_string())),
        SyntaxKind::NumberLiteral => Ok(Literal::Number(number_value(node)?)),
        SyntaxKind::BooleanLiteral => Ok(Literal::Boolean(node.text == "true")),
        SyntaxKind::NullLiteral => Ok(Literal::Null),
        SyntaxKind::TimespanLiteral => Ok(Literal::Timespan(node.text.to_string())),
        SyntaxKind::DynamicLiteral => Ok(Literal::Dynamic(opaque_payload(node)?)),
        SyntaxKind::DatetimeLiteral => Ok(Literal::Datetime(opaque_payload(node)?)),
        other => Err(BuildError::unexpected("literal", other.name())),
    }
}

/// The verbatim payload of a `dynamic(...)` / `datetime(...)` literal.
/// The grammar stores it as the token between the parens.
fn opaque_payload(node: &SyntaxNode<'_>) -> Result<String, BuildError> {
    node.children
        .get(2)
        .filter(|c| c.kind == SyntaxKind::Token)
        .map(|c| c.text.to_string())
        .ok_or_else(|| BuildError::missing(node.kind.name(), "payload"))
}
