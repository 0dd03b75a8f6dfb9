//! KQL grammar, realized as nom combinators over the source text.
//!
//! [`parse`] always returns a tree: malformed regions surface as error
//! nodes rather than failing the whole parse, and [`syntax_errors`]
//! flattens those into located diagnostics.

mod cst;
mod expressions;
mod operators;
mod statements;
mod tokens;

#[cfg(test)]
mod tests;

pub use cst::{Span, SyntaxKind, SyntaxNode};

use crate::error::SyntaxError;

/// Parse a whole source text into a concrete syntax tree with spans.
pub fn parse(source: &str) -> SyntaxNode<'_> {
    let mut root = statements::source_file(source);
    cst::assign_spans(&mut root, source);
    root
}

/// Collect every error node in the tree as a located diagnostic.
pub fn syntax_errors(root: &SyntaxNode<'_>) -> Vec<SyntaxError> {
    let mut errors = Vec::new();
    collect_errors(root, &mut errors);
    errors
}

fn collect_errors(node: &SyntaxNode<'_>, out: &mut Vec<SyntaxError>) {
    if node.is_error() {
        let message = node.message.as_deref().unwrap_or("syntax error");
        out.push(SyntaxError::new(node.span, message));
    }
    for child in &node.children {
        collect_errors(child, out);
    }
}
