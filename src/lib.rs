//! Kuery: a KQL-style piped query language, translated to DuckDB SQL.
//!
//! A query is a table source followed by pipeline stages; each stage
//! lowers to one CTE over the previous relation:
//!
//! ```
//! let sql = kuery::transpile("Events | where Level > 3 | take 10")?;
//! assert_eq!(
//!     sql,
//!     "WITH cte_0 AS (SELECT * FROM Events WHERE Level > 3), \
//!      cte_1 AS (SELECT * FROM cte_0 LIMIT 10) \
//!      SELECT * FROM cte_1"
//! );
//! # Ok::<(), kuery::KqlError>(())
//! ```
//!
//! The pipeline has three stages, each a module: [`parser`] turns source
//! text into a concrete syntax tree (error-tolerant, for diagnostics),
//! [`builder`] turns that into a typed AST, and [`transpiler`] lowers the
//! AST to SQL. [`parse`] and [`transpile`] chain them.

pub mod ast;
pub mod builder;
pub mod error;
pub mod parser;
pub mod transpiler;

pub use error::{KqlError, KqlResult};
pub use transpiler::ToSql;

/// Common imports for library users.
pub mod prelude {
    pub use crate::ast::{Expression, Operator, SourceFile, Statement};
    pub use crate::error::{KqlError, KqlResult};
    pub use crate::transpiler::ToSql;
    pub use crate::{parse, transpile};
}

/// Parse source text into a typed AST, failing on any syntax error.
pub fn parse(input: &str) -> KqlResult<ast::SourceFile> {
    let root = parser::parse(input);
    let errors = parser::syntax_errors(&root);
    if !errors.is_empty() {
        return Err(KqlError::Syntax(errors));
    }
    Ok(builder::build_source_file(&root)?)
}

/// Translate source text all the way to SQL.
pub fn transpile(input: &str) -> KqlResult<String> {
    let file = parse(input)?;
    Ok(file.to_sql()?)
}
