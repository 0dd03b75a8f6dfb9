//! SQL generation for the typed KQL tree.
//!
//! Each pipeline stage becomes one CTE over the previous relation, so a
//! query lowers to `WITH cte_0 AS (...), cte_1 AS (...) SELECT * FROM
//! cte_n`. The DuckDB dialect is assumed throughout: `EXCLUDE`/`RENAME`
//! star modifiers, `UNNEST`, `REGEXP` and `STRING_SPLIT` all come from
//! there.

mod expressions;
mod functions;
mod operators;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use crate::ast::{Expression, Operator, QueryStatement, SourceFile, Statement};
use crate::error::TranslationError;

/// Trait for converting AST nodes to SQL.
pub trait ToSql {
    fn to_sql(&self) -> Result<String, TranslationError>;
}

impl ToSql for SourceFile {
    /// Translate a whole file. `let` bindings feed the environment; the
    /// last query statement is the one translated. An empty file is an
    /// empty string, and bindings with no query to use them are an error.
    fn to_sql(&self) -> Result<String, TranslationError> {
        if self.statements.is_empty() {
            return Ok(String::new());
        }
        let mut translator = Translator::default();
        let mut query: Option<&QueryStatement> = None;
        for statement in &self.statements {
            match statement {
                Statement::Let(binding) => {
                    translator.bind(&binding.name.name, &binding.value);
                }
                Statement::Query(q) => query = Some(q),
            }
        }
        let query = query.ok_or_else(|| TranslationError::new("no query statement found"))?;
        translator.translate_query(query)
    }
}

/// One translation pass. The environment is scoped to a single call so
/// concurrent translations never observe each other's bindings.
#[derive(Debug, Default)]
pub(crate) struct Translator<'a> {
    env: HashMap<&'a str, &'a Expression>,
}

impl<'a> Translator<'a> {
    fn bind(&mut self, name: &'a str, value: &'a Expression) {
        self.env.insert(name, value);
    }

    pub(crate) fn binding(&self, name: &str) -> Option<&'a Expression> {
        self.env.get(name).copied()
    }

    fn translate_query(&self, query: &QueryStatement) -> Result<String, TranslationError> {
        let table = expressions::sql_ident(&query.table.name);
        let mut ctes: Vec<String> = Vec::new();
        let mut current = table.clone();

        for (index, pipe) in query.pipes.iter().enumerate() {
            // A union replaces the whole pipeline with a set operation
            // over the source tables.
            if let Operator::Union(union) = &pipe.operator {
                return self.translate_union(union, &table);
            }
            let sql = self.translate_operator(&pipe.operator, &current)?;
            current = format!("cte_{index}");
            ctes.push(format!("{current} AS ({sql})"));
        }

        if ctes.is_empty() {
            return Ok(format!("SELECT * FROM {table}"));
        }
        Ok(format!("WITH {} SELECT * FROM {current}", ctes.join(", ")))
    }
}
