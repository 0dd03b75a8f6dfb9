//! Per-stage SQL lowering: one `SELECT` over the previous relation.

use crate::ast::{
    ColumnExpression, DistinctClause, Expression, JoinClause, MvExpandClause, Operator,
    SearchClause, SortClause, SortDirection, SummarizeClause, TopClause, UnionClause, UnionKind,
};
use crate::error::TranslationError;

use super::expressions::sql_ident;
use super::Translator;

impl<'a> Translator<'a> {
    pub(crate) fn translate_operator(
        &self,
        operator: &Operator,
        input: &str,
    ) -> Result<String, TranslationError> {
        match operator {
            Operator::Where(clause) => {
                let condition = self.translate_expression(&clause.expression)?;
                Ok(format!("SELECT * FROM {input} WHERE {condition}"))
            }
            Operator::Project(clause) => {
                let columns = self.column_list(&clause.columns)?;
                Ok(format!("SELECT {columns} FROM {input}"))
            }
            Operator::ProjectAway(clause) => {
                let columns = plain_column_list(&clause.columns, "project-away")?;
                Ok(format!("SELECT * EXCLUDE ({columns}) FROM {input}"))
            }
            Operator::ProjectKeep(clause) => {
                let columns = plain_column_list(&clause.columns, "project-keep")?;
                Ok(format!("SELECT {columns} FROM {input}"))
            }
            Operator::ProjectRename(clause) => {
                let renames = rename_list(&clause.columns)?;
                Ok(format!("SELECT * RENAME ({renames}) FROM {input}"))
            }
            Operator::ProjectReorder(clause) => {
                let columns = plain_column_list(&clause.columns, "project-reorder")?;
                Ok(format!(
                    "SELECT {columns}, * EXCLUDE ({columns}) FROM {input}"
                ))
            }
            Operator::Extend(clause) => {
                let columns = self.column_list(&clause.columns)?;
                Ok(format!("SELECT *, {columns} FROM {input}"))
            }
            Operator::Summarize(clause) => self.translate_summarize(clause, input),
            Operator::Join(clause) => self.translate_join(clause, input),
            // Reached only when a union is not the active pipe; the query
            // translator short-circuits unions before this dispatch.
            Operator::Union(clause) => self.translate_union(clause, input),
            Operator::Parse(_) => Err(TranslationError::unsupported("the parse operator")),
            Operator::MvExpand(clause) => self.translate_mv_expand(clause, input),
            Operator::Take(clause) => Ok(format!(
                "SELECT * FROM {input} LIMIT {}",
                super::expressions::sql_number(clause.count)
            )),
            Operator::Limit(clause) => Ok(format!(
                "SELECT * FROM {input} LIMIT {}",
                super::expressions::sql_number(clause.count)
            )),
            Operator::Sort(clause) => self.translate_sort(clause, input),
            Operator::Distinct(clause) => self.translate_distinct(clause, input),
            Operator::Count(_) => Ok(format!("SELECT COUNT(*) AS Count FROM {input}")),
            Operator::Top(clause) => self.translate_top(clause, input),
            Operator::Search(clause) => self.translate_search(clause, input),
        }
    }

    fn column_list(&self, columns: &[ColumnExpression]) -> Result<String, TranslationError> {
        let parts = columns
            .iter()
            .map(|column| self.translate_column_expression(column))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join(", "))
    }

    pub(crate) fn translate_column_expression(
        &self,
        column: &ColumnExpression,
    ) -> Result<String, TranslationError> {
        match column {
            ColumnExpression::Column(name) => Ok(sql_ident(&name.name)),
            ColumnExpression::Assignment { name, value } => {
                let value = self.translate_expression(value)?;
                Ok(format!("{value} AS {}", sql_ident(&name.name)))
            }
        }
    }

    fn translate_summarize(
        &self,
        clause: &SummarizeClause,
        input: &str,
    ) -> Result<String, TranslationError> {
        let groups = match &clause.by {
            Some(exprs) => exprs
                .iter()
                .map(|expr| self.translate_expression(expr))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        let mut select_list = groups.clone();
        for agg in &clause.aggregations {
            let expr = self.translate_expression(&agg.aggregation)?;
            match &agg.name {
                Some(name) => select_list.push(format!("{expr} AS {}", sql_ident(&name.name))),
                None => select_list.push(expr),
            }
        }
        let group_by = if groups.is_empty() {
            String::new()
        } else {
            format!(" GROUP BY {}", groups.join(", "))
        };
        Ok(format!(
            "SELECT {} FROM {input}{group_by}",
            select_list.join(", ")
        ))
    }

    fn translate_join(
        &self,
        clause: &JoinClause,
        input: &str,
    ) -> Result<String, TranslationError> {
        let kind = clause.kind.unwrap_or_default();
        let right = sql_ident(&clause.right_table.name);
        let on = clause
            .conditions
            .iter()
            .map(|condition| {
                format!(
                    "{input}.{} = {right}.{}",
                    sql_ident(&condition.left.name),
                    sql_ident(&condition.right.name)
                )
            })
            .collect::<Vec<_>>()
            .join(" AND ");
        Ok(format!(
            "SELECT * FROM {input} {} JOIN {right} ON {on}",
            kind.sql_keyword()
        ))
    }

    pub(crate) fn translate_union(
        &self,
        clause: &UnionClause,
        source: &str,
    ) -> Result<String, TranslationError> {
        let separator = match clause.kind {
            Some(UnionKind::Outer) => "\nUNION ALL\n",
            _ => "\nUNION\n",
        };
        let mut selects = vec![format!("SELECT * FROM {source}")];
        for table in &clause.tables {
            selects.push(format!("SELECT * FROM {}", sql_ident(&table.name)));
        }
        Ok(selects.join(separator))
    }

    fn translate_mv_expand(
        &self,
        clause: &MvExpandClause,
        input: &str,
    ) -> Result<String, TranslationError> {
        let column = self.translate_expression(&clause.column)?;
        let mut sql = format!("SELECT * FROM {input}, UNNEST({column}) AS expanded_value");
        if let Some(limit) = clause.limit {
            sql.push_str(&format!(" LIMIT {}", super::expressions::sql_number(limit)));
        }
        Ok(sql)
    }

    fn translate_sort(
        &self,
        clause: &SortClause,
        input: &str,
    ) -> Result<String, TranslationError> {
        let order_by = clause
            .expressions
            .iter()
            .map(|expr| {
                let direction = expr.direction.unwrap_or(SortDirection::Asc);
                format!("{} {}", sql_ident(&expr.column.name), direction.sql_keyword())
            })
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("SELECT * FROM {input} ORDER BY {order_by}"))
    }

    fn translate_distinct(
        &self,
        clause: &DistinctClause,
        input: &str,
    ) -> Result<String, TranslationError> {
        match &clause.columns {
            Some(columns) if !columns.is_empty() => {
                let columns = self.column_list(columns)?;
                Ok(format!("SELECT DISTINCT {columns} FROM {input}"))
            }
            _ => Ok(format!("SELECT DISTINCT * FROM {input}")),
        }
    }

    fn translate_top(&self, clause: &TopClause, input: &str) -> Result<String, TranslationError> {
        let count = super::expressions::sql_number(clause.count);
        match &clause.by {
            Some(by) => {
                // `top ... by` defaults to descending, unlike `sort`.
                let direction = by.direction.unwrap_or(SortDirection::Desc);
                Ok(format!(
                    "SELECT * FROM {input} ORDER BY {} {} LIMIT {count}",
                    sql_ident(&by.column.name),
                    direction.sql_keyword()
                ))
            }
            None => Ok(format!("SELECT * FROM {input} LIMIT {count}")),
        }
    }

    fn translate_search(
        &self,
        clause: &SearchClause,
        input: &str,
    ) -> Result<String, TranslationError> {
        let columns = match &clause.columns {
            Some(columns) if !columns.is_empty() => columns,
            _ => {
                return Err(TranslationError::new(
                    "search without specific columns requires schema metadata; \
                     specify columns with search in (col1, col2) 'term'",
                ))
            }
        };
        let term = format!("'%{}%'", clause.term.replace('\'', "''"));
        let conditions = columns
            .iter()
            .map(|column| {
                let name = match column {
                    ColumnExpression::Column(name) => sql_ident(&name.name),
                    ColumnExpression::Assignment { name, .. } => sql_ident(&name.name),
                };
                format!("LOWER({name}) LIKE LOWER({term})")
            })
            .collect::<Vec<_>>()
            .join(" OR ");
        Ok(format!("SELECT * FROM {input} WHERE {conditions}"))
    }
}

/// Column names only; computed entries have no meaning for the star
/// modifier forms.
fn plain_column_list(
    columns: &[ColumnExpression],
    operator: &str,
) -> Result<String, TranslationError> {
    let parts = columns
        .iter()
        .map(|column| match column {
            ColumnExpression::Column(name) => Ok(sql_ident(&name.name)),
            ColumnExpression::Assignment { .. } => Err(TranslationError::new(format!(
                "{operator} takes column names only"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join(", "))
}

/// `old AS new` pairs for the `RENAME` star modifier. Each entry arrives
/// as `new = old`, so the sides swap here.
fn rename_list(columns: &[ColumnExpression]) -> Result<String, TranslationError> {
    let parts = columns
        .iter()
        .map(|column| match column {
            ColumnExpression::Assignment {
                name,
                value: Expression::Identifier(old),
            } => Ok(format!("{} AS {}", sql_ident(&old.name), sql_ident(&name.name))),
            _ => Err(TranslationError::new(
                "project-rename entries must rename one column to another",
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join(", "))
}
