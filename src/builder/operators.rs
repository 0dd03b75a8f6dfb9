//! CST operator clauses to typed [`Operator`] values.

use crate::ast::{
    AggregationExpression, ColumnExpression, CountClause, DistinctClause, ExtendClause,
    Identifier, JoinClause, JoinCondition, JoinKind, LimitClause, MvExpandClause, Operator,
    ParseClause, ParseKind, ProjectAwayClause, ProjectClause, ProjectKeepClause,
    ProjectRenameClause, ProjectReorderClause, SearchClause, SortClause, SortDirection,
    SortExpression, SummarizeClause, TakeClause, TopBy, TopClause, UnionClause, UnionKind,
    WhereClause,
};
use crate::error::BuildError;
use crate::parser::{SyntaxKind, SyntaxNode};

use super::expressions::{build_column_expression, build_expression};
use super::literals::{identifier_name, number_value, unquote};

pub fn build_operator(node: &SyntaxNode<'_>) -> Result<Operator, BuildError> {
    match node.kind {
        SyntaxKind::WhereClause => Ok(Operator::Where(WhereClause {
            expression: build_expression(clause_expression(node)?)?,
        })),
        SyntaxKind::ProjectClause => Ok(Operator::Project(ProjectClause {
            columns: clause_columns(node)?,
        })),
        SyntaxKind::ProjectAwayClause => Ok(Operator::ProjectAway(ProjectAwayClause {
            columns: clause_columns(node)?,
        })),
        SyntaxKind::ProjectKeepClause => Ok(Operator::ProjectKeep(ProjectKeepClause {
            columns: clause_columns(node)?,
        })),
        SyntaxKind::ProjectRenameClause => {
            let columns = clause_columns(node)?;
            if columns
                .iter()
                .any(|c| !matches!(c, ColumnExpression::Assignment { .. }))
            {
                return Err(BuildError::new(
                    "project-rename entries must be `new = old` assignments",
                ));
            }
            Ok(Operator::ProjectRename(ProjectRenameClause { columns }))
        }
        SyntaxKind::ProjectReorderClause => Ok(Operator::ProjectReorder(ProjectReorderClause {
            columns: clause_columns(node)?,
        })),
        SyntaxKind::ExtendClause => Ok(Operator::Extend(ExtendClause {
            columns: clause_columns(node)?,
        })),
        SyntaxKind::SummarizeClause => build_summarize(node),
        SyntaxKind::JoinClause => build_join(node),
        SyntaxKind::UnionClause => build_union(node),
        SyntaxKind::ParseClause => build_parse(node),
        SyntaxKind::MvExpandClause => build_mv_expand(node),
        SyntaxKind::TakeClause => Ok(Operator::Take(TakeClause {
            count: clause_count(node)?,
        })),
        SyntaxKind::LimitClause => Ok(Operator::Limit(LimitClause {
            count: clause_count(node)?,
        })),
        SyntaxKind::SortClause => build_sort(node),
        SyntaxKind::DistinctClause => build_distinct(node),
        SyntaxKind::CountClause => Ok(Operator::Count(CountClause::default())),
        SyntaxKind::TopClause => build_top(node),
        SyntaxKind::SearchClause => build_search(node),
        other => Err(BuildError::unexpected("pipe expression", other.name())),
    }
}

fn clause_expression<'b, 'a>(node: &'b SyntaxNode<'a>) -> Result<&'b SyntaxNode<'a>, BuildError> {
    node.children
        .iter()
        .find(|c| c.kind.is_expression())
        .ok_or_else(|| BuildError::missing(node.kind.name(), "expression"))
}

fn clause_columns(node: &SyntaxNode<'_>) -> Result<Vec<ColumnExpression>, BuildError> {
    let list = node
        .child_of(SyntaxKind::ColumnList)
        .ok_or_else(|| BuildError::missing(node.kind.name(), "column list"))?;
    list.children.iter().map(build_column_expression).collect()
}

fn clause_count(node: &SyntaxNode<'_>) -> Result<f64, BuildError> {
    let count = node
        .child_of(SyntaxKind::NumberLiteral)
        .ok_or_else(|| BuildError::missing(node.kind.name(), "row count"))?;
    number_value(count)
}

fn build_summarize(node: &SyntaxNode<'_>) -> Result<Operator, BuildError> {
    let list = node
        .child_of(SyntaxKind::AggregationList)
        .ok_or_else(|| BuildError::missing("summarize_clause", "aggregation list"))?;
    let aggregations = list
        .children
        .iter()
        .map(build_aggregation)
        .collect::<Result<Vec<_>, _>>()?;
    let by = match node.child_of(SyntaxKind::ExpressionList) {
        Some(exprs) => Some(
            exprs
                .children
                .iter()
                .map(build_expression)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        None => None,
    };
    Ok(Operator::Summarize(SummarizeClause { aggregations, by }))
}

fn build_aggregation(node: &SyntaxNode<'_>) -> Result<AggregationExpression, BuildError> {
    if node.kind != SyntaxKind::AggregationExpression {
        return Err(BuildError::unexpected("aggregation list", node.kind.name()));
    }
    if node.has_token("=") {
        let name = node
            .children
            .first()
            .filter(|c| c.kind == SyntaxKind::Identifier)
            .ok_or_else(|| BuildError::missing("aggregation_expression", "alias"))?;
        let value = node
            .children
            .last()
            .ok_or_else(|| BuildError::missing("aggregation_expression", "value"))?;
        return Ok(AggregationExpression {
            name: Some(identifier_name(name)?),
            aggregation: build_expression(value)?,
        });
    }
    let value = node
        .children
        .first()
        .ok_or_else(|| BuildError::missing("aggregation_expression", "value"))?;
    Ok(AggregationExpression {
        name: None,
        aggregation: build_expression(value)?,
    })
}

fn build_join(node: &SyntaxNode<'_>) -> Result<Operator, BuildError> {
    let kind = match node.child_of(SyntaxKind::JoinKind) {
        Some(kind_node) => Some(join_kind(kind_node)?),
        None => None,
    };
    let right_table = table_identifier(node)?;
    let conditions_node = node
        .child_of(SyntaxKind::JoinConditions)
        .ok_or_else(|| BuildError::missing("join_clause", "on conditions"))?;
    let conditions = conditions_node
        .children
        .iter()
        .map(join_condition)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Operator::Join(JoinClause {
        kind,
        right_table,
        conditions,
    }))
}

fn join_kind(node: &SyntaxNode<'_>) -> Result<JoinKind, BuildError> {
    let flavor = node
        .child_of(SyntaxKind::Identifier)
        .ok_or_else(|| BuildError::missing("join kind", "flavor"))?;
    match flavor.text {
        "inner" => Ok(JoinKind::Inner),
        "leftouter" => Ok(JoinKind::LeftOuter),
        "rightouter" => Ok(JoinKind::RightOuter),
        "fullouter" => Ok(JoinKind::FullOuter),
        "leftanti" => Ok(JoinKind::LeftAnti),
        "rightanti" => Ok(JoinKind::RightAnti),
        "leftsemi" => Ok(JoinKind::LeftSemi),
        "rightsemi" => Ok(JoinKind::RightSemi),
        other => Err(BuildError::new(format!("unknown join kind `{other}`"))),
    }
}

fn join_condition(node: &SyntaxNode<'_>) -> Result<JoinCondition, BuildError> {
    let columns: Vec<&SyntaxNode<'_>> = node.children_of(SyntaxKind::Identifier).collect();
    match columns.as_slice() {
        // A bare column means the same name on both sides.
        [column] => {
            let name = identifier_name(column)?;
            Ok(JoinCondition {
                left: name.clone(),
                right: name,
            })
        }
        [left, right] => Ok(JoinCondition {
            left: identifier_name(left)?,
            right: identifier_name(right)?,
        }),
        _ => Err(BuildError::unexpected(
            "join condition",
            node.kind.name(),
        )),
    }
}

fn table_identifier(node: &SyntaxNode<'_>) -> Result<Identifier, BuildError> {
    let table = node
        .child_of(SyntaxKind::TableName)
        .ok_or_else(|| BuildError::missing(node.kind.name(), "table name"))?;
    let name = table
        .child_of(SyntaxKind::Identifier)
        .ok_or_else(|| BuildError::missing("table_name", "identifier"))?;
    identifier_name(name)
}

fn build_union(node: &SyntaxNode<'_>) -> Result<Operator, BuildError> {
    let kind = match node.child_of(SyntaxKind::UnionKind) {
        Some(kind_node) => {
            let flavor = kind_node
                .child_of(SyntaxKind::Identifier)
                .ok_or_else(|| BuildError::missing("union kind", "flavor"))?;
            match flavor.text {
                "inner" => Some(UnionKind::Inner),
                "outer" => Some(UnionKind::Outer),
                other => {
                    return Err(BuildError::new(format!("unknown union kind `{other}`")))
                }
            }
        }
        None => None,
    };
    let isfuzzy = if node.has_token("isfuzzy") {
        let flag = node
            .child_of(SyntaxKind::BooleanLiteral)
            .ok_or_else(|| BuildError::missing("union_clause", "isfuzzy value"))?;
        Some(flag.text == "true")
    } else {
        None
    };
    let list = node
        .child_of(SyntaxKind::TableList)
        .ok_or_else(|| BuildError::missing("union_clause", "table list"))?;
    let tables = list
        .children
        .iter()
        .map(|table| {
            let name = table
                .child_of(SyntaxKind::Identifier)
                .ok_or_else(|| BuildError::missing("table_name", "identifier"))?;
            identifier_name(name)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Operator::Union(UnionClause {
        kind,
        isfuzzy,
        tables,
    }))
}

fn build_parse(node: &SyntaxNode<'_>) -> Result<Operator, BuildError> {
    let kind = match node.child_of(SyntaxKind::ParseKind) {
        Some(kind_node) => {
            let flavor = kind_node
                .child_of(SyntaxKind::Identifier)
                .ok_or_else(|| BuildError::missing("parse kind", "flavor"))?;
            match flavor.text {
                "simple" => Some(ParseKind::Simple),
                "regex" => Some(ParseKind::Regex),
                "relaxed" => Some(ParseKind::Relaxed),
                other => {
                    return Err(BuildError::new(format!("unknown parse kind `{other}`")))
                }
            }
        }
        None => None,
    };
    let source = clause_expression(node)?;
    let pattern = node
        .child_of(SyntaxKind::ParsePattern)
        .ok_or_else(|| BuildError::missing("parse_clause", "pattern"))?;
    let columns = pattern
        .children_of(SyntaxKind::Identifier)
        .map(identifier_name)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Operator::Parse(ParseClause {
        kind,
        source: build_expression(source)?,
        pattern: pattern.text.to_string(),
        columns,
    }))
}

fn build_mv_expand(node: &SyntaxNode<'_>) -> Result<Operator, BuildError> {
    let column = clause_expression(node)?;
    let to = if node.has_token("typeof") {
        let target = node
            .children_of(SyntaxKind::Identifier)
            .last()
            .ok_or_else(|| BuildError::missing("mv_expand_clause", "typeof target"))?;
        Some(identifier_name(target)?)
    } else {
        None
    };
    let limit = if node.has_token("limit") {
        let count = node
            .children_of(SyntaxKind::NumberLiteral)
            .last()
            .ok_or_else(|| BuildError::missing("mv_expand_clause", "limit value"))?;
        Some(number_value(count)?)
    } else {
        None
    };
    Ok(Operator::MvExpand(MvExpandClause {
        column: build_expression(column)?,
        to,
        limit,
    }))
}

fn build_sort(node: &SyntaxNode<'_>) -> Result<Operator, BuildError> {
    let list = node
        .child_of(SyntaxKind::SortExpressionList)
        .ok_or_else(|| BuildError::missing("sort_clause", "sort expressions"))?;
    let expressions = list
        .children
        .iter()
        .map(|entry| {
            let column = entry
                .child_of(SyntaxKind::Identifier)
                .ok_or_else(|| BuildError::missing("sort_expression", "column"))?;
            Ok(SortExpression {
                column: identifier_name(column)?,
                direction: sort_direction(entry),
            })
        })
        .collect::<Result<Vec<_>, BuildError>>()?;
    Ok(Operator::Sort(SortClause { expressions }))
}

fn sort_direction(node: &SyntaxNode<'_>) -> Option<SortDirection> {
    if node.has_token("asc") {
        Some(SortDirection::Asc)
    } else if node.has_token("desc") {
        Some(SortDirection::Desc)
    } else {
        None
    }
}

fn build_distinct(node: &SyntaxNode<'_>) -> Result<Operator, BuildError> {
    // `distinct *` carries no column list.
    let columns = match node.child_of(SyntaxKind::ColumnList) {
        Some(_) => Some(clause_columns(node)?),
        None => None,
    };
    Ok(Operator::Distinct(DistinctClause { columns }))
}

fn build_top(node: &SyntaxNode<'_>) -> Result<Operator, BuildError> {
    let count = clause_count(node)?;
    let by = if node.has_token("by") {
        let column = node
            .child_of(SyntaxKind::Identifier)
            .ok_or_else(|| BuildError::missing("top_clause", "by column"))?;
        Some(TopBy {
            column: identifier_name(column)?,
            direction: sort_direction(node),
        })
    } else {
        None
    };
    Ok(Operator::Top(TopClause { count, by }))
}

fn build_search(node: &SyntaxNode<'_>) -> Result<Operator, BuildError> {
    let columns = match node.child_of(SyntaxKind::ColumnList) {
        Some(list) => Some(
            list.children
                .iter()
                .map(build_column_expression)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        None => None,
    };
    let term = node
        .child_of(SyntaxKind::StringLiteral)
        .ok_or_else(|| BuildError::missing("search_clause", "term"))?;
    Ok(Operator::Search(SearchClause {
        columns,
        term: unquote(term.text).to_string(),
    }))
}
