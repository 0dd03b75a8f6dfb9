use serde::{Deserialize, Serialize};

use crate::ast::expr::{ColumnExpression, Expression, Identifier};

/// One pipeline stage operator. Closed union: every `| <op>` form the
/// grammar accepts has exactly one variant here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operator {
    Where(WhereClause),
    Project(ProjectClause),
    ProjectAway(ProjectAwayClause),
    ProjectKeep(ProjectKeepClause),
    ProjectRename(ProjectRenameClause),
    ProjectReorder(ProjectReorderClause),
    Extend(ExtendClause),
    Summarize(SummarizeClause),
    Join(JoinClause),
    Union(UnionClause),
    Parse(ParseClause),
    MvExpand(MvExpandClause),
    Take(TakeClause),
    Limit(LimitClause),
    Sort(SortClause),
    Distinct(DistinctClause),
    Count(CountClause),
    Top(TopClause),
    Search(SearchClause),
}

impl Operator {
    /// The KQL keyword this stage was written with, for error messages.
    pub fn keyword(&self) -> &'static str {
        match self {
            Operator::Where(_) => "where",
            Operator::Project(_) => "project",
            Operator::ProjectAway(_) => "project-away",
            Operator::ProjectKeep(_) => "project-keep",
            Operator::ProjectRename(_) => "project-rename",
            Operator::ProjectReorder(_) => "project-reorder",
            Operator::Extend(_) => "extend",
            Operator::Summarize(_) => "summarize",
            Operator::Join(_) => "join",
            Operator::Union(_) => "union",
            Operator::Parse(_) => "parse",
            Operator::MvExpand(_) => "mv-expand",
            Operator::Take(_) => "take",
            Operator::Limit(_) => "limit",
            Operator::Sort(_) => "sort",
            Operator::Distinct(_) => "distinct",
            Operator::Count(_) => "count",
            Operator::Top(_) => "top",
            Operator::Search(_) => "search",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectClause {
    pub columns: Vec<ColumnExpression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAwayClause {
    pub columns: Vec<ColumnExpression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectKeepClause {
    pub columns: Vec<ColumnExpression>,
}

/// `project-rename new = old, ...` — every entry must be an assignment;
/// the builder rejects anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRenameClause {
    pub columns: Vec<ColumnExpression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectReorderClause {
    pub columns: Vec<ColumnExpression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendClause {
    pub columns: Vec<ColumnExpression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizeClause {
    pub aggregations: Vec<AggregationExpression>,
    pub by: Option<Vec<Expression>>,
}

/// One aggregation of a summarize stage, optionally named `alias = expr`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationExpression {
    pub name: Option<Identifier>,
    pub aggregation: Expression,
}

/// Join flavor. `inner` when the query omits `kind=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum JoinKind {
    #[default]
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
    LeftAnti,
    RightAnti,
    LeftSemi,
    RightSemi,
}

impl JoinKind {
    /// SQL join keyword(s) for this kind.
    pub fn sql_keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::LeftOuter => "LEFT OUTER",
            JoinKind::RightOuter => "RIGHT OUTER",
            JoinKind::FullOuter => "FULL OUTER",
            JoinKind::LeftAnti => "LEFT ANTI",
            JoinKind::RightAnti => "RIGHT ANTI",
            JoinKind::LeftSemi => "LEFT SEMI",
            JoinKind::RightSemi => "RIGHT SEMI",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinClause {
    pub kind: Option<JoinKind>,
    pub right_table: Identifier,
    pub conditions: Vec<JoinCondition>,
}

/// One equality condition of a join. A bare identifier in the source means
/// the same column name on both sides, so `left == right` there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinCondition {
    pub left: Identifier,
    pub right: Identifier,
}

/// Union flavor: `inner` keeps duplicates out (SQL `UNION`), `outer`
/// keeps them (SQL `UNION ALL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UnionKind {
    #[default]
    Inner,
    Outer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionClause {
    pub kind: Option<UnionKind>,
    pub isfuzzy: Option<bool>,
    pub tables: Vec<Identifier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ParseKind {
    #[default]
    Simple,
    Regex,
    Relaxed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseClause {
    pub kind: Option<ParseKind>,
    pub source: Expression,
    /// The pattern as written, separators and captures interleaved.
    pub pattern: String,
    /// The capture columns, in pattern order.
    pub columns: Vec<Identifier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MvExpandClause {
    pub column: Expression,
    /// Target type from `to typeof(T)`, identifier only.
    pub to: Option<Identifier>,
    pub limit: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeClause {
    pub count: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitClause {
    pub count: f64,
}

/// Sort direction; KQL defaults to ascending for `sort`, descending for
/// `top ... by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn sql_keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortClause {
    pub expressions: Vec<SortExpression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortExpression {
    pub column: Identifier,
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistinctClause {
    pub columns: Option<Vec<ColumnExpression>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CountClause {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopClause {
    pub count: f64,
    pub by: Option<TopBy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopBy {
    pub column: Identifier,
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchClause {
    pub columns: Option<Vec<ColumnExpression>>,
    pub term: String,
}
