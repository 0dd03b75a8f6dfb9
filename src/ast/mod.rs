//! Typed KQL abstract syntax tree.
//!
//! Built from the concrete syntax tree by [`crate::builder`] and consumed
//! once by [`crate::transpiler`]. The tree is ephemeral: it is constructed
//! per query and discarded after the SQL string is emitted.

pub mod expr;
pub mod operators;
pub mod statements;

pub use self::expr::{
    ArithmeticOp, ColumnExpression, ComparisonOp, ConditionalFn, Expression, Identifier, Literal,
    LogicalOp, StringOp,
};
pub use self::operators::{
    AggregationExpression, CountClause, DistinctClause, ExtendClause, JoinClause, JoinCondition,
    JoinKind, LimitClause, MvExpandClause, Operator, ParseClause, ParseKind, ProjectAwayClause,
    ProjectClause, ProjectKeepClause, ProjectRenameClause, ProjectReorderClause, SearchClause,
    SortClause, SortDirection, SortExpression, SummarizeClause, TakeClause, TopBy, TopClause,
    UnionClause, UnionKind, WhereClause,
};
pub use self::statements::{LetStatement, PipeExpression, QueryStatement, SourceFile, Statement};
