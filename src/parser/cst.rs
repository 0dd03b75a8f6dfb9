//! Concrete syntax tree produced by the grammar.
//!
//! Nodes borrow their text from the source string; a node exposes its kind,
//! byte span, ordered children and first-child-of-kind lookup. Malformed
//! regions become [`SyntaxKind::Error`] nodes carrying a message, so a
//! single parse can report several diagnostics.

use nom::Offset;
use serde::{Deserialize, Serialize};

/// Byte offsets of a node within the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Every node kind the grammar produces. Closed: the builder matches this
/// exhaustively and the two are expected to stay in lock-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyntaxKind {
    SourceFile,
    LetStatement,
    QueryStatement,
    PipeExpression,
    TableName,
    // Operators
    WhereClause,
    ProjectClause,
    ProjectAwayClause,
    ProjectKeepClause,
    ProjectRenameClause,
    ProjectReorderClause,
    ExtendClause,
    SummarizeClause,
    AggregationList,
    AggregationExpression,
    ExpressionList,
    JoinClause,
    JoinKind,
    JoinConditions,
    JoinCondition,
    UnionClause,
    UnionKind,
    TableList,
    ParseClause,
    ParseKind,
    ParsePattern,
    MvExpandClause,
    TakeClause,
    LimitClause,
    SortClause,
    SortExpressionList,
    SortExpression,
    DistinctClause,
    CountClause,
    TopClause,
    SearchClause,
    ColumnList,
    ColumnAssignment,
    // Expressions
    BinaryExpression,
    ComparisonExpression,
    ArithmeticExpression,
    StringExpression,
    InExpression,
    BetweenExpression,
    ParenthesizedExpression,
    ConditionalExpression,
    TypeCastExpression,
    FunctionCall,
    ArgumentList,
    NamedArgument,
    Identifier,
    QualifiedIdentifier,
    LiteralList,
    StringLiteral,
    NumberLiteral,
    BooleanLiteral,
    NullLiteral,
    DynamicLiteral,
    DatetimeLiteral,
    TimespanLiteral,
    /// Keyword or punctuation token kept for shape checks.
    Token,
    /// Unparseable region; `message` is set.
    Error,
}

impl SyntaxKind {
    /// Stable snake_case name, used in builder error messages.
    pub fn name(&self) -> &'static str {
        match self {
            SyntaxKind::SourceFile => "source_file",
            SyntaxKind::LetStatement => "let_statement",
            SyntaxKind::QueryStatement => "query_statement",
            SyntaxKind::PipeExpression => "pipe_expression",
            SyntaxKind::TableName => "table_name",
            SyntaxKind::WhereClause => "where_clause",
            SyntaxKind::ProjectClause => "project_clause",
            SyntaxKind::ProjectAwayClause => "project_away_clause",
            SyntaxKind::ProjectKeepClause => "project_keep_clause",
            SyntaxKind::ProjectRenameClause => "project_rename_clause",
            SyntaxKind::ProjectReorderClause => "project_reorder_clause",
            SyntaxKind::ExtendClause => "extend_clause",
            SyntaxKind::SummarizeClause => "summarize_clause",
            SyntaxKind::AggregationList => "aggregation_list",
            SyntaxKind::AggregationExpression => "aggregation_expression",
            SyntaxKind::ExpressionList => "expression_list",
            SyntaxKind::JoinClause => "join_clause",
            SyntaxKind::JoinKind => "join_kind",
            SyntaxKind::JoinConditions => "join_conditions",
            SyntaxKind::JoinCondition => "join_condition",
            SyntaxKind::UnionClause => "union_clause",
            SyntaxKind::UnionKind => "union_kind",
            SyntaxKind::TableList => "table_list",
            SyntaxKind::ParseClause => "parse_clause",
            SyntaxKind::ParseKind => "parse_kind",
            SyntaxKind::ParsePattern => "parse_pattern",
            SyntaxKind::MvExpandClause => "mv_expand_clause",
            SyntaxKind::TakeClause => "take_clause",
            SyntaxKind::LimitClause => "limit_clause",
            SyntaxKind::SortClause => "sort_clause",
            SyntaxKind::SortExpressionList => "sort_expression_list",
            SyntaxKind::SortExpression => "sort_expression",
            SyntaxKind::DistinctClause => "distinct_clause",
            SyntaxKind::CountClause => "count_clause",
            SyntaxKind::TopClause => "top_clause",
            SyntaxKind::SearchClause => "search_clause",
            SyntaxKind::ColumnList => "column_list",
            SyntaxKind::ColumnAssignment => "column_assignment",
            SyntaxKind::BinaryExpression => "binary_expression",
            SyntaxKind::ComparisonExpression => "comparison_expression",
            SyntaxKind::ArithmeticExpression => "arithmetic_expression",
            SyntaxKind::StringExpression => "string_expression",
            SyntaxKind::InExpression => "in_expression",
            SyntaxKind::BetweenExpression => "between_expression",
            SyntaxKind::ParenthesizedExpression => "parenthesized_expression",
            SyntaxKind::ConditionalExpression => "conditional_expression",
            SyntaxKind::TypeCastExpression => "type_cast_expression",
            SyntaxKind::FunctionCall => "function_call",
            SyntaxKind::ArgumentList => "argument_list",
            SyntaxKind::NamedArgument => "named_argument",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::QualifiedIdentifier => "qualified_identifier",
            SyntaxKind::LiteralList => "literal_list",
            SyntaxKind::StringLiteral => "string_literal",
            SyntaxKind::NumberLiteral => "number_literal",
            SyntaxKind::BooleanLiteral => "boolean_literal",
            SyntaxKind::NullLiteral => "null_literal",
            SyntaxKind::DynamicLiteral => "dynamic_literal",
            SyntaxKind::DatetimeLiteral => "datetime_literal",
            SyntaxKind::TimespanLiteral => "timespan_literal",
            SyntaxKind::Token => "token",
            SyntaxKind::Error => "error",
        }
    }

    /// True for kinds that represent an expression form.
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            SyntaxKind::BinaryExpression
                | SyntaxKind::ComparisonExpression
                | SyntaxKind::ArithmeticExpression
                | SyntaxKind::StringExpression
                | SyntaxKind::InExpression
                | SyntaxKind::BetweenExpression
                | SyntaxKind::ParenthesizedExpression
                | SyntaxKind::ConditionalExpression
                | SyntaxKind::TypeCastExpression
                | SyntaxKind::FunctionCall
                | SyntaxKind::NamedArgument
                | SyntaxKind::Identifier
                | SyntaxKind::QualifiedIdentifier
                | SyntaxKind::StringLiteral
                | SyntaxKind::NumberLiteral
                | SyntaxKind::BooleanLiteral
                | SyntaxKind::NullLiteral
                | SyntaxKind::DynamicLiteral
                | SyntaxKind::DatetimeLiteral
                | SyntaxKind::TimespanLiteral
        )
    }
}

/// One CST node. `text` is the exact source slice the node covers,
/// interior trivia included; `span` is filled in after the parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntaxNode<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub span: Span,
    pub children: Vec<SyntaxNode<'a>>,
    /// Set on `Error` nodes only.
    pub message: Option<String>,
}

impl<'a> SyntaxNode<'a> {
    pub fn new(kind: SyntaxKind, text: &'a str, children: Vec<SyntaxNode<'a>>) -> Self {
        Self {
            kind,
            text,
            span: Span::default(),
            children,
            message: None,
        }
    }

    /// A keyword/punctuation leaf.
    pub fn token(text: &'a str) -> Self {
        Self::new(SyntaxKind::Token, text, Vec::new())
    }

    /// An unparseable region with a diagnostic message.
    pub fn error(text: &'a str, message: impl Into<String>) -> Self {
        Self {
            kind: SyntaxKind::Error,
            text,
            span: Span::default(),
            children: Vec::new(),
            message: Some(message.into()),
        }
    }

    /// First direct child of the given kind.
    pub fn child_of(&self, kind: SyntaxKind) -> Option<&SyntaxNode<'a>> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// All direct children of the given kind, in order.
    pub fn children_of(&self, kind: SyntaxKind) -> impl Iterator<Item = &SyntaxNode<'a>> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// True if a direct token child carries exactly this text.
    pub fn has_token(&self, text: &str) -> bool {
        self.children
            .iter()
            .any(|c| c.kind == SyntaxKind::Token && c.text == text)
    }

    pub fn is_error(&self) -> bool {
        self.kind == SyntaxKind::Error
    }

    /// True if this subtree contains any error node.
    pub fn has_errors(&self) -> bool {
        self.is_error() || self.children.iter().any(SyntaxNode::has_errors)
    }
}

/// Fill in byte spans for a whole tree. Safe because every node's `text`
/// is a subslice of `source`.
pub(crate) fn assign_spans(node: &mut SyntaxNode<'_>, source: &str) {
    let start = source.offset(node.text);
    node.span = Span {
        start,
        end: start + node.text.len(),
    };
    for child in &mut node.children {
        assign_spans(child, source);
    }
}
