use super::*;

fn single_query(source: &str) -> SyntaxNode<'_> {
    let root = parse(source);
    assert_eq!(root.kind, SyntaxKind::SourceFile);
    assert_eq!(root.children.len(), 1, "expected one statement");
    root.children[0].clone()
}

fn first_clause(source: &str) -> SyntaxNode<'_> {
    let query = single_query(source);
    assert_eq!(query.kind, SyntaxKind::QueryStatement);
    let pipe = query
        .child_of(SyntaxKind::PipeExpression)
        .expect("pipe expression");
    pipe.children[1].clone()
}

// ========================================================================
// Statements
// ========================================================================

#[test]
fn test_simple_query_shape() {
    let query = single_query("Table | where Col > 10");
    assert_eq!(query.kind, SyntaxKind::QueryStatement);
    let table = query.child_of(SyntaxKind::TableName).expect("table name");
    assert_eq!(table.text, "Table");
    assert_eq!(query.children_of(SyntaxKind::PipeExpression).count(), 1);
    assert!(!query.has_errors());
}

#[test]
fn test_bare_table_is_a_query() {
    let query = single_query("Events");
    assert_eq!(query.kind, SyntaxKind::QueryStatement);
    assert_eq!(query.children_of(SyntaxKind::PipeExpression).count(), 0);
}

#[test]
fn test_let_statement() {
    let root = parse("let threshold = 10;\nEvents | where Level > threshold");
    assert_eq!(root.children.len(), 2);
    let binding = &root.children[0];
    assert_eq!(binding.kind, SyntaxKind::LetStatement);
    let name = binding.child_of(SyntaxKind::Identifier).expect("name");
    assert_eq!(name.text, "threshold");
    assert_eq!(root.children[1].kind, SyntaxKind::QueryStatement);
}

#[test]
fn test_bracketed_table_name() {
    let query = single_query("['my table'] | count");
    let table = query.child_of(SyntaxKind::TableName).expect("table name");
    assert_eq!(table.text, "['my table']");
}

#[test]
fn test_comments_are_trivia() {
    let root = parse("// leading note\nEvents | count /* tail */");
    assert_eq!(root.children.len(), 1);
    assert!(!root.has_errors());
}

#[test]
fn test_spans_cover_the_statement() {
    let source = "Table | take 5";
    let query = single_query(source);
    assert_eq!(query.span, Span { start: 0, end: source.len() });
    let table = query.child_of(SyntaxKind::TableName).expect("table name");
    assert_eq!(table.span, Span { start: 0, end: 5 });
}

// ========================================================================
// Error recovery
// ========================================================================

#[test]
fn test_malformed_statement_becomes_error_node() {
    let root = parse("Table | where ; Other | take 5");
    assert!(root.has_errors());
    let errors = syntax_errors(&root);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "malformed statement");
    // Recovery resumes after the separator.
    assert_eq!(
        root.children_of(SyntaxKind::QueryStatement).count(),
        2
    );
}

#[test]
fn test_garbage_input_is_one_error() {
    let root = parse("%%%");
    let errors = syntax_errors(&root);
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_empty_input_parses_to_empty_file() {
    let root = parse("   \n  ");
    assert_eq!(root.kind, SyntaxKind::SourceFile);
    assert!(root.children.is_empty());
}

// ========================================================================
// Operators
// ========================================================================

#[test]
fn test_project_column_list() {
    let clause = first_clause("T | project A, B = C + 1");
    assert_eq!(clause.kind, SyntaxKind::ProjectClause);
    let list = clause.child_of(SyntaxKind::ColumnList).expect("columns");
    assert_eq!(list.children.len(), 2);
    assert_eq!(list.children[0].kind, SyntaxKind::Identifier);
    assert_eq!(list.children[1].kind, SyntaxKind::ColumnAssignment);
}

#[test]
fn test_hyphenated_project_forms_win() {
    assert_eq!(
        first_clause("T | project-away Secret").kind,
        SyntaxKind::ProjectAwayClause
    );
    assert_eq!(
        first_clause("T | project-rename New = Old").kind,
        SyntaxKind::ProjectRenameClause
    );
}

#[test]
fn test_summarize_with_by() {
    let clause = first_clause("T | summarize Total = count() by Region");
    assert_eq!(clause.kind, SyntaxKind::SummarizeClause);
    let aggs = clause
        .child_of(SyntaxKind::AggregationList)
        .expect("aggregations");
    assert_eq!(aggs.children.len(), 1);
    assert!(clause.has_token("by"));
    let by = clause
        .child_of(SyntaxKind::ExpressionList)
        .expect("by list");
    assert_eq!(by.children.len(), 1);
}

#[test]
fn test_join_with_kind_and_qualified_condition() {
    let clause = first_clause("T | join kind=leftouter (Other) on $left.Id == $right.UserId");
    assert_eq!(clause.kind, SyntaxKind::JoinClause);
    let kind = clause.child_of(SyntaxKind::JoinKind).expect("join kind");
    let flavor = kind.child_of(SyntaxKind::Identifier).expect("flavor");
    assert_eq!(flavor.text, "leftouter");
    let conditions = clause
        .child_of(SyntaxKind::JoinConditions)
        .expect("conditions");
    let condition = &conditions.children[0];
    let columns: Vec<_> = condition
        .children_of(SyntaxKind::Identifier)
        .map(|c| c.text)
        .collect();
    assert_eq!(columns, vec!["Id", "UserId"]);
}

#[test]
fn test_join_with_bare_table_and_plain_condition() {
    let clause = first_clause("Table1 | join kind=inner Table2 on Id == Id");
    assert_eq!(clause.kind, SyntaxKind::JoinClause);
    let table = clause.child_of(SyntaxKind::TableName).expect("table");
    assert_eq!(table.text, "Table2");
    let conditions = clause
        .child_of(SyntaxKind::JoinConditions)
        .expect("conditions");
    let columns: Vec<_> = conditions.children[0]
        .children_of(SyntaxKind::Identifier)
        .map(|c| c.text)
        .collect();
    assert_eq!(columns, vec!["Id", "Id"]);
}

#[test]
fn test_union_with_kind_and_tables() {
    let clause = first_clause("T | union kind=outer Other, Third");
    assert_eq!(clause.kind, SyntaxKind::UnionClause);
    let tables = clause.child_of(SyntaxKind::TableList).expect("tables");
    assert_eq!(tables.children.len(), 2);
}

#[test]
fn test_sort_and_order_are_the_same_clause() {
    let sorted = first_clause("T | sort by Name asc, Age desc");
    assert_eq!(sorted.kind, SyntaxKind::SortClause);
    let list = sorted
        .child_of(SyntaxKind::SortExpressionList)
        .expect("sort list");
    assert_eq!(list.children.len(), 2);
    assert!(list.children[1].has_token("desc"));

    let ordered = first_clause("T | order by Name");
    assert_eq!(ordered.kind, SyntaxKind::SortClause);
}

#[test]
fn test_sort_without_by() {
    let clause = first_clause("T | sort Timestamp desc");
    assert_eq!(clause.kind, SyntaxKind::SortClause);
    assert!(!clause.has_token("by"));
    let list = clause
        .child_of(SyntaxKind::SortExpressionList)
        .expect("sort list");
    assert!(list.children[0].has_token("desc"));
}

#[test]
fn test_distinct_star_and_columns() {
    let star = first_clause("T | distinct *");
    assert!(star.has_token("*"));
    assert!(star.child_of(SyntaxKind::ColumnList).is_none());

    let cols = first_clause("T | distinct A, B");
    let list = cols.child_of(SyntaxKind::ColumnList).expect("columns");
    assert_eq!(list.children.len(), 2);

    let bare = first_clause("T | distinct");
    assert_eq!(bare.kind, SyntaxKind::DistinctClause);
    assert!(bare.child_of(SyntaxKind::ColumnList).is_none());
}

#[test]
fn test_top_with_by() {
    let clause = first_clause("T | top 5 by Score desc");
    assert_eq!(clause.kind, SyntaxKind::TopClause);
    assert!(clause.has_token("desc"));
    let count = clause
        .child_of(SyntaxKind::NumberLiteral)
        .expect("row count");
    assert_eq!(count.text, "5");
}

#[test]
fn test_mv_expand_with_typeof_and_limit() {
    let clause = first_clause("T | mv-expand Items to typeof(string) limit 100");
    assert_eq!(clause.kind, SyntaxKind::MvExpandClause);
    assert!(clause.has_token("typeof"));
    assert!(clause.has_token("limit"));
}

#[test]
fn test_search_scoped_and_unscoped() {
    let scoped = first_clause("T | search in (Name, Message) 'error'");
    assert_eq!(scoped.kind, SyntaxKind::SearchClause);
    assert!(scoped.child_of(SyntaxKind::ColumnList).is_some());

    let unscoped = first_clause("T | search 'error'");
    assert!(unscoped.child_of(SyntaxKind::ColumnList).is_none());
}

#[test]
fn test_parse_clause_keeps_pattern_verbatim() {
    let clause = first_clause("T | parse Message with '[' Level ']' | take 5");
    assert_eq!(clause.kind, SyntaxKind::ParseClause);
    let pattern = clause
        .child_of(SyntaxKind::ParsePattern)
        .expect("pattern");
    assert_eq!(pattern.text, "'[' Level ']'");
    let captures: Vec<_> = pattern
        .children_of(SyntaxKind::Identifier)
        .map(|c| c.text)
        .collect();
    assert_eq!(captures, vec!["Level"]);
}

#[test]
fn test_take_and_limit() {
    assert_eq!(first_clause("T | take 10").kind, SyntaxKind::TakeClause);
    assert_eq!(first_clause("T | limit 10").kind, SyntaxKind::LimitClause);
}

// ========================================================================
// Expressions
// ========================================================================

fn where_condition(source: &str) -> SyntaxNode<'_> {
    let clause = first_clause(source);
    assert_eq!(clause.kind, SyntaxKind::WhereClause);
    clause.children[1].clone()
}

#[test]
fn test_comparison_shape() {
    let cond = where_condition("T | where Col > 10");
    assert_eq!(cond.kind, SyntaxKind::ComparisonExpression);
    assert_eq!(cond.children[0].kind, SyntaxKind::Identifier);
    assert!(cond.has_token(">"));
    assert_eq!(cond.children[2].kind, SyntaxKind::NumberLiteral);
}

#[test]
fn test_logical_folds_left() {
    let cond = where_condition("T | where A > 1 and B < 2 or C == 3");
    // ((A > 1 and B < 2) or C == 3)
    assert_eq!(cond.kind, SyntaxKind::BinaryExpression);
    assert!(cond.has_token("or"));
    assert_eq!(cond.children[0].kind, SyntaxKind::BinaryExpression);
    assert!(cond.children[0].has_token("and"));
}

#[test]
fn test_multiplicative_binds_tighter() {
    let cond = where_condition("T | where Total == Price + Tax * 2");
    let right = &cond.children[2];
    assert_eq!(right.kind, SyntaxKind::ArithmeticExpression);
    assert!(right.has_token("+"));
    assert_eq!(right.children[2].kind, SyntaxKind::ArithmeticExpression);
    assert!(right.children[2].has_token("*"));
}

#[test]
fn test_string_predicates() {
    let cond = where_condition("T | where Name contains 'abc'");
    assert_eq!(cond.kind, SyntaxKind::StringExpression);
    assert!(cond.has_token("contains"));

    let cond = where_condition("T | where Name matches regex '^a.*'");
    assert_eq!(cond.kind, SyntaxKind::StringExpression);
    assert!(cond.has_token("regex"));
}

#[test]
fn test_in_and_between() {
    let cond = where_condition("T | where Region in ('us', 'eu', 1)");
    assert_eq!(cond.kind, SyntaxKind::InExpression);
    let list = cond.child_of(SyntaxKind::LiteralList).expect("literals");
    assert_eq!(list.children.len(), 3);

    let cond = where_condition("T | where Age between (18 .. 65)");
    assert_eq!(cond.kind, SyntaxKind::BetweenExpression);
}

#[test]
fn test_timespan_wins_over_number() {
    let cond = where_condition("T | where Elapsed > 1d");
    assert_eq!(cond.children[2].kind, SyntaxKind::TimespanLiteral);
    assert_eq!(cond.children[2].text, "1d");
}

#[test]
fn test_function_call_and_qualified_identifier() {
    let cond = where_condition("T | where strlen(Name) > Other.Limit");
    let call = &cond.children[0];
    assert_eq!(call.kind, SyntaxKind::FunctionCall);
    let args = call.child_of(SyntaxKind::ArgumentList).expect("args");
    assert_eq!(args.children.len(), 1);
    assert_eq!(cond.children[2].kind, SyntaxKind::QualifiedIdentifier);
}

#[test]
fn test_type_cast_expression() {
    let clause = first_clause("T | extend S = tostring(Code)");
    let list = clause.child_of(SyntaxKind::ColumnList).expect("columns");
    let assignment = &list.children[0];
    let cast = &assignment.children[2];
    assert_eq!(cast.kind, SyntaxKind::TypeCastExpression);
    assert!(cast.has_token("tostring"));
}

#[test]
fn test_postfix_cast_expression() {
    let cond = where_condition("T | where Code :: int > 400");
    assert_eq!(cond.kind, SyntaxKind::ComparisonExpression);
    let cast = &cond.children[0];
    assert_eq!(cast.kind, SyntaxKind::TypeCastExpression);
    assert!(cast.has_token("::"));
    assert_eq!(cast.children[2].text, "int");
}

#[test]
fn test_conditional_expression() {
    let clause = first_clause("T | extend Level = iff(Code > 400, 'bad', 'ok')");
    let list = clause.child_of(SyntaxKind::ColumnList).expect("columns");
    let cond = &list.children[0].children[2];
    assert_eq!(cond.kind, SyntaxKind::ConditionalExpression);
    let args = cond.child_of(SyntaxKind::ArgumentList).expect("args");
    assert_eq!(args.children.len(), 3);
}

#[test]
fn test_dynamic_and_datetime_literals() {
    let cond = where_condition("T | where Tags == dynamic(['a', 'b'])");
    assert_eq!(cond.children[2].kind, SyntaxKind::DynamicLiteral);

    let cond = where_condition("T | where Ts > datetime(2024-01-01)");
    assert_eq!(cond.children[2].kind, SyntaxKind::DatetimeLiteral);
}

#[test]
fn test_parenthesized_grouping() {
    let cond = where_condition("T | where (A > 1 or B > 2) and C == 3");
    assert_eq!(cond.kind, SyntaxKind::BinaryExpression);
    assert!(cond.has_token("and"));
    assert_eq!(cond.children[0].kind, SyntaxKind::ParenthesizedExpression);
}
