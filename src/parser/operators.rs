//! Pipeline operator grammar: everything that can follow a `|`.

use nom::{branch::alt, bytes::complete::tag, combinator::opt, IResult};

use super::cst::{SyntaxKind, SyntaxNode};
use super::expressions::expression;
use super::tokens::{
    assign, boolean_literal, consumed_text, identifier, keyword, number_literal, string_literal,
    sym, trivia,
};

/// One operator clause. Hyphenated `project-*` forms come before plain
/// `project` so the longer keyword wins.
pub fn operator_clause(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    alt((
        alt((
            column_list_clause("project-away", SyntaxKind::ProjectAwayClause),
            column_list_clause("project-keep", SyntaxKind::ProjectKeepClause),
            column_list_clause("project-rename", SyntaxKind::ProjectRenameClause),
            column_list_clause("project-reorder", SyntaxKind::ProjectReorderClause),
            column_list_clause("project", SyntaxKind::ProjectClause),
            column_list_clause("extend", SyntaxKind::ExtendClause),
        )),
        where_clause,
        summarize_clause,
        join_clause,
        union_clause,
        parse_clause,
        mv_expand_clause,
        count_clause,
        number_clause("take", SyntaxKind::TakeClause),
        number_clause("limit", SyntaxKind::LimitClause),
        sort_clause,
        distinct_clause,
        top_clause,
        search_clause,
    ))(input)
}

fn where_clause(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, kw) = keyword("where")(input)?;
    let (rest, cond) = expression(rest)?;
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::WhereClause,
            consumed_text(start, rest),
            vec![kw, cond],
        ),
    ))
}

/// Shared shape of the project family and extend: a keyword followed by a
/// column list.
fn column_list_clause(
    kw: &'static str,
    kind: SyntaxKind,
) -> impl Fn(&str) -> IResult<&str, SyntaxNode<'_>> {
    move |input| {
        let (input, _) = trivia(input)?;
        let start = input;
        let (rest, kw_tok) = keyword(kw)(input)?;
        let (rest, columns) = column_list(rest)?;
        Ok((
            rest,
            SyntaxNode::new(kind, consumed_text(start, rest), vec![kw_tok, columns]),
        ))
    }
}

pub fn column_list(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (mut rest, first) = column_expression(input)?;
    let mut items = vec![first];
    while let Ok((after_comma, _)) = sym(",")(rest) {
        let (after_item, item) = column_expression(after_comma)?;
        items.push(item);
        rest = after_item;
    }
    Ok((
        rest,
        SyntaxNode::new(SyntaxKind::ColumnList, consumed_text(start, rest), items),
    ))
}

fn column_expression(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    alt((column_assignment, expression))(input)
}

fn column_assignment(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, name) = identifier(input)?;
    let (rest, eq) = assign(rest)?;
    let (rest, value) = expression(rest)?;
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::ColumnAssignment,
            consumed_text(start, rest),
            vec![name, eq, value],
        ),
    ))
}

fn summarize_clause(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, kw) = keyword("summarize")(input)?;
    let (rest, aggs) = aggregation_list(rest)?;
    let mut children = vec![kw, aggs];
    let (rest, by) = opt(keyword("by"))(rest)?;
    let rest = if let Some(by_tok) = by {
        let (rest, exprs) = expression_list(rest)?;
        children.push(by_tok);
        children.push(exprs);
        rest
    } else {
        rest
    };
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::SummarizeClause,
            consumed_text(start, rest),
            children,
        ),
    ))
}

fn aggregation_list(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (mut rest, first) = aggregation_expression(input)?;
    let mut items = vec![first];
    while let Ok((after_comma, _)) = sym(",")(rest) {
        let (after_item, item) = aggregation_expression(after_comma)?;
        items.push(item);
        rest = after_item;
    }
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::AggregationList,
            consumed_text(start, rest),
            items,
        ),
    ))
}

/// `alias = agg(...)` or a bare aggregation expression. The `by` keyword
/// ends the list, so a bare trailing identifier never swallows it; the
/// aggregation itself is a full expression.
fn aggregation_expression(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    if let Ok((rest, name)) = named_aggregation_head(input) {
        let (name, eq) = name;
        let (rest, value) = expression(rest)?;
        return Ok((
            rest,
            SyntaxNode::new(
                SyntaxKind::AggregationExpression,
                consumed_text(start, rest),
                vec![name, eq, value],
            ),
        ));
    }
    let (rest, value) = expression(input)?;
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::AggregationExpression,
            consumed_text(start, rest),
            vec![value],
        ),
    ))
}

fn named_aggregation_head(input: &str) -> IResult<&str, (SyntaxNode<'_>, SyntaxNode<'_>)> {
    let (rest, name) = identifier(input)?;
    let (rest, eq) = assign(rest)?;
    Ok((rest, (name, eq)))
}

fn expression_list(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (mut rest, first) = expression(input)?;
    let mut items = vec![first];
    while let Ok((after_comma, _)) = sym(",")(rest) {
        let (after_item, item) = expression(after_comma)?;
        items.push(item);
        rest = after_item;
    }
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::ExpressionList,
            consumed_text(start, rest),
            items,
        ),
    ))
}

fn table_name(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, name) = identifier(input)?;
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::TableName,
            consumed_text(start, rest),
            vec![name],
        ),
    ))
}

fn join_clause(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, kw) = keyword("join")(input)?;
    let (rest, kind) = opt(join_kind)(rest)?;
    let mut children = vec![kw];
    if let Some(kind) = kind {
        children.push(kind);
    }
    // The right table may be bare or parenthesized.
    let rest = if let Ok((after_open, open)) = sym("(")(rest) {
        let (rest, table) = table_name(after_open)?;
        let (rest, close) = sym(")")(rest)?;
        children.extend([open, table, close]);
        rest
    } else {
        let (rest, table) = table_name(rest)?;
        children.push(table);
        rest
    };
    let (rest, on_tok) = keyword("on")(rest)?;
    let (rest, conditions) = join_conditions(rest)?;
    children.extend([on_tok, conditions]);
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::JoinClause,
            consumed_text(start, rest),
            children,
        ),
    ))
}

/// `kind = <flavor>`; the flavor word is validated by the builder.
fn join_kind(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, kw) = keyword("kind")(input)?;
    let (rest, eq) = assign(rest)?;
    let (rest, flavor) = identifier(rest)?;
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::JoinKind,
            consumed_text(start, rest),
            vec![kw, eq, flavor],
        ),
    ))
}

fn join_conditions(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (mut rest, first) = join_condition(input)?;
    let mut items = vec![first];
    while let Ok((after_comma, _)) = sym(",")(rest) {
        let (after_item, item) = join_condition(after_comma)?;
        items.push(item);
        rest = after_item;
    }
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::JoinConditions,
            consumed_text(start, rest),
            items,
        ),
    ))
}

/// `A == B` with optional `$left.` / `$right.` markers on either side,
/// or a bare column used on both sides. Identifier children carry exactly
/// the column names, so the builder reads one or two of them.
fn join_condition(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, (left_side, left_col)) = side_column(input)?;
    let mut children = Vec::new();
    if let Some(side) = left_side {
        children.push(side);
    }
    children.push(left_col);
    if let Ok((after_eq, eq)) = sym("==")(rest) {
        let (rest, (right_side, right_col)) = side_column(after_eq)?;
        children.push(eq);
        if let Some(side) = right_side {
            children.push(side);
        }
        children.push(right_col);
        return Ok((
            rest,
            SyntaxNode::new(
                SyntaxKind::JoinCondition,
                consumed_text(start, rest),
                children,
            ),
        ));
    }
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::JoinCondition,
            consumed_text(start, rest),
            children,
        ),
    ))
}

/// A column with an optional side marker; the marker stays a token.
fn side_column(input: &str) -> IResult<&str, (Option<SyntaxNode<'_>>, SyntaxNode<'_>)> {
    let (input, _) = trivia(input)?;
    let (rest, side) = opt(side_marker)(input)?;
    let (rest, column) = identifier(rest)?;
    Ok((rest, (side, column)))
}

fn side_marker(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, side) = alt((tag("$left"), tag("$right")))(input)?;
    let (input, _) = sym(".")(input)?;
    Ok((input, SyntaxNode::token(side)))
}

fn union_clause(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, kw) = keyword("union")(input)?;
    let (rest, kind) = opt(union_kind)(rest)?;
    let (rest, isfuzzy) = opt(isfuzzy_flag)(rest)?;
    let (rest, tables) = table_list(rest)?;
    let mut children = vec![kw];
    if let Some(kind) = kind {
        children.push(kind);
    }
    if let Some((fuzzy_kw, eq, flag)) = isfuzzy {
        children.extend([fuzzy_kw, eq, flag]);
    }
    children.push(tables);
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::UnionClause,
            consumed_text(start, rest),
            children,
        ),
    ))
}

fn union_kind(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, kw) = keyword("kind")(input)?;
    let (rest, eq) = assign(rest)?;
    let (rest, flavor) = identifier(rest)?;
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::UnionKind,
            consumed_text(start, rest),
            vec![kw, eq, flavor],
        ),
    ))
}

fn isfuzzy_flag(input: &str) -> IResult<&str, (SyntaxNode<'_>, SyntaxNode<'_>, SyntaxNode<'_>)> {
    let (input, kw) = keyword("isfuzzy")(input)?;
    let (input, eq) = assign(input)?;
    let (input, flag) = boolean_literal(input)?;
    Ok((input, (kw, eq, flag)))
}

fn table_list(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (mut rest, first) = table_name(input)?;
    let mut items = vec![first];
    while let Ok((after_comma, _)) = sym(",")(rest) {
        let (after_item, item) = table_name(after_comma)?;
        items.push(item);
        rest = after_item;
    }
    Ok((
        rest,
        SyntaxNode::new(SyntaxKind::TableList, consumed_text(start, rest), items),
    ))
}

/// `parse [kind=<flavor>] <source> with <pattern>`. The pattern is a run
/// of string segments and capture columns, ending at the next pipe or
/// statement boundary.
fn parse_clause(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, kw) = keyword("parse")(input)?;
    let (rest, kind) = opt(parse_kind)(rest)?;
    let (rest, source) = expression(rest)?;
    let (rest, with_tok) = keyword("with")(rest)?;
    let (rest, pattern) = parse_pattern(rest)?;
    let mut children = vec![kw];
    if let Some(kind) = kind {
        children.push(kind);
    }
    children.extend([source, with_tok, pattern]);
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::ParseClause,
            consumed_text(start, rest),
            children,
        ),
    ))
}

fn parse_kind(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, kw) = keyword("kind")(input)?;
    let (rest, eq) = assign(rest)?;
    let (rest, flavor) = identifier(rest)?;
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::ParseKind,
            consumed_text(start, rest),
            vec![kw, eq, flavor],
        ),
    ))
}

fn parse_pattern(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (mut rest, first) = parse_segment(input)?;
    let mut items = vec![first];
    while let Ok((after_item, item)) = parse_segment(rest) {
        items.push(item);
        rest = after_item;
    }
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::ParsePattern,
            consumed_text(start, rest),
            items,
        ),
    ))
}

/// One pattern segment: a literal separator or a capture column.
fn parse_segment(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    alt((string_literal, identifier))(input)
}

/// `mv-expand <column> [to typeof(<type>)] [limit <n>]`; the bare
/// `mvexpand` spelling is accepted too.
fn mv_expand_clause(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, kw) = alt((keyword("mv-expand"), keyword("mvexpand")))(input)?;
    let (rest, column) = expression(rest)?;
    let mut children = vec![kw, column];
    let (rest, to) = opt(typeof_target)(rest)?;
    let rest = if let Some(parts) = to {
        children.extend(parts);
        rest
    } else {
        rest
    };
    let (rest, limit) = opt(limit_suffix)(rest)?;
    let rest = if let Some((limit_tok, count)) = limit {
        children.push(limit_tok);
        children.push(count);
        rest
    } else {
        rest
    };
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::MvExpandClause,
            consumed_text(start, rest),
            children,
        ),
    ))
}

fn typeof_target(input: &str) -> IResult<&str, Vec<SyntaxNode<'_>>> {
    let (input, to_tok) = keyword("to")(input)?;
    let (input, typeof_tok) = keyword("typeof")(input)?;
    let (input, open) = sym("(")(input)?;
    let (input, target) = identifier(input)?;
    let (input, close) = sym(")")(input)?;
    Ok((input, vec![to_tok, typeof_tok, open, target, close]))
}

fn limit_suffix(input: &str) -> IResult<&str, (SyntaxNode<'_>, SyntaxNode<'_>)> {
    let (input, limit_tok) = keyword("limit")(input)?;
    let (input, count) = number_literal(input)?;
    Ok((input, (limit_tok, count)))
}

fn count_clause(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, kw) = keyword("count")(input)?;
    Ok((
        rest,
        SyntaxNode::new(SyntaxKind::CountClause, consumed_text(start, rest), vec![kw]),
    ))
}

/// Shared shape of `take` and `limit`: a keyword and a row count.
fn number_clause(
    kw: &'static str,
    kind: SyntaxKind,
) -> impl Fn(&str) -> IResult<&str, SyntaxNode<'_>> {
    move |input| {
        let (input, _) = trivia(input)?;
        let start = input;
        let (rest, kw_tok) = keyword(kw)(input)?;
        let (rest, count) = number_literal(rest)?;
        Ok((
            rest,
            SyntaxNode::new(kind, consumed_text(start, rest), vec![kw_tok, count]),
        ))
    }
}

/// `sort [by] ...`; `order by` is an accepted alias and produces the
/// same node kind. Only the `sort` spelling may drop `by`.
fn sort_clause(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, kw) = alt((keyword("sort"), keyword("order")))(input)?;
    let (rest, by_tok) = if kw.text == "order" {
        let (rest, by) = keyword("by")(rest)?;
        (rest, Some(by))
    } else {
        opt(keyword("by"))(rest)?
    };
    let (rest, exprs) = sort_expression_list(rest)?;
    let mut children = vec![kw];
    if let Some(by) = by_tok {
        children.push(by);
    }
    children.push(exprs);
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::SortClause,
            consumed_text(start, rest),
            children,
        ),
    ))
}

fn sort_expression_list(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (mut rest, first) = sort_expression(input)?;
    let mut items = vec![first];
    while let Ok((after_comma, _)) = sym(",")(rest) {
        let (after_item, item) = sort_expression(after_comma)?;
        items.push(item);
        rest = after_item;
    }
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::SortExpressionList,
            consumed_text(start, rest),
            items,
        ),
    ))
}

fn sort_expression(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, column) = identifier(input)?;
    let (rest, direction) = opt(alt((keyword("asc"), keyword("desc"))))(rest)?;
    let mut children = vec![column];
    if let Some(dir) = direction {
        children.push(dir);
    }
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::SortExpression,
            consumed_text(start, rest),
            children,
        ),
    ))
}

/// `distinct`, `distinct *` or `distinct <columns>`; the bare keyword
/// means all columns, same as the star form.
fn distinct_clause(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, kw) = keyword("distinct")(input)?;
    if let Ok((rest, star)) = sym("*")(rest) {
        return Ok((
            rest,
            SyntaxNode::new(
                SyntaxKind::DistinctClause,
                consumed_text(start, rest),
                vec![kw, star],
            ),
        ));
    }
    if let Ok((rest, columns)) = column_list(rest) {
        return Ok((
            rest,
            SyntaxNode::new(
                SyntaxKind::DistinctClause,
                consumed_text(start, rest),
                vec![kw, columns],
            ),
        ));
    }
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::DistinctClause,
            consumed_text(start, rest),
            vec![kw],
        ),
    ))
}

/// `top <n> [by <column> [asc|desc]]`.
fn top_clause(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, kw) = keyword("top")(input)?;
    let (rest, count) = number_literal(rest)?;
    let mut children = vec![kw, count];
    let (rest, by) = opt(keyword("by"))(rest)?;
    let rest = if let Some(by_tok) = by {
        let (rest, column) = identifier(rest)?;
        let (rest, direction) = opt(alt((keyword("asc"), keyword("desc"))))(rest)?;
        children.push(by_tok);
        children.push(column);
        if let Some(dir) = direction {
            children.push(dir);
        }
        rest
    } else {
        rest
    };
    Ok((
        rest,
        SyntaxNode::new(SyntaxKind::TopClause, consumed_text(start, rest), children),
    ))
}

/// `search [in (<columns>)] "<term>"`.
fn search_clause(input: &str) -> IResult<&str, SyntaxNode<'_>> {
    let (input, _) = trivia(input)?;
    let start = input;
    let (rest, kw) = keyword("search")(input)?;
    let mut children = vec![kw];
    let (rest, scoped) = opt(search_scope)(rest)?;
    let rest = if let Some(parts) = scoped {
        children.extend(parts);
        rest
    } else {
        rest
    };
    let (rest, term) = string_literal(rest)?;
    children.push(term);
    Ok((
        rest,
        SyntaxNode::new(
            SyntaxKind::SearchClause,
            consumed_text(start, rest),
            children,
        ),
    ))
}

fn search_scope(input: &str) -> IResult<&str, Vec<SyntaxNode<'_>>> {
    let (input, in_tok) = keyword("in")(input)?;
    let (input, open) = sym("(")(input)?;
    let (input, columns) = column_list(input)?;
    let (input, close) = sym(")")(input)?;
    Ok((input, vec![in_tok, open, columns, close]))
}
