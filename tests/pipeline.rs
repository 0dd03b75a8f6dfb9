//! End-to-end tests through the public API: source text in, SQL out.

use pretty_assertions::assert_eq;

use kuery::prelude::*;

#[test]
fn test_where_stage_round_trip() {
    assert_eq!(
        transpile("Table | where Col > 10").unwrap(),
        "WITH cte_0 AS (SELECT * FROM Table WHERE Col > 10) SELECT * FROM cte_0"
    );
}

#[test]
fn test_realistic_pipeline() {
    let sql = transpile(
        "Events \
         | where Level > 3 and Source contains 'web' \
         | project Timestamp, Level, Message \
         | sort by Timestamp desc \
         | take 100",
    )
    .unwrap();
    assert_eq!(
        sql,
        "WITH cte_0 AS (SELECT * FROM Events WHERE (Level > 3 AND Source LIKE '%web%')), \
         cte_1 AS (SELECT Timestamp, Level, Message FROM cte_0), \
         cte_2 AS (SELECT * FROM cte_1 ORDER BY Timestamp DESC), \
         cte_3 AS (SELECT * FROM cte_2 LIMIT 100) \
         SELECT * FROM cte_3"
    );
}

#[test]
fn test_summarize_then_top() {
    let sql = transpile("Sales | summarize Total = sum(Amount) by Region | top 3 by Total")
        .unwrap();
    assert_eq!(
        sql,
        "WITH cte_0 AS (SELECT Region, SUM(Amount) AS Total FROM Sales GROUP BY Region), \
         cte_1 AS (SELECT * FROM cte_0 ORDER BY Total DESC LIMIT 3) \
         SELECT * FROM cte_1"
    );
}

#[test]
fn test_let_bindings_feed_the_query() {
    let sql = transpile("let cutoff = ago(7d);\nEvents | where Timestamp > cutoff").unwrap();
    assert_eq!(
        sql,
        "WITH cte_0 AS (SELECT * FROM Events WHERE Timestamp > (NOW() - INTERVAL '7 day')) \
         SELECT * FROM cte_0"
    );
}

#[test]
fn test_union_is_a_set_operation() {
    assert_eq!(
        transpile("Alpha | union kind=outer Beta").unwrap(),
        "SELECT * FROM Alpha\nUNION ALL\nSELECT * FROM Beta"
    );
}

#[test]
fn test_parse_gives_structured_statements() {
    let file = kuery::parse("let x = 1;\nT | count").unwrap();
    assert_eq!(file.statements.len(), 2);
    assert!(matches!(file.statements[0], Statement::Let(_)));
    assert!(matches!(file.statements[1], Statement::Query(_)));
}

#[test]
fn test_syntax_errors_are_collected() {
    let err = transpile("T | where ; U | where").unwrap_err();
    let KqlError::Syntax(errors) = err else {
        panic!("expected syntax errors");
    };
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.message == "malformed statement"));
}

#[test]
fn test_build_errors_carry_the_translation_prefix() {
    let err = transpile("T | join kind=bogus (Other) on Key").unwrap_err();
    assert_eq!(
        err.to_string(),
        "query translation failed: unknown join kind `bogus`"
    );
}

#[test]
fn test_translation_errors_carry_the_translation_prefix() {
    let err = transpile("T | parse Message with 'x' Level").unwrap_err();
    assert_eq!(
        err.to_string(),
        "query translation failed: the parse operator is not supported"
    );
}

#[test]
fn test_empty_source_is_empty_sql() {
    assert_eq!(transpile("").unwrap(), "");
}
