use pretty_assertions::assert_eq;

use super::{sql, sql_err};

/// SQL of a single-stage pipeline, with the CTE wrapper stripped.
fn stage(source: &str) -> String {
    let full = sql(source);
    let inner = full
        .strip_prefix("WITH cte_0 AS (")
        .and_then(|rest| rest.strip_suffix(") SELECT * FROM cte_0"));
    match inner {
        Some(inner) => inner.to_string(),
        None => panic!("not a single-stage query: {full}"),
    }
}

#[test]
fn test_project() {
    assert_eq!(
        stage("T | project A, B = C + 1"),
        "SELECT A, (C + 1) AS B FROM T"
    );
}

#[test]
fn test_project_away() {
    assert_eq!(
        stage("T | project-away Secret, Internal"),
        "SELECT * EXCLUDE (Secret, Internal) FROM T"
    );
}

#[test]
fn test_project_away_rejects_computed_entries() {
    let err = sql_err("T | project-away X = A + 1");
    assert_eq!(err.message, "project-away takes column names only");
}

#[test]
fn test_project_keep() {
    assert_eq!(stage("T | project-keep A, B"), "SELECT A, B FROM T");
}

#[test]
fn test_project_rename() {
    assert_eq!(
        stage("T | project-rename New = Old"),
        "SELECT * RENAME (Old AS New) FROM T"
    );
}

#[test]
fn test_project_reorder() {
    assert_eq!(
        stage("T | project-reorder B, A"),
        "SELECT B, A, * EXCLUDE (B, A) FROM T"
    );
}

#[test]
fn test_extend() {
    assert_eq!(
        stage("T | extend Total = Price * Qty"),
        "SELECT *, (Price * Qty) AS Total FROM T"
    );
}

#[test]
fn test_summarize_with_grouping() {
    assert_eq!(
        stage("T | summarize Total = count() by Region"),
        "SELECT Region, COUNT(*) AS Total FROM T GROUP BY Region"
    );
}

#[test]
fn test_summarize_without_grouping() {
    assert_eq!(stage("T | summarize count()"), "SELECT COUNT(*) FROM T");
}

#[test]
fn test_summarize_multiple_aggregations() {
    assert_eq!(
        stage("T | summarize count(), avg(Price) by Region, Country"),
        "SELECT Region, Country, COUNT(*), AVG(Price) FROM T GROUP BY Region, Country"
    );
}

#[test]
fn test_join_with_kind() {
    assert_eq!(
        stage("T | join kind=leftouter (Other) on Key"),
        "SELECT * FROM T LEFT OUTER JOIN Other ON T.Key = Other.Key"
    );
}

#[test]
fn test_join_defaults_to_inner() {
    assert_eq!(
        stage("T | join (Other) on $left.Id == $right.UserId"),
        "SELECT * FROM T INNER JOIN Other ON T.Id = Other.UserId"
    );
}

#[test]
fn test_join_with_bare_right_table() {
    assert_eq!(
        stage("Table1 | join kind=inner Table2 on Id == Id"),
        "SELECT * FROM Table1 INNER JOIN Table2 ON Table1.Id = Table2.Id"
    );
}

#[test]
fn test_sort_directions() {
    assert_eq!(
        stage("T | sort by Name asc, Age desc"),
        "SELECT * FROM T ORDER BY Name ASC, Age DESC"
    );
    assert_eq!(
        stage("T | order by Name"),
        "SELECT * FROM T ORDER BY Name ASC"
    );
    assert_eq!(
        stage("T | sort Timestamp desc"),
        "SELECT * FROM T ORDER BY Timestamp DESC"
    );
}

#[test]
fn test_distinct() {
    assert_eq!(stage("T | distinct *"), "SELECT DISTINCT * FROM T");
    assert_eq!(stage("T | distinct A, B"), "SELECT DISTINCT A, B FROM T");
    assert_eq!(stage("T | distinct"), "SELECT DISTINCT * FROM T");
}

#[test]
fn test_top_defaults_to_descending() {
    assert_eq!(
        stage("T | top 5 by Score"),
        "SELECT * FROM T ORDER BY Score DESC LIMIT 5"
    );
    assert_eq!(stage("T | top 3"), "SELECT * FROM T LIMIT 3");
}

#[test]
fn test_take_and_limit() {
    assert_eq!(stage("T | take 10"), "SELECT * FROM T LIMIT 10");
    assert_eq!(stage("T | limit 10"), "SELECT * FROM T LIMIT 10");
}

#[test]
fn test_mv_expand() {
    assert_eq!(
        stage("T | mv-expand Items limit 50"),
        "SELECT * FROM T, UNNEST(Items) AS expanded_value LIMIT 50"
    );
}

#[test]
fn test_scoped_search() {
    assert_eq!(
        stage("T | search in (Name, Message) 'error'"),
        "SELECT * FROM T WHERE LOWER(Name) LIKE LOWER('%error%') \
         OR LOWER(Message) LIKE LOWER('%error%')"
    );
}
