use pretty_assertions::assert_eq;

use super::{sql, sql_err};

/// The WHERE condition of a single `where` stage.
fn condition(expr: &str) -> String {
    let full = sql(&format!("T | where {expr}"));
    let inner = full
        .strip_prefix("WITH cte_0 AS (SELECT * FROM T WHERE ")
        .and_then(|rest| rest.strip_suffix(") SELECT * FROM cte_0"));
    match inner {
        Some(inner) => inner.to_string(),
        None => panic!("unexpected shape: {full}"),
    }
}

/// The value of a single extended column.
fn extended(expr: &str) -> String {
    let full = sql(&format!("T | extend X = {expr}"));
    let inner = full
        .strip_prefix("WITH cte_0 AS (SELECT *, ")
        .and_then(|rest| rest.strip_suffix(" AS X FROM T) SELECT * FROM cte_0"));
    match inner {
        Some(inner) => inner.to_string(),
        None => panic!("unexpected shape: {full}"),
    }
}

#[test]
fn test_equality_becomes_single_equals() {
    assert_eq!(condition("Level == 3"), "Level = 3");
    assert_eq!(condition("Level != 3"), "Level != 3");
}

#[test]
fn test_logical_operators_parenthesize() {
    assert_eq!(condition("A == 1 and B == 2"), "(A = 1 AND B = 2)");
    assert_eq!(
        condition("A == 1 and B == 2 or C == 3"),
        "((A = 1 AND B = 2) OR C = 3)"
    );
}

#[test]
fn test_arithmetic_nests_by_precedence() {
    assert_eq!(condition("Total == Price + Tax * 2"), "Total = (Price + (Tax * 2))");
}

#[test]
fn test_explicit_grouping_is_kept() {
    assert_eq!(
        condition("(A > 1 or B > 2) and C == 3"),
        "(((A > 1 OR B > 2)) AND C = 3)"
    );
}

#[test]
fn test_string_predicates() {
    assert_eq!(condition("Name contains 'abc'"), "Name LIKE '%abc%'");
    assert_eq!(condition("Name startswith 'ab'"), "Name LIKE 'ab%'");
    assert_eq!(condition("Name endswith 'bc'"), "Name LIKE '%bc'");
    assert_eq!(condition("Name has 'word'"), "Name LIKE '%word%'");
    assert_eq!(
        condition("Name matches regex '^a.*'"),
        "Name REGEXP '^a.*'"
    );
}

#[test]
fn test_in_and_between() {
    assert_eq!(
        condition("Region in ('us', 'eu')"),
        "Region IN ('us', 'eu')"
    );
    assert_eq!(condition("Age between (18 .. 65)"), "Age BETWEEN 18 AND 65");
}

#[test]
fn test_boolean_and_null_literals() {
    assert_eq!(condition("Active == true"), "Active = TRUE");
    assert_eq!(condition("Deleted == false"), "Deleted = FALSE");
    assert_eq!(condition("Parent == null"), "Parent = NULL");
}

#[test]
fn test_timespan_literals() {
    assert_eq!(condition("Elapsed > 1d"), "Elapsed > INTERVAL '1 day'");
    assert_eq!(condition("Elapsed > 2h"), "Elapsed > INTERVAL '2 hour'");
    assert_eq!(condition("Elapsed > 30m"), "Elapsed > INTERVAL '30 minute'");
    assert_eq!(condition("Elapsed > 45s"), "Elapsed > INTERVAL '45 second'");
    // No singular unit mapping, passes through verbatim.
    assert_eq!(condition("Elapsed > 100ms"), "Elapsed > INTERVAL '100ms'");
}

#[test]
fn test_datetime_literal() {
    assert_eq!(
        condition("Ts > datetime(2024-01-01)"),
        "Ts > TIMESTAMP '2024-01-01'"
    );
}

#[test]
fn test_ago_is_relative_to_now() {
    assert_eq!(condition("Ts > ago(1h)"), "Ts > NOW() - INTERVAL '1 hour'");
}

#[test]
fn test_qualified_identifier() {
    assert_eq!(condition("Other.Limit > 5"), "Other.Limit > 5");
}

#[test]
fn test_type_conversions() {
    assert_eq!(extended("tostring(Code)"), "CAST(Code AS VARCHAR)");
    assert_eq!(extended("toint(Code)"), "CAST(Code AS INTEGER)");
    assert_eq!(extended("tolong(Code)"), "CAST(Code AS BIGINT)");
    assert_eq!(extended("todatetime(Raw)"), "CAST(Raw AS TIMESTAMP)");
    assert_eq!(extended("Code :: string"), "CAST(Code AS VARCHAR)");
}

#[test]
fn test_unknown_cast_target_is_rejected() {
    let err = sql_err("T | extend S = Code :: widget");
    assert_eq!(err.message, "cannot cast to `widget`");
}

#[test]
fn test_named_arguments_are_rejected() {
    let err = sql_err("T | extend X = foo(limit=5)");
    assert_eq!(
        err.message,
        "named arguments in functions is not supported"
    );
}

#[test]
fn test_function_name_mapping() {
    assert_eq!(extended("tolower(Name)"), "LOWER(Name)");
    assert_eq!(extended("toupper(Name)"), "UPPER(Name)");
    assert_eq!(extended("substring(Name, 0, 3)"), "SUBSTR(Name, 0, 3)");
    assert_eq!(extended("indexof(Name, 'x')"), "STRPOS(Name, 'x')");
    assert_eq!(extended("split(Name, ',')"), "STRING_SPLIT(Name, ',')");
}

#[test]
fn test_unmapped_function_is_uppercased() {
    assert_eq!(extended("strlen(Name)"), "STRLEN(Name)");
}

#[test]
fn test_iff_and_case() {
    assert_eq!(
        extended("iff(Code > 400, 'bad', 'ok')"),
        "CASE WHEN Code > 400 THEN 'bad' ELSE 'ok' END"
    );
    assert_eq!(
        extended("case(A == 1, 'one', A == 2, 'two', 'many')"),
        "CASE WHEN A = 1 THEN 'one' WHEN A = 2 THEN 'two' ELSE 'many' END"
    );
}

#[test]
fn test_string_literal_quotes_are_doubled() {
    assert_eq!(condition("Name == \"it's\""), "Name = 'it''s'");
}

#[test]
fn test_whole_numbers_print_without_fraction() {
    assert_eq!(condition("Score > 10"), "Score > 10");
    assert_eq!(condition("Score > 1.5"), "Score > 1.5");
}
