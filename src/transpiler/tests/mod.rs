use crate::builder::build_source_file;
use crate::error::TranslationError;
use crate::parser;
use crate::transpiler::ToSql;

mod expressions;
mod operators;

/// Full pipeline for a source expected to translate cleanly.
fn sql(source: &str) -> String {
    let root = parser::parse(source);
    assert!(
        parser::syntax_errors(&root).is_empty(),
        "unexpected syntax errors in {source:?}"
    );
    let file = build_source_file(&root).expect("build failed");
    file.to_sql().expect("translation failed")
}

/// Full pipeline for a source expected to fail translation.
fn sql_err(source: &str) -> TranslationError {
    let root = parser::parse(source);
    let file = build_source_file(&root).expect("build failed");
    file.to_sql().expect_err("translation unexpectedly succeeded")
}
