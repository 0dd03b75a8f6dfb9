//! Command line front end: translate a query from the arguments or stdin.

use std::io::Read;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;

#[derive(Parser)]
#[command(
    name = "kuery",
    version,
    about = "Translate KQL-style piped queries to DuckDB SQL"
)]
struct Cli {
    /// Query text; read from stdin when omitted
    query: Option<String>,

    /// Print the typed syntax tree instead of SQL
    #[arg(long)]
    ast: bool,

    /// Check syntax only and report every diagnostic
    #[arg(long)]
    check: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(clean) => {
            if clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let source = match &cli.query {
        Some(query) => query.clone(),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading query from stdin")?;
            buffer
        }
    };

    if cli.check {
        return check(&source, cli.format);
    }

    if cli.ast {
        let file = kuery::parse(&source)?;
        println!("{}", serde_json::to_string_pretty(&file)?);
        return Ok(true);
    }

    let sql = kuery::transpile(&source)?;
    match cli.format {
        Format::Text => println!("{sql}"),
        Format::Json => println!("{}", serde_json::json!({ "sql": sql })),
    }
    Ok(true)
}

fn check(source: &str, format: Format) -> Result<bool> {
    let root = kuery::parser::parse(source);
    let errors = kuery::parser::syntax_errors(&root);

    if format == Format::Json {
        println!("{}", serde_json::to_string_pretty(&errors)?);
        return Ok(errors.is_empty());
    }

    if errors.is_empty() {
        println!("{}", "no syntax errors".green());
        return Ok(true);
    }
    for error in &errors {
        let (line, column) = line_column(source, error.span.start);
        eprintln!(
            "{} {line}:{column}: {}",
            "syntax error:".red().bold(),
            error.message
        );
    }
    Ok(false)
}

/// 1-based line and column of a byte offset.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (index, c) in source.char_indices() {
        if index >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}
