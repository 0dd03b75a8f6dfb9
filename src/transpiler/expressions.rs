//! Expression lowering.
//!
//! Logical and arithmetic operators emit parenthesized pairs, so the SQL
//! never depends on the target's precedence rules. Comparisons stay bare
//! to keep the common `WHERE Col > 10` readable.

use crate::ast::{ConditionalFn, Expression, Literal, StringOp};
use crate::error::TranslationError;

use super::Translator;

impl<'a> Translator<'a> {
    pub(crate) fn translate_expression(
        &self,
        expression: &Expression,
    ) -> Result<String, TranslationError> {
        match expression {
            Expression::Binary { op, left, right } => Ok(format!(
                "({} {} {})",
                self.translate_expression(left)?,
                op.sql_keyword(),
                self.translate_expression(right)?
            )),
            Expression::Comparison { op, left, right } => Ok(format!(
                "{} {} {}",
                self.translate_expression(left)?,
                op.sql_symbol(),
                self.translate_expression(right)?
            )),
            Expression::Arithmetic { op, left, right } => Ok(format!(
                "({} {} {})",
                self.translate_expression(left)?,
                op,
                self.translate_expression(right)?
            )),
            Expression::String { op, left, right } => {
                Ok(string_predicate(*op, &left.name, right))
            }
            Expression::In { left, values } => {
                let values = values
                    .iter()
                    .map(|value| self.translate_literal(value))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!(
                    "{} IN ({})",
                    sql_ident(&left.name),
                    values.join(", ")
                ))
            }
            Expression::Between { left, min, max } => Ok(format!(
                "{} BETWEEN {} AND {}",
                sql_ident(&left.name),
                self.translate_expression(min)?,
                self.translate_expression(max)?
            )),
            Expression::Parenthesized(inner) => {
                Ok(format!("({})", self.translate_expression(inner)?))
            }
            Expression::Conditional {
                function,
                arguments,
            } => self.translate_conditional(*function, arguments),
            Expression::TypeCast {
                expression,
                target_type,
            } => self.translate_type_cast(expression, target_type),
            Expression::FunctionCall { name, arguments } => {
                self.translate_function_call(&name.name, arguments)
            }
            Expression::NamedArgument { .. } => Err(TranslationError::unsupported(
                "named arguments in functions",
            )),
            Expression::Identifier(name) => {
                // A let-bound name expands to its definition, wrapped so
                // the substitution cannot change precedence.
                match self.binding(&name.name) {
                    Some(bound) => Ok(format!("({})", self.translate_expression(bound)?)),
                    None => Ok(sql_ident(&name.name)),
                }
            }
            Expression::QualifiedIdentifier { table, column } => Ok(format!(
                "{}.{}",
                sql_ident(&table.name),
                sql_ident(&column.name)
            )),
            Expression::Literal(literal) => self.translate_literal(literal),
        }
    }

    pub(crate) fn translate_literal(
        &self,
        literal: &Literal,
    ) -> Result<String, TranslationError> {
        match literal {
            Literal::String(value) => Ok(sql_string(value)),
            Literal::Number(value) => Ok(sql_number(*value)),
            Literal::Boolean(true) => Ok("TRUE".to_string()),
            Literal::Boolean(false) => Ok("FALSE".to_string()),
            Literal::Null => Ok("NULL".to_string()),
            Literal::Timespan(value) => Ok(sql_interval(value)),
            Literal::Datetime(value) => Ok(format!(
                "TIMESTAMP {}",
                sql_string(value.trim_matches(|c| c == '\'' || c == '"'))
            )),
            Literal::Dynamic(_) => Err(TranslationError::unsupported("dynamic literals")),
        }
    }

    fn translate_conditional(
        &self,
        function: ConditionalFn,
        arguments: &[Expression],
    ) -> Result<String, TranslationError> {
        match function {
            ConditionalFn::Iff => {
                let [condition, then_value, else_value] = arguments else {
                    return Err(TranslationError::new(
                        "iff takes exactly three arguments",
                    ));
                };
                Ok(format!(
                    "CASE WHEN {} THEN {} ELSE {} END",
                    self.translate_expression(condition)?,
                    self.translate_expression(then_value)?,
                    self.translate_expression(else_value)?
                ))
            }
            ConditionalFn::Case => {
                if arguments.len() < 3 {
                    return Err(TranslationError::new(
                        "case takes condition/value pairs and a default",
                    ));
                }
                let mut sql = String::from("CASE");
                let mut pairs = arguments.chunks_exact(2);
                for pair in &mut pairs {
                    sql.push_str(&format!(
                        " WHEN {} THEN {}",
                        self.translate_expression(&pair[0])?,
                        self.translate_expression(&pair[1])?
                    ));
                }
                if let [default] = pairs.remainder() {
                    sql.push_str(&format!(
                        " ELSE {}",
                        self.translate_expression(default)?
                    ));
                }
                sql.push_str(" END");
                Ok(sql)
            }
        }
    }
}

fn string_predicate(op: StringOp, column: &str, value: &str) -> String {
    let column = sql_ident(column);
    let escaped = value.replace('\'', "''");
    match op {
        StringOp::Contains | StringOp::Has => format!("{column} LIKE '%{escaped}%'"),
        StringOp::StartsWith => format!("{column} LIKE '{escaped}%'"),
        StringOp::EndsWith => format!("{column} LIKE '%{escaped}'"),
        StringOp::Matches => format!("{column} REGEXP '{escaped}'"),
    }
}

/// Quote a name only when it needs it; bare identifiers stay bare so the
/// output reads like hand-written SQL.
pub(crate) fn sql_ident(name: &str) -> String {
    let plain = !name.is_empty()
        && name
            .chars()
            .enumerate()
            .all(|(i, c)| c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit()));
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

pub(crate) fn sql_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Render a numeric value the way it was written: whole numbers without a
/// trailing `.0`.
pub(crate) fn sql_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// KQL timespans map to singular DuckDB interval units; anything the
/// simple `<integer><unit>` form does not cover passes through verbatim.
fn sql_interval(timespan: &str) -> String {
    let digits: String = timespan.chars().take_while(|c| c.is_ascii_digit()).collect();
    let unit = match &timespan[digits.len()..] {
        "d" => "day",
        "h" => "hour",
        "m" => "minute",
        "s" => "second",
        _ => return format!("INTERVAL '{timespan}'"),
    };
    if digits.is_empty() {
        return format!("INTERVAL '{timespan}'");
    }
    format!("INTERVAL '{digits} {unit}'")
}
