//! Scalar function and type conversion lowering.

use crate::ast::Expression;
use crate::error::TranslationError;

use super::Translator;

impl<'a> Translator<'a> {
    pub(crate) fn translate_function_call(
        &self,
        name: &str,
        arguments: &[Expression],
    ) -> Result<String, TranslationError> {
        let upper = name.to_uppercase();

        if upper == "COUNT" && arguments.is_empty() {
            return Ok("COUNT(*)".to_string());
        }

        // `ago(t)` is relative to the current time.
        if upper == "AGO" {
            return match arguments {
                [] => Ok("NOW()".to_string()),
                [offset] => Ok(format!("NOW() - {}", self.translate_expression(offset)?)),
                _ => Err(TranslationError::new("ago takes at most one argument")),
            };
        }

        let sql_name = match upper.as_str() {
            "SUBSTRING" => "SUBSTR",
            "TOLOWER" => "LOWER",
            "TOUPPER" => "UPPER",
            "INDEXOF" => "STRPOS",
            "SPLIT" => "STRING_SPLIT",
            other => other,
        };

        let args = arguments
            .iter()
            .map(|argument| self.translate_expression(argument))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("{sql_name}({})", args.join(", ")))
    }

    pub(crate) fn translate_type_cast(
        &self,
        expression: &Expression,
        target_type: &str,
    ) -> Result<String, TranslationError> {
        let sql_type = match target_type {
            "string" => "VARCHAR",
            "int" => "INTEGER",
            "long" => "BIGINT",
            "double" => "DOUBLE",
            "float" => "FLOAT",
            "bool" => "BOOLEAN",
            "datetime" => "TIMESTAMP",
            "timespan" => "INTERVAL",
            other => {
                return Err(TranslationError::new(format!(
                    "cannot cast to `{other}`"
                )))
            }
        };
        Ok(format!(
            "CAST({} AS {sql_type})",
            self.translate_expression(expression)?
        ))
    }
}
