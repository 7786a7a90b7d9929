//! Request validation from the entity model.

use crate::error::AppError;
use crate::model::{ColumnDef, ColumnFormat, ColumnKind, EntitySchema};
use serde_json::Value;
use std::collections::HashMap;

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a full-shape write (create or replace): every required
    /// column must be present and non-null, and every provided value must
    /// match its column's kind. Unknown body fields are ignored.
    pub fn validate(
        body: &HashMap<String, Value>,
        entity: &EntitySchema,
    ) -> Result<(), AppError> {
        for col in entity.columns {
            let val = body.get(col.name);
            match val {
                None | Some(Value::Null) => {
                    if col.required {
                        return Err(AppError::Validation(format!("{} is required", col.name)));
                    }
                }
                Some(v) => validate_field(col, v)?,
            }
        }
        Ok(())
    }
}

fn validate_field(col: &ColumnDef, v: &Value) -> Result<(), AppError> {
    match col.kind {
        ColumnKind::Text => {
            let Some(s) = v.as_str() else {
                return Err(AppError::Validation(format!("{} must be a string", col.name)));
            };
            if col.required && s.trim().is_empty() {
                return Err(AppError::Validation(format!("{} must not be empty", col.name)));
            }
            if let Some(format) = &col.format {
                validate_format(col.name, s, format)?;
            }
        }
        ColumnKind::Integer | ColumnKind::Reference(_) => {
            if v.as_i64().is_none() {
                return Err(AppError::Validation(format!(
                    "{} must be an integer",
                    col.name
                )));
            }
        }
        ColumnKind::Decimal => {
            if v.as_f64().is_none() {
                return Err(AppError::Validation(format!("{} must be a number", col.name)));
            }
        }
    }
    Ok(())
}

fn validate_format(name: &str, s: &str, format: &ColumnFormat) -> Result<(), AppError> {
    match format {
        ColumnFormat::Email => {
            if !s.contains('@') || s.len() < 3 {
                return Err(AppError::Validation(format!(
                    "{} must be a valid email",
                    name
                )));
            }
        }
    }
    Ok(())
}
