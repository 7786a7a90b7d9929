//! Convert serde_json::Value to types that sqlx can bind.

use crate::error::AppError;
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

/// A value bound to a PostgreSQL query. Validation runs before binding, so
/// only scalars ever reach this point; every placeholder carries an explicit
/// SQL cast, which also types NULLs.
#[derive(Clone, Debug)]
pub enum PgBindValue {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
}

impl PgBindValue {
    pub fn from_json(v: &Value) -> Result<Self, AppError> {
        Ok(match v {
            Value::Null => PgBindValue::Null,
            Value::Bool(b) => PgBindValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    PgBindValue::I64(i)
                } else if let Some(f) = n.as_f64() {
                    PgBindValue::F64(f)
                } else {
                    return Err(AppError::BadRequest(format!("unbindable number: {}", n)));
                }
            }
            Value::String(s) => PgBindValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => {
                return Err(AppError::BadRequest("nested values cannot be bound".into()))
            }
        })
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            PgBindValue::Null => IsNull::Yes,
            PgBindValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            PgBindValue::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::F64(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::String(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Null => PgTypeInfo::with_name("TEXT"),
            PgBindValue::Bool(_) => <bool as sqlx::Type<Postgres>>::type_info(),
            PgBindValue::I64(_) => <i64 as sqlx::Type<Postgres>>::type_info(),
            PgBindValue::F64(_) => <f64 as sqlx::Type<Postgres>>::type_info(),
            PgBindValue::String(_) => <String as sqlx::Type<Postgres>>::type_info(),
        })
    }
}

impl sqlx::Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_convert() {
        assert!(matches!(
            PgBindValue::from_json(&Value::Null),
            Ok(PgBindValue::Null)
        ));
        assert!(matches!(
            PgBindValue::from_json(&json!(7)),
            Ok(PgBindValue::I64(7))
        ));
        assert!(matches!(
            PgBindValue::from_json(&json!(3.5)),
            Ok(PgBindValue::F64(_))
        ));
        assert!(matches!(
            PgBindValue::from_json(&json!("Mohammed")),
            Ok(PgBindValue::String(_))
        ));
    }

    #[test]
    fn nested_values_are_rejected() {
        assert!(PgBindValue::from_json(&json!([1, 2])).is_err());
        assert!(PgBindValue::from_json(&json!({"a": 1})).is_err());
    }
}
