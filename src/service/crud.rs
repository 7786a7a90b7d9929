//! Generic CRUD execution against PostgreSQL, parametrized by entity schema.

use crate::error::AppError;
use crate::model::EntitySchema;
use crate::page;
use crate::sql::{delete, insert, select_by_id, select_count, select_list, update, PgBindValue, QueryBuf};
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashMap;

pub struct CrudService;

impl CrudService {
    /// One page of rows ordered by id ascending, plus the total row count.
    /// Count and select run in one transaction so the window is validated
    /// against the same snapshot it slices.
    pub async fn list(
        pool: &PgPool,
        entity: &EntitySchema,
        page_num: i64,
    ) -> Result<(Vec<Value>, u64), AppError> {
        let mut tx = pool.begin().await?;
        let count_sql = select_count(entity);
        tracing::debug!(sql = %count_sql, "query");
        let total: i64 = sqlx::query_scalar(&count_sql).fetch_one(&mut *tx).await?;
        let total = total.max(0) as u64;

        let window = page::window(page_num, total)
            .map_err(|_| AppError::PageOutOfRange(entity.list_overflow))?;
        let q = select_list(entity, window.limit, window.offset);
        tracing::debug!(sql = %q.sql, "query");
        let rows = sqlx::query(&q.sql).fetch_all(&mut *tx).await?;
        tx.commit().await?;
        Ok((rows.iter().map(row_to_json).collect(), total))
    }

    /// Fetch one row by id. None when the id does not exist.
    pub async fn read(
        pool: &PgPool,
        entity: &EntitySchema,
        id: i64,
    ) -> Result<Option<Value>, AppError> {
        let q = select_by_id(entity, id);
        Self::fetch_optional_row(pool, &q).await
    }

    /// Insert one row; the id comes from the table's sequence. Returns the
    /// created row.
    pub async fn create(
        pool: &PgPool,
        entity: &EntitySchema,
        body: &HashMap<String, Value>,
    ) -> Result<Value, AppError> {
        let q = insert(entity, body);
        Self::fetch_optional_row(pool, &q)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    /// Replace one row by id. None when the id does not exist.
    pub async fn update(
        pool: &PgPool,
        entity: &EntitySchema,
        id: i64,
        body: &HashMap<String, Value>,
    ) -> Result<Option<Value>, AppError> {
        let q = update(entity, id, body);
        Self::fetch_optional_row(pool, &q).await
    }

    /// Remove one row by id. Returns the removed row, None when absent.
    pub async fn delete(
        pool: &PgPool,
        entity: &EntitySchema,
        id: i64,
    ) -> Result<Option<Value>, AppError> {
        let q = delete(entity, id);
        Self::fetch_optional_row(pool, &q).await
    }

    async fn fetch_optional_row(pool: &PgPool, q: &QueryBuf) -> Result<Option<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p)?);
        }
        let row = query.fetch_optional(pool).await?;
        Ok(row.as_ref().map(row_to_json))
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    Value::Null
}
