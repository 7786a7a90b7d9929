//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from the entity model.

use crate::model::EntitySchema;
use serde_json::Value;
use std::collections::HashMap;

/// Quote identifier for PostgreSQL. Identifiers only ever come from the
/// static model, never from requests.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// API-visible columns: id first, then the model columns in declared order.
fn column_list(entity: &EntitySchema) -> String {
    let mut cols = vec![quoted(EntitySchema::PK)];
    cols.extend(entity.columns.iter().map(|c| quoted(c.name)));
    cols.join(", ")
}

/// SELECT one page ordered by id ascending.
pub fn select_list(entity: &EntitySchema, limit: u64, offset: u64) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {} LIMIT {} OFFSET {}",
        column_list(entity),
        quoted(entity.table_name),
        quoted(EntitySchema::PK),
        limit,
        offset
    );
    q
}

pub fn select_count(entity: &EntitySchema) -> String {
    format!("SELECT COUNT(*) FROM {}", quoted(entity.table_name))
}

pub fn select_by_id(entity: &EntitySchema, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::Number(id.into()));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}::bigint",
        column_list(entity),
        quoted(entity.table_name),
        quoted(EntitySchema::PK),
        n
    );
    q
}

/// INSERT every model column; absent optional fields bind as NULL so the row
/// shape is always complete. The id comes from the table's sequence.
pub fn insert(entity: &EntitySchema, body: &HashMap<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(entity.columns.len());
    let mut placeholders = Vec::with_capacity(entity.columns.len());
    for c in entity.columns {
        let val = body.get(c.name).cloned().unwrap_or(Value::Null);
        let n = q.push_param(val);
        cols.push(quoted(c.name));
        placeholders.push(format!("${}::{}", n, c.kind.pg_type()));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(entity.table_name),
        cols.join(", "),
        placeholders.join(", "),
        column_list(entity)
    );
    q
}

/// Full-record UPDATE by id: every model column is written (absent optional
/// fields become NULL) and updated_at is touched.
pub fn update(entity: &EntitySchema, id: i64, body: &HashMap<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(entity.columns.len() + 1);
    for c in entity.columns {
        let val = body.get(c.name).cloned().unwrap_or(Value::Null);
        let n = q.push_param(val);
        sets.push(format!("{} = ${}::{}", quoted(c.name), n, c.kind.pg_type()));
    }
    sets.push(format!("{} = NOW()", quoted("updated_at")));
    let id_param = q.push_param(Value::Number(id.into()));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}::bigint RETURNING {}",
        quoted(entity.table_name),
        sets.join(", "),
        quoted(EntitySchema::PK),
        id_param,
        column_list(entity)
    );
    q
}

/// DELETE by id, returning the removed row so absence is detectable.
pub fn delete(entity: &EntitySchema, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::Number(id.into()));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}::bigint RETURNING {}",
        quoted(entity.table_name),
        quoted(EntitySchema::PK),
        n,
        column_list(entity)
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{COURSES, ENROLLMENTS, STUDENTS};
    use serde_json::json;

    fn body(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn list_orders_by_id_with_window() {
        let q = select_list(&COURSES, 10, 20);
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"name\", \"semester\" FROM \"courses\" ORDER BY \"id\" LIMIT 10 OFFSET 20"
        );
        assert!(q.params.is_empty());
    }

    #[test]
    fn count_targets_the_table() {
        assert_eq!(select_count(&STUDENTS), "SELECT COUNT(*) FROM \"students\"");
    }

    #[test]
    fn select_by_id_binds_the_id() {
        let q = select_by_id(&COURSES, 4);
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"name\", \"semester\" FROM \"courses\" WHERE \"id\" = $1::bigint"
        );
        assert_eq!(q.params, vec![json!(4)]);
    }

    #[test]
    fn insert_covers_every_model_column() {
        let q = insert(
            &COURSES,
            &body(&[("name", json!("Discrete Mathematics")), ("semester", json!(2))]),
        );
        assert_eq!(
            q.sql,
            "INSERT INTO \"courses\" (\"name\", \"semester\") VALUES ($1::text, $2::bigint) \
             RETURNING \"id\", \"name\", \"semester\""
        );
        assert_eq!(q.params, vec![json!("Discrete Mathematics"), json!(2)]);
    }

    #[test]
    fn insert_binds_null_for_absent_optional_fields() {
        let q = insert(
            &ENROLLMENTS,
            &body(&[
                ("course_id", json!(1)),
                ("student_id", json!(1)),
                ("professor_id", json!(1)),
            ]),
        );
        assert_eq!(q.params[3], Value::Null);
        assert!(q.sql.contains("$4::double precision"));
    }

    #[test]
    fn update_replaces_the_full_record() {
        let q = update(
            &COURSES,
            4,
            &body(&[("name", json!("Operating Systems")), ("semester", json!(3))]),
        );
        assert_eq!(
            q.sql,
            "UPDATE \"courses\" SET \"name\" = $1::text, \"semester\" = $2::bigint, \
             \"updated_at\" = NOW() WHERE \"id\" = $3::bigint \
             RETURNING \"id\", \"name\", \"semester\""
        );
        assert_eq!(q.params[2], json!(4));
    }

    #[test]
    fn delete_returns_the_removed_row() {
        let q = delete(&COURSES, 9);
        assert_eq!(
            q.sql,
            "DELETE FROM \"courses\" WHERE \"id\" = $1::bigint RETURNING \"id\", \"name\", \"semester\""
        );
        assert_eq!(q.params, vec![json!(9)]);
    }
}
