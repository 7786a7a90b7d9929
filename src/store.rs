//! Database bootstrap: create the database if missing, then the four tables.
//! DDL is generated from the entity model.

use crate::error::AppError;
use crate::model::{ColumnKind, EntitySchema, ENTITIES};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// CREATE TABLE IF NOT EXISTS for one entity. Every table gets a BIGSERIAL
/// id plus created_at/updated_at maintained by the store; reference columns
/// carry real foreign keys so a dangling enrollment is rejected at insert.
fn create_table_sql(entity: &EntitySchema) -> String {
    let mut defs = vec![format!(
        "{} BIGSERIAL PRIMARY KEY",
        quote_ident(EntitySchema::PK)
    )];
    for c in entity.columns {
        let mut def = format!("{} {}", quote_ident(c.name), c.kind.pg_type());
        if c.required {
            def.push_str(" NOT NULL");
        }
        if c.unique {
            def.push_str(" UNIQUE");
        }
        if let ColumnKind::Reference(table) = c.kind {
            def.push_str(&format!(
                " REFERENCES {} ({})",
                quote_ident(table),
                quote_ident(EntitySchema::PK)
            ));
        }
        defs.push(def);
    }
    defs.push(format!(
        "{} TIMESTAMPTZ NOT NULL DEFAULT NOW()",
        quote_ident("created_at")
    ));
    defs.push(format!(
        "{} TIMESTAMPTZ NOT NULL DEFAULT NOW()",
        quote_ident("updated_at")
    ));
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(entity.table_name),
        defs.join(", ")
    )
}

/// Create all entity tables if absent. ENTITIES is ordered so referenced
/// tables exist before enrollments.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    for entity in ENTITIES {
        let ddl = create_table_sql(entity);
        tracing::debug!(table = entity.table_name, sql = %ddl, "ddl");
        sqlx::query(&ddl).execute(pool).await?;
    }
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects
/// to the server's `postgres` database to run CREATE DATABASE. Call before
/// creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (maintenance_url, db_name) = split_database_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&maintenance_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

/// Split a connection URL into (same server pointed at `postgres`, database
/// name). The name is whatever follows the last `/`, query string stripped.
fn split_database_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL has no database path".into()))?
        + 1;
    let db_name = url
        .get(path_start..)
        .unwrap_or("")
        .split('?')
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    let maintenance_url = format!("{}postgres", url.get(..path_start).unwrap_or(url));
    Ok((maintenance_url, db_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{COURSES, ENROLLMENTS};

    #[test]
    fn course_table_ddl() {
        assert_eq!(
            create_table_sql(&COURSES),
            "CREATE TABLE IF NOT EXISTS \"courses\" (\
             \"id\" BIGSERIAL PRIMARY KEY, \
             \"name\" text NOT NULL, \
             \"semester\" bigint NOT NULL, \
             \"created_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
             \"updated_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW())"
        );
    }

    #[test]
    fn enrollment_ddl_carries_foreign_keys() {
        let ddl = create_table_sql(&ENROLLMENTS);
        assert!(ddl.contains("\"course_id\" bigint NOT NULL REFERENCES \"courses\" (\"id\")"));
        assert!(ddl.contains("\"student_id\" bigint NOT NULL REFERENCES \"students\" (\"id\")"));
        assert!(ddl.contains("\"professor_id\" bigint NOT NULL REFERENCES \"professors\" (\"id\")"));
        assert!(ddl.contains("\"grade\" double precision,"));
    }

    #[test]
    fn unique_email_is_declared() {
        let ddl = create_table_sql(&crate::model::STUDENTS);
        assert!(ddl.contains("\"email\" text NOT NULL UNIQUE"));
    }

    #[test]
    fn maintenance_url_points_at_postgres() {
        let (admin, name) =
            split_database_url("postgres://user:pw@localhost:5432/registrar").unwrap();
        assert_eq!(admin, "postgres://user:pw@localhost:5432/postgres");
        assert_eq!(name, "registrar");
    }

    #[test]
    fn query_string_is_stripped_from_db_name() {
        let (_, name) =
            split_database_url("postgres://localhost/registrar?sslmode=disable").unwrap();
        assert_eq!(name, "registrar");
    }
}
