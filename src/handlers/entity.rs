//! Entity CRUD handlers: list, read, create, update, delete.
//! Each handler resolves the entity from the path segment, so the four
//! record families share one set of handlers.

use crate::error::AppError;
use crate::model::{self, EntitySchema};
use crate::response::{success_item, success_list, success_status};
use crate::service::{CrudService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

fn resolve_entity(path_segment: &str) -> Result<&'static EntitySchema, AppError> {
    model::entity_by_path(path_segment).ok_or(AppError::NotFound)
}

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}

fn body_to_map(value: Value) -> Result<HashMap<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m.into_iter().collect()),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// Extract and validate a write body in one step.
fn write_body(
    body: Result<Json<Value>, JsonRejection>,
    entity: &EntitySchema,
) -> Result<HashMap<String, Value>, AppError> {
    let Json(value) = body.map_err(|e| AppError::BadRequest(e.to_string()))?;
    let map = body_to_map(value)?;
    RequestValidator::validate(&map, entity)?;
    Ok(map)
}

/// `page` defaults to 1; a non-numeric value falls back to the default
/// rather than failing the request.
fn page_param(params: &HashMap<String, String>) -> i64 {
    params
        .get("page")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1)
}

pub async fn list(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let entity = resolve_entity(&path_segment)?;
    let page = page_param(&params);
    let (items, total) = CrudService::list(&state.pool, entity, page).await?;
    Ok(success_list(items, total))
}

pub async fn read(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let entity = resolve_entity(&path_segment)?;
    let id = parse_id(&id_str)?;
    let row = CrudService::read(&state.pool, entity, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(success_item(row))
}

pub async fn create(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let entity = resolve_entity(&path_segment)?;
    let body = write_body(body, entity)?;
    let row = CrudService::create(&state.pool, entity, &body).await?;
    Ok(success_item(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let entity = resolve_entity(&path_segment)?;
    let id = parse_id(&id_str)?;
    let body = write_body(body, entity)?;
    let row = CrudService::update(&state.pool, entity, id, &body)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(success_item(row))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let entity = resolve_entity(&path_segment)?;
    let id = parse_id(&id_str)?;
    CrudService::delete(&state.pool, entity, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(success_status())
}
