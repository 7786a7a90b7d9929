//! Standard response envelope: `{"success": bool, ...}` on every route.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct ItemBody<T> {
    pub success: bool,
    pub item: T,
}

#[derive(Serialize)]
pub struct ListBody<T> {
    pub success: bool,
    pub items: Vec<T>,
    pub total: u64,
}

/// Bare acknowledgement, used by delete.
#[derive(Serialize)]
pub struct StatusBody {
    pub success: bool,
}

#[derive(Serialize)]
pub struct MessageBody {
    pub success: bool,
    pub message: String,
}

pub fn success_item<T: Serialize>(item: T) -> Json<ItemBody<T>> {
    Json(ItemBody {
        success: true,
        item,
    })
}

pub fn success_list<T: Serialize>(items: Vec<T>, total: u64) -> Json<ListBody<T>> {
    Json(ListBody {
        success: true,
        items,
        total,
    })
}

pub fn success_status() -> Json<StatusBody> {
    Json(StatusBody { success: true })
}
