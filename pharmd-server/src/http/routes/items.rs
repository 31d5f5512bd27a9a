//! Item endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Item, ItemPatch, ItemRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::ValidationError;

/// Create item request
#[derive(Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
}

/// Partial update request; absent fields are left unchanged
#[derive(Deserialize, Default)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

/// Item response
#[derive(Serialize)]
pub struct ItemResponse {
    pub item_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

impl From<Item> for ItemResponse {
    fn from(i: Item) -> Self {
        Self {
            item_id: i.item_id,
            name: i.name,
            description: i.description,
            price: i.price,
        }
    }
}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "price",
            reason: "must be a non-negative number",
        });
    }
    Ok(())
}

/// GET /api/items - list all items
async fn list_items(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let items = ItemRepo::new(&state.pool).list().await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// POST /api/items - create a new item
async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    if req.name.is_empty() {
        return Err(ValidationError::Empty { field: "name" }.into());
    }
    validate_price(req.price)?;

    let item = ItemRepo::new(&state.pool)
        .create(&req.name, req.description.as_deref(), req.price)
        .await?;

    Ok((StatusCode::CREATED, Json(ItemResponse::from(item))))
}

/// GET /api/items/{item_id} - get item by id
async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = ItemRepo::new(&state.pool).get(&item_id).await?;
    Ok(Json(ItemResponse::from(item)))
}

/// PUT /api/items/{item_id} - partial update
async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    if let Some(price) = req.price {
        validate_price(price)?;
    }

    let patch = ItemPatch {
        name: req.name,
        description: req.description,
        price: req.price,
    };
    let item = ItemRepo::new(&state.pool).update(&item_id, patch).await?;
    Ok(Json(ItemResponse::from(item)))
}

/// DELETE /api/items/{item_id}
async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ItemRepo::new(&state.pool).delete(&item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Item routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{item_id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_validation() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(5.99).is_ok());
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn update_request_defaults_to_no_change() {
        let req: UpdateItemRequest = serde_json::from_str("{}").expect("parse");
        assert!(req.name.is_none());
        assert!(req.description.is_none());
        assert!(req.price.is_none());
    }
}
