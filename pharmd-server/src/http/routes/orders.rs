//! Order endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{NewOrderLine, Order, OrderRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::ValidationError;

/// Line in an order creation request
#[derive(Deserialize)]
pub struct OrderItemRequest {
    pub item_id: String,
    pub quantity: i32,
}

/// Create order request
#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: String,
    pub items: Vec<OrderItemRequest>,
}

/// Order response
#[derive(Serialize)]
pub struct OrderResponse {
    pub order_id: String,
    pub user_id: String,
    pub created_at: String,
    pub status: String,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            order_id: o.order_id,
            user_id: o.user_id,
            created_at: o.created_at.to_rfc3339(),
            status: o.status,
        }
    }
}

/// POST /api/orders - create a new order
async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    for line in &req.items {
        if line.quantity < 1 {
            return Err(ValidationError::OutOfRange {
                field: "quantity",
                reason: "must be at least 1",
            }
            .into());
        }
    }

    let lines: Vec<NewOrderLine> = req
        .items
        .into_iter()
        .map(|l| NewOrderLine {
            item_id: l.item_id,
            quantity: l.quantity,
        })
        .collect();

    let order = OrderRepo::new(&state.pool)
        .create(&req.user_id, &lines)
        .await?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(order))))
}

/// GET /api/orders/{order_id} - get order by id
async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = OrderRepo::new(&state.pool).get(&order_id).await?;
    Ok(Json(OrderResponse::from(order)))
}

/// Order routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/{order_id}", get(get_order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn response_renders_rfc3339() {
        let order = Order {
            order_id: "o1".into(),
            user_id: "u1".into(),
            created_at: Utc::now(),
            status: "pending".into(),
        };
        let resp = OrderResponse::from(order);
        assert_eq!(resp.status, "pending");
        assert!(resp.created_at.contains('T'));
    }
}
