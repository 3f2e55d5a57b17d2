//! Purchase order HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::OrderStatus;
use crate::services::purchase_order::{
    GenerateOrderInput, PurchaseOrderService, TransitionInput, UpdateOrderInput,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
}

fn configured_tax_rate(state: &AppState) -> AppResult<Decimal> {
    state
        .config
        .procurement
        .tax_rate()
        .ok_or_else(|| AppError::Internal("invalid default_tax_rate in configuration".to_string()))
}

/// Generate a purchase order from an approved purchase request
pub async fn generate_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<GenerateOrderInput>,
) -> impl IntoResponse {
    let service = PurchaseOrderService::new(state.db.clone());

    let default_tax_rate = match configured_tax_rate(&state) {
        Ok(rate) => rate,
        Err(e) => return e.into_response(),
    };

    match service
        .generate(&current_user.0, input, default_tax_rate)
        .await
    {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// List purchase orders
pub async fn list_orders(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<OrderListQuery>,
) -> impl IntoResponse {
    let service = PurchaseOrderService::new(state.db.clone());

    match service.list_orders(query.status).await {
        Ok(orders) => (
            StatusCode::OK,
            Json(serde_json::json!({ "purchase_orders": orders })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a purchase order with its items
pub async fn get_order(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PurchaseOrderService::new(state.db.clone());

    match service.get_order(order_id).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Edit a draft purchase order
pub async fn update_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateOrderInput>,
) -> impl IntoResponse {
    let service = PurchaseOrderService::new(state.db.clone());

    match service.update_draft(&current_user.0, order_id, input).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Move a purchase order along the fulfillment path
pub async fn transition_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<TransitionInput>,
) -> impl IntoResponse {
    let service = PurchaseOrderService::new(state.db.clone());

    match service.transition(&current_user.0, order_id, input).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}
