//! Purchase request HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::purchase_request::{
    ApproveInput, CreateRequestInput, PurchaseRequestService, RejectInput, RequestItemInput,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RequestListQuery {
    pub department_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceItemsInput {
    pub items: Vec<RequestItemInput>,
}

/// Create a draft purchase request
pub async fn create_request(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateRequestInput>,
) -> impl IntoResponse {
    let service = PurchaseRequestService::new(state.db.clone());

    match service.create_request(&current_user.0, input).await {
        Ok(request) => (StatusCode::CREATED, Json(request)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// List purchase requests
pub async fn list_requests(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<RequestListQuery>,
) -> impl IntoResponse {
    let service = PurchaseRequestService::new(state.db.clone());

    match service.list_requests(query.department_id).await {
        Ok(requests) => (
            StatusCode::OK,
            Json(serde_json::json!({ "purchase_requests": requests })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a purchase request with items and approval history
pub async fn get_request(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(request_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PurchaseRequestService::new(state.db.clone());

    match service.get_request(request_id).await {
        Ok(request) => (StatusCode::OK, Json(request)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Replace the items of a draft request
pub async fn replace_items(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(request_id): Path<Uuid>,
    Json(input): Json<ReplaceItemsInput>,
) -> impl IntoResponse {
    let service = PurchaseRequestService::new(state.db.clone());

    match service
        .replace_items(&current_user.0, request_id, input.items)
        .await
    {
        Ok(request) => (StatusCode::OK, Json(request)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Submit a draft request for approval
pub async fn submit_request(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(request_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PurchaseRequestService::new(state.db.clone());

    match service.submit(&current_user.0, request_id).await {
        Ok(request) => (StatusCode::OK, Json(request)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Approve a pending request at the manager or finance level
pub async fn approve_request(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(request_id): Path<Uuid>,
    Json(input): Json<ApproveInput>,
) -> impl IntoResponse {
    let service = PurchaseRequestService::new(state.db.clone());

    match service.approve(&current_user.0, request_id, input).await {
        Ok(request) => (StatusCode::OK, Json(request)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Reject a pending request
pub async fn reject_request(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(request_id): Path<Uuid>,
    Json(input): Json<RejectInput>,
) -> impl IntoResponse {
    let service = PurchaseRequestService::new(state.db.clone());

    match service.reject(&current_user.0, request_id, input).await {
        Ok(request) => (StatusCode::OK, Json(request)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Cancel a request as its requester
pub async fn cancel_request(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(request_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PurchaseRequestService::new(state.db.clone());

    match service.cancel(&current_user.0, request_id).await {
        Ok(request) => (StatusCode::OK, Json(request)).into_response(),
        Err(e) => e.into_response(),
    }
}
