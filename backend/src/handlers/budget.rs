//! Budget HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::BudgetService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct BudgetQuery {
    /// Fiscal year; defaults to the current calendar year
    pub year: Option<i32>,
}

/// List all department budgets for a fiscal year
pub async fn list_budgets(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<BudgetQuery>,
) -> impl IntoResponse {
    let service = BudgetService::new(state.db.clone());
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    match service.list_budgets(year).await {
        Ok(budgets) => (
            StatusCode::OK,
            Json(serde_json::json!({ "budgets": budgets })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get one department's budget snapshot
pub async fn get_budget(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(department_id): Path<Uuid>,
    Query(query): Query<BudgetQuery>,
) -> impl IntoResponse {
    let service = BudgetService::new(state.db.clone());
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    match service.get_budget(department_id, year).await {
        Ok(budget) => (StatusCode::OK, Json(budget)).into_response(),
        Err(e) => e.into_response(),
    }
}
