//! Route definitions for the Procurement Management Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - purchase requests
        .nest("/purchase-requests", purchase_request_routes())
        // Protected routes - purchase orders
        .nest("/purchase-orders", purchase_order_routes())
        // Protected routes - budgets
        .nest("/budgets", budget_routes())
}

/// Purchase request workflow routes (protected)
fn purchase_request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_requests).post(handlers::create_request),
        )
        .route("/:request_id", get(handlers::get_request))
        .route("/:request_id/items", put(handlers::replace_items))
        .route("/:request_id/submit", post(handlers::submit_request))
        .route("/:request_id/approve", post(handlers::approve_request))
        .route("/:request_id/reject", post(handlers::reject_request))
        .route("/:request_id/cancel", post(handlers::cancel_request))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Purchase order routes (protected)
fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_orders).post(handlers::generate_order),
        )
        .route(
            "/:order_id",
            get(handlers::get_order).put(handlers::update_order),
        )
        .route("/:order_id/transition", post(handlers::transition_order))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Budget read routes (protected)
fn budget_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_budgets))
        .route("/:department_id", get(handlers::get_budget))
        .route_layer(middleware::from_fn(auth_middleware))
}
