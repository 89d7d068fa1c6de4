use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use super::{auth, basket, branch, cleanup, company, menu, menu_item, order, payment, user};
use crate::types::Context;
use std::sync::Arc;

async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "message": "Welcome to FoodCourt API" })),
    )
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", get(health_check))
        .nest("/auth", auth::get_router())
        .nest("/users", user::get_router())
        .nest("/companies", company::get_router())
        .nest("/branches", branch::get_router())
        .nest("/menus", menu::get_router())
        .nest("/menu-items", menu_item::get_router())
        .nest("/baskets", basket::get_router())
        .nest("/orders", order::get_router())
        .nest("/payments", payment::get_router())
        .nest("/cleanup", cleanup::get_router())
}
