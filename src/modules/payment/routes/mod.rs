mod create_intent;
mod get;
mod webhook;

use crate::types::Context;
use axum::routing::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(create_intent::get_router())
        .merge(get::get_router())
        .merge(webhook::get_router())
}
