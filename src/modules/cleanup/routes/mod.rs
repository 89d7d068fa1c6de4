mod execute;
mod stats;

use crate::types::Context;
use axum::routing::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(stats::get_router())
        .merge(execute::get_router())
}
