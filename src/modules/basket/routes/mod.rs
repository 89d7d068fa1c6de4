mod add;
mod clear;
mod list;
mod patch_quantity;
mod remove;
mod update;

use crate::types::Context;
use axum::routing::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(add::get_router())
        .merge(list::get_router())
        .merge(update::get_router())
        .merge(patch_quantity::get_router())
        .merge(remove::get_router())
        .merge(clear::get_router())
}
