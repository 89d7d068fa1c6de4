mod send_code;
mod sign_in;
mod sign_up;
mod verify_code;

use crate::types::Context;
use axum::routing::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(sign_up::get_router())
        .merge(sign_in::get_router())
        .merge(send_code::get_router())
        .merge(verify_code::get_router())
}
