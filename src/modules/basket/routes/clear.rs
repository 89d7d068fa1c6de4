use crate::{
    modules::{auth::middleware::Auth, basket::repository},
    types::Context,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{delete, Router},
};
use std::sync::Arc;

pub mod request {
    use crate::modules::auth::middleware::Auth;

    pub struct Payload {
        pub auth: Auth,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        BasketCleared(u64),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::BasketCleared(removed) => (
                    StatusCode::OK,
                    Json(json!({ "message": "Basket cleared", "removed": removed })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        FailedToClearBasket,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToClearBasket => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to clear basket" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    repository::delete_by_user_id(&ctx.db_conn.pool, payload.auth.user.id)
        .await
        .map(response::Success::BasketCleared)
        .map_err(|_| response::Error::FailedToClearBasket)
}

async fn handler(State(ctx): State<Arc<Context>>, auth: Auth) -> impl IntoResponse {
    service(ctx, request::Payload { auth }).await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/", delete(handler))
}
