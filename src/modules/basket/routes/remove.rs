use crate::{
    modules::{auth::middleware::Auth, basket::repository},
    types::Context,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, Router},
};
use std::sync::Arc;

pub mod request {
    use crate::modules::auth::middleware::Auth;

    pub struct Payload {
        pub id: String,
        pub auth: Auth,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        ItemRemoved,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::ItemRemoved => (
                    StatusCode::OK,
                    Json(json!({ "message": "Basket item removed" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        BasketNotFound,
        NotBasketOwner,
        FailedToRemoveItem,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::BasketNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Basket item not found" })),
                )
                    .into_response(),
                Self::NotBasketOwner => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "You do not own this basket item" })),
                )
                    .into_response(),
                Self::FailedToRemoveItem => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to remove basket item" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let basket = repository::find_by_id(&ctx.db_conn.pool, payload.id.clone())
        .await
        .map_err(|_| response::Error::FailedToRemoveItem)?
        .ok_or(response::Error::BasketNotFound)?;

    if basket.user_id != payload.auth.user.id {
        return Err(response::Error::NotBasketOwner);
    }

    match repository::delete_by_id(&ctx.db_conn.pool, payload.id).await {
        Ok(true) => Ok(response::Success::ItemRemoved),
        Ok(false) => Err(response::Error::BasketNotFound),
        Err(_) => Err(response::Error::FailedToRemoveItem),
    }
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Path(id): Path<String>,
) -> impl IntoResponse {
    service(ctx, request::Payload { id, auth }).await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/:id", delete(handler))
}
