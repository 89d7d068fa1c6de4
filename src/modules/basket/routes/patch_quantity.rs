use crate::{
    modules::{auth::middleware::Auth, basket::repository},
    types::Context,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{patch, Router},
};
use std::sync::Arc;

pub mod request {
    use crate::modules::auth::middleware::Auth;
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct Body {
        pub quantity: i32,
    }

    pub struct Payload {
        pub id: String,
        pub body: Body,
        pub auth: Auth,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::modules::basket::repository::Basket;

    pub enum Success {
        Basket(Basket),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Basket(basket) => (StatusCode::OK, Json(json!(basket))).into_response(),
            }
        }
    }

    pub enum Error {
        BasketNotFound,
        NotBasketOwner,
        QuantityOutOfRange,
        FailedToUpdateBasket,
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
                Self::QuantityOutOfRange => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Quantity must be between 1 and 99" })),
                )
                    .into_response(),
                Self::FailedToUpdateBasket => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to update basket item" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    if !repository::quantity_in_range(payload.body.quantity) {
        return Err(response::Error::QuantityOutOfRange);
    }

    let basket = repository::find_by_id(&ctx.db_conn.pool, payload.id.clone())
        .await
        .map_err(|_| response::Error::FailedToUpdateBasket)?
        .ok_or(response::Error::BasketNotFound)?;

    if basket.user_id != payload.auth.user.id {
        return Err(response::Error::NotBasketOwner);
    }

    repository::update_quantity(&ctx.db_conn.pool, payload.id, payload.body.quantity)
        .await
        .map_err(|err| match err {
            repository::Error::QuantityOutOfRange => response::Error::QuantityOutOfRange,
            _ => response::Error::FailedToUpdateBasket,
        })?
        .map(response::Success::Basket)
        .ok_or(response::Error::BasketNotFound)
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Path(id): Path<String>,
    Json(body): Json<request::Body>,
) -> impl IntoResponse {
    service(ctx, request::Payload { id, body, auth }).await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/:id", patch(handler))
}
