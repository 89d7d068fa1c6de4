use crate::{
    modules::{auth::middleware::Auth, basket::repository, menu_item},
    types::Context,
};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{post, Router},
};
use std::sync::Arc;

pub mod request {
    use crate::modules::auth::middleware::Auth;
    use serde::Deserialize;

    fn default_quantity() -> i32 {
        1
    }

    #[derive(Deserialize)]
    pub struct Body {
        pub menu_item_id: String,
        #[serde(default = "default_quantity")]
        pub quantity: i32,
    }

    pub struct Payload {
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
                Self::Basket(basket) => (StatusCode::CREATED, Json(json!(basket))).into_response(),
            }
        }
    }

    pub enum Error {
        MenuItemNotFound,
        QuantityOutOfRange,
        FailedToAddItem,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::MenuItemNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Menu item not found" })),
                )
                    .into_response(),
                Self::QuantityOutOfRange => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Quantity must be between 1 and 99" })),
                )
                    .into_response(),
                Self::FailedToAddItem => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to add item to basket" })),
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

    menu_item::repository::find_by_id(&ctx.db_conn.pool, payload.body.menu_item_id.clone())
        .await
        .map_err(|_| response::Error::FailedToAddItem)?
        .ok_or(response::Error::MenuItemNotFound)?;

    repository::upsert_item(
        &ctx.db_conn.pool,
        payload.auth.user.id,
        payload.body.menu_item_id,
        payload.body.quantity,
    )
    .await
    .map(response::Success::Basket)
    .map_err(|err| match err {
        repository::Error::MenuItemNotFound => response::Error::MenuItemNotFound,
        repository::Error::QuantityOutOfRange => response::Error::QuantityOutOfRange,
        _ => response::Error::FailedToAddItem,
    })
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Json(body): Json<request::Body>,
) -> impl IntoResponse {
    service(ctx, request::Payload { body, auth }).await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/", post(handler))
}
