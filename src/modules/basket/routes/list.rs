use crate::{
    modules::{auth::middleware::Auth, basket::repository},
    types::Context,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, Router},
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
    use sqlx::types::BigDecimal;

    use crate::modules::basket::repository::BasketWithItem;

    pub enum Success {
        Baskets {
            baskets: Vec<BasketWithItem>,
            total: BigDecimal,
        },
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Baskets { baskets, total } => (
                    StatusCode::OK,
                    Json(json!({ "baskets": baskets, "total": total })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        FailedToFetchBasket,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToFetchBasket => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch basket" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let baskets = repository::find_many_with_items(&ctx.db_conn.pool, payload.auth.user.id)
        .await
        .map_err(|_| response::Error::FailedToFetchBasket)?;

    let total = repository::compute_total(&baskets);

    Ok(response::Success::Baskets { baskets, total })
}

async fn handler(State(ctx): State<Arc<Context>>, auth: Auth) -> impl IntoResponse {
    service(ctx, request::Payload { auth }).await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/", get(handler))
}
