use crate::{
    modules::{auth::middleware::Auth, order, payment::repository, user},
    types::Context,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, Router},
};
use std::sync::Arc;

pub mod request {
    use crate::modules::auth::middleware::Auth;

    pub struct Payload {
        pub order_id: String,
        pub auth: Auth,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::modules::payment::repository::Payment;

    pub enum Success {
        Payment(Payment),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Payment(payment) => (StatusCode::OK, Json(json!(payment))).into_response(),
            }
        }
    }

    pub enum Error {
        OrderNotFound,
        PaymentNotFound,
        NotOrderOwner,
        FailedToFetchPayment,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::OrderNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Order not found" })),
                )
                    .into_response(),
                Self::PaymentNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "No payment found for this order" })),
                )
                    .into_response(),
                Self::NotOrderOwner => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "You do not own this order" })),
                )
                    .into_response(),
                Self::FailedToFetchPayment => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch payment" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let order = order::repository::find_by_id(&ctx.db_conn.pool, payload.order_id)
        .await
        .map_err(|_| response::Error::FailedToFetchPayment)?
        .ok_or(response::Error::OrderNotFound)?;

    if !user::repository::is_admin(&payload.auth.user)
        && !order::repository::is_owner(&order, &payload.auth.user.id)
    {
        return Err(response::Error::NotOrderOwner);
    }

    repository::find_by_order_id(&ctx.db_conn.pool, order.id)
        .await
        .map_err(|_| response::Error::FailedToFetchPayment)?
        .map(response::Success::Payment)
        .ok_or(response::Error::PaymentNotFound)
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Path(order_id): Path<String>,
) -> impl IntoResponse {
    service(ctx, request::Payload { order_id, auth }).await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/order/:order_id", get(handler))
}
