use crate::{
    modules::{
        auth::middleware::Auth,
        order::{self, repository::OrderStatus},
        payment::{repository, service as payment_service},
        user,
    },
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

    #[derive(Deserialize)]
    pub struct Body {
        pub order_id: String,
        pub currency: Option<String>,
    }

    pub struct Payload {
        pub body: Body,
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
                Self::Payment(payment) => {
                    (StatusCode::CREATED, Json(json!(payment))).into_response()
                }
            }
        }
    }

    pub enum Error {
        OrderNotFound,
        NotOrderOwner,
        OrderNotPayable,
        AlreadyPaid,
        FailedToCreateIntent,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::OrderNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Order not found" })),
                )
                    .into_response(),
                Self::NotOrderOwner => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "You do not own this order" })),
                )
                    .into_response(),
                Self::OrderNotPayable => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Order can no longer be paid for" })),
                )
                    .into_response(),
                Self::AlreadyPaid => (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Payment already completed for this order" })),
                )
                    .into_response(),
                Self::FailedToCreateIntent => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to create payment intent" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let order = order::repository::find_by_id(&ctx.db_conn.pool, payload.body.order_id.clone())
        .await
        .map_err(|_| response::Error::FailedToCreateIntent)?
        .ok_or(response::Error::OrderNotFound)?;

    if !user::repository::is_admin(&payload.auth.user)
        && !order::repository::is_owner(&order, &payload.auth.user.id)
    {
        return Err(response::Error::NotOrderOwner);
    }

    if !matches!(order.status, OrderStatus::Pending | OrderStatus::Confirmed) {
        return Err(response::Error::OrderNotPayable);
    }

    let existing = repository::find_by_order_id(&ctx.db_conn.pool, order.id.clone())
        .await
        .map_err(|_| response::Error::FailedToCreateIntent)?;

    if let Some(payment) = existing {
        if payment.status == repository::PaymentStatus::Succeeded {
            return Err(response::Error::AlreadyPaid);
        }
    }

    let currency = payload
        .body
        .currency
        .unwrap_or_else(|| ctx.payment.currency.clone());

    let intent = payment_service::create_payment_intent(ctx.clone(), &order, currency.as_str())
        .await
        .map_err(|_| response::Error::FailedToCreateIntent)?;

    tracing::info!(
        "Payment intent {} created for order {} ({})",
        intent.id,
        order.id,
        intent.status
    );

    let amount = payment_service::amount_in_cents(&order.total_amount)
        .map_err(|_| response::Error::FailedToCreateIntent)?;

    repository::upsert_for_order(
        &ctx.db_conn.pool,
        repository::UpsertPaymentPayload {
            order_id: order.id,
            intent_id: intent.id,
            client_secret: intent.client_secret,
            amount,
            currency,
        },
    )
    .await
    .map(response::Success::Payment)
    .map_err(|_| response::Error::FailedToCreateIntent)
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Json(body): Json<request::Body>,
) -> impl IntoResponse {
    service(ctx, request::Payload { body, auth }).await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/intent", post(handler))
}
