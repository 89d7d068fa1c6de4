use crate::{
    modules::{auth::middleware::Auth, order::repository, user},
    types::Context,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{put, Router},
};
use std::sync::Arc;

pub mod request {
    use crate::modules::{auth::middleware::Auth, order::repository::OrderStatus};
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct Body {
        pub status: Option<OrderStatus>,
        pub special_instructions: Option<String>,
        pub delivery_address: Option<String>,
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

    use crate::modules::order::repository::{Order, OrderStatus};

    pub enum Success {
        Order(Order),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Order(order) => (StatusCode::OK, Json(json!(order))).into_response(),
            }
        }
    }

    pub enum Error {
        OrderNotFound,
        NotOrderOwner,
        OrderSettled(OrderStatus),
        InvalidTransition {
            from: OrderStatus,
            to: OrderStatus,
        },
        FailedToUpdateOrder,
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
                Self::OrderSettled(status) => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": format!(
                            "Cannot update an order with status {}",
                            status.to_string()
                        )
                    })),
                )
                    .into_response(),
                Self::InvalidTransition { from, to } => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": format!(
                            "Cannot transition order from {} to {}",
                            from.to_string(),
                            to.to_string()
                        )
                    })),
                )
                    .into_response(),
                Self::FailedToUpdateOrder => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to update order" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let order = repository::find_by_id(&ctx.db_conn.pool, payload.id.clone())
        .await
        .map_err(|_| response::Error::FailedToUpdateOrder)?
        .ok_or(response::Error::OrderNotFound)?;

    if !user::repository::is_admin(&payload.auth.user)
        && !repository::is_owner(&order, &payload.auth.user.id)
    {
        return Err(response::Error::NotOrderOwner);
    }

    if order.status.is_terminal() {
        return Err(response::Error::OrderSettled(order.status));
    }

    // The transition table is consulted before anything is written.
    if let Some(next) = payload.body.status.clone() {
        if !order.status.can_transition_to(&next) {
            return Err(response::Error::InvalidTransition {
                from: order.status,
                to: next,
            });
        }
    }

    repository::update_by_id(
        &ctx.db_conn.pool,
        payload.id,
        repository::UpdateOrderPayload {
            status: payload.body.status,
            special_instructions: payload.body.special_instructions,
            delivery_address: payload.body.delivery_address,
        },
    )
    .await
    .map_err(|_| response::Error::FailedToUpdateOrder)?
    .map(response::Success::Order)
    .ok_or(response::Error::OrderNotFound)
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
    Router::new().route("/:id", put(handler))
}
