use crate::{
    modules::{auth::middleware::Auth, order::repository, user},
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

    use crate::modules::order::repository::OrderStatus;

    pub enum Success {
        OrderDeleted,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::OrderDeleted => (
                    StatusCode::OK,
                    Json(json!({ "message": "Order deleted successfully" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        OrderNotFound,
        NotOrderOwner,
        InvalidState(OrderStatus),
        FailedToDeleteOrder,
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
                Self::InvalidState(status) => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": format!(
                            "Cannot delete an order with status {}",
                            status.to_string()
                        )
                    })),
                )
                    .into_response(),
                Self::FailedToDeleteOrder => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to delete order" })),
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
        .map_err(|_| response::Error::FailedToDeleteOrder)?
        .ok_or(response::Error::OrderNotFound)?;

    if !user::repository::is_admin(&payload.auth.user)
        && !repository::is_owner(&order, &payload.auth.user.id)
    {
        return Err(response::Error::NotOrderOwner);
    }

    if !order.status.is_deletable() {
        return Err(response::Error::InvalidState(order.status));
    }

    match repository::deactivate(&ctx.db_conn.pool, payload.id).await {
        Ok(true) => Ok(response::Success::OrderDeleted),
        Ok(false) => Err(response::Error::OrderNotFound),
        Err(_) => Err(response::Error::FailedToDeleteOrder),
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
