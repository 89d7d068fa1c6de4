use crate::{
    modules::{
        auth::middleware::Auth,
        basket,
        branch,
        order::repository,
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
        /// Only admins may create an order on behalf of another user.
        pub user_id: Option<String>,
        pub branch_id: String,
        pub special_instructions: Option<String>,
        pub delivery_address: Option<String>,
    }

    pub struct Payload {
        pub body: Body,
        pub auth: Auth,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::modules::order::repository::FullOrder;

    pub enum Success {
        Order(FullOrder),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Order(order) => (StatusCode::CREATED, Json(json!(order))).into_response(),
            }
        }
    }

    pub enum Error {
        NotPermitted,
        UserNotFound,
        BranchNotFound,
        EmptyBasket,
        FailedToCreateOrder,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::NotPermitted => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "You cannot create orders for another user" })),
                )
                    .into_response(),
                Self::UserNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "User not found" })),
                )
                    .into_response(),
                Self::BranchNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Branch not found" })),
                )
                    .into_response(),
                Self::EmptyBasket => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "No basket items found for user" })),
                )
                    .into_response(),
                Self::FailedToCreateOrder => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to create order" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let user_id = match payload.body.user_id {
        Some(user_id) if user_id != payload.auth.user.id => {
            if !user::repository::is_admin(&payload.auth.user) {
                return Err(response::Error::NotPermitted);
            }

            user::repository::find_by_id(&ctx.db_conn.pool, user_id.clone())
                .await
                .map_err(|_| response::Error::FailedToCreateOrder)?
                .ok_or(response::Error::UserNotFound)?;

            user_id
        }
        _ => payload.auth.user.id.clone(),
    };

    branch::repository::find_by_id(&ctx.db_conn.pool, payload.body.branch_id.clone())
        .await
        .map_err(|_| response::Error::FailedToCreateOrder)?
        .ok_or(response::Error::BranchNotFound)?;

    let code = repository::allocate_code(&ctx.db_conn.pool)
        .await
        .map_err(|_| response::Error::FailedToCreateOrder)?;

    let mut tx = ctx.db_conn.pool.begin().await.map_err(|err| {
        tracing::error!("Failed to start database transaction: {}", err);
        response::Error::FailedToCreateOrder
    })?;

    let baskets =
        basket::repository::find_many_with_items_for_update(&mut *tx, user_id.clone())
            .await
            .map_err(|_| response::Error::FailedToCreateOrder)?;

    if baskets.is_empty() {
        return Err(response::Error::EmptyBasket);
    }

    let order = repository::create(
        &mut tx,
        repository::CreateOrderPayload {
            code,
            user_id,
            branch_id: payload.body.branch_id,
            special_instructions: payload.body.special_instructions,
            delivery_address: payload.body.delivery_address,
            baskets,
        },
    )
    .await
    .map_err(|_| response::Error::FailedToCreateOrder)?;

    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit database transaction: {}", err);
        response::Error::FailedToCreateOrder
    })?;

    tracing::info!("Order created with code {}", order.order.code);

    Ok(response::Success::Order(order))
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
