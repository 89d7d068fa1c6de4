use crate::{
    modules::{auth::repository, user::repository as user_repository},
    types::Context,
    utils::validation,
};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{post, Router},
};
use std::sync::Arc;
use validator::Validate;

pub mod request {
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    pub struct Body {
        #[validate(email)]
        pub email: String,
        #[validate(length(equal = 6))]
        pub code: String,
    }

    pub struct Payload {
        pub body: Body,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        Verified,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Verified => (
                    StatusCode::OK,
                    Json(json!({ "message": "Account verified successfully" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        UserNotFound,
        InvalidCode,
        FailedToVerify,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::UserNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "User not found" })),
                )
                    .into_response(),
                Self::InvalidCode => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid or expired verification code" })),
                )
                    .into_response(),
                Self::FailedToVerify => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to verify account" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let user = user_repository::find_by_email(&ctx.db_conn.pool, payload.body.email.clone())
        .await
        .map_err(|_| response::Error::FailedToVerify)?
        .ok_or(response::Error::UserNotFound)?;

    let code = repository::find_valid_code_by_email(
        &ctx.db_conn.pool,
        payload.body.email,
        payload.body.code,
    )
    .await
    .map_err(|_| response::Error::FailedToVerify)?
    .ok_or(response::Error::InvalidCode)?;

    let mut tx = ctx.db_conn.pool.begin().await.map_err(|err| {
        tracing::error!("Failed to start database transaction: {}", err);
        response::Error::FailedToVerify
    })?;

    repository::mark_code_used(&mut *tx, code.id)
        .await
        .map_err(|_| response::Error::FailedToVerify)?;

    user_repository::mark_verified(&mut *tx, user.id)
        .await
        .map_err(|_| response::Error::FailedToVerify)?;

    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit database transaction: {}", err);
        response::Error::FailedToVerify
    })?;

    Ok(response::Success::Verified)
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    Json(body): Json<request::Body>,
) -> axum::response::Response {
    if let Err(errors) = body.validate() {
        return validation::into_response(errors).into_response();
    }

    service(ctx, request::Payload { body }).await.into_response()
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/verification/verify-code", post(handler))
}
