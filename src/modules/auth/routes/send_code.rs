use crate::{
    modules::{auth::repository, user::repository as user_repository},
    types::Context,
    utils::{notification, validation},
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
    }

    pub struct Payload {
        pub body: Body,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        CodeSent,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::CodeSent => (
                    StatusCode::OK,
                    Json(json!({ "message": "Verification code sent" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        UserNotFound,
        FailedToSendCode,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::UserNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "User not found" })),
                )
                    .into_response(),
                Self::FailedToSendCode => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to send verification code" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let user = user_repository::find_by_email(&ctx.db_conn.pool, payload.body.email)
        .await
        .map_err(|_| response::Error::FailedToSendCode)?
        .ok_or(response::Error::UserNotFound)?;

    let code = repository::create_verification_code(
        &ctx.db_conn.pool,
        repository::CreateVerificationCodePayload {
            email: Some(user.email.clone()),
            phone: user.phone.clone(),
        },
    )
    .await
    .map_err(|_| response::Error::FailedToSendCode)?;

    notification::send(
        ctx,
        notification::Notification::VerificationCode {
            email: user.email,
            username: user.username,
            code: code.code,
        },
    )
    .await
    .map(|_| response::Success::CodeSent)
    .map_err(|_| response::Error::FailedToSendCode)
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
    Router::new().route("/verification/send-code", post(handler))
}
