use crate::{
    modules::{auth::repository as auth_repository, auth::service as auth_service, user::repository},
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
        #[validate(length(min = 3, max = 30))]
        pub username: String,
        #[validate(email)]
        pub email: String,
        pub phone: Option<String>,
        #[validate(length(min = 8))]
        pub password: String,
    }

    pub struct Payload {
        pub body: Body,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        SignedUp(String),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::SignedUp(id) => (
                    StatusCode::CREATED,
                    Json(json!({ "message": "Account created successfully", "id": id })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        UsernameTaken,
        EmailTaken,
        FailedToSignUp,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::UsernameTaken => (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Username is already taken" })),
                )
                    .into_response(),
                Self::EmailTaken => (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Email is already taken" })),
                )
                    .into_response(),
                Self::FailedToSignUp => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to create account" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let hashed_password = auth_service::hash_password(payload.body.password.as_str())
        .map_err(|_| response::Error::FailedToSignUp)?;

    let user = repository::create(
        &ctx.db_conn.pool,
        repository::CreateUserPayload {
            username: payload.body.username,
            email: payload.body.email,
            phone: payload.body.phone,
            hashed_password,
        },
    )
    .await
    .map_err(|err| match err {
        repository::Error::UsernameTaken => response::Error::UsernameTaken,
        repository::Error::EmailTaken => response::Error::EmailTaken,
        _ => response::Error::FailedToSignUp,
    })?;

    let code = auth_repository::create_verification_code(
        &ctx.db_conn.pool,
        auth_repository::CreateVerificationCodePayload {
            email: Some(user.email.clone()),
            phone: user.phone.clone(),
        },
    )
    .await
    .map_err(|_| response::Error::FailedToSignUp)?;

    // Delivery failures are logged inside the mailer; sign-up still succeeds.
    let _ = notification::send(
        ctx,
        notification::Notification::VerificationCode {
            email: user.email.clone(),
            username: user.username.clone(),
            code: code.code,
        },
    )
    .await;

    Ok(response::Success::SignedUp(user.id))
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
    Router::new().route("/sign-up", post(handler))
}
