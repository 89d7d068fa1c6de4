use crate::{
    modules::{auth::service as auth_service, user::repository},
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
        pub password: String,
    }

    pub struct Payload {
        pub body: Body,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use chrono::NaiveDateTime;
    use serde_json::json;

    pub enum Success {
        SignedIn {
            access_token: String,
            expires_at: NaiveDateTime,
        },
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::SignedIn {
                    access_token,
                    expires_at,
                } => (
                    StatusCode::OK,
                    Json(json!({ "access_token": access_token, "expires_at": expires_at })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        InvalidCredentials,
        FailedToSignIn,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "Invalid email or password" })),
                )
                    .into_response(),
                Self::FailedToSignIn => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to sign in" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let user = repository::find_by_email(&ctx.db_conn.pool, payload.body.email)
        .await
        .map_err(|_| response::Error::FailedToSignIn)?
        .ok_or(response::Error::InvalidCredentials)?;

    if !auth_service::verify_password(payload.body.password.as_str(), &user.hashed_password) {
        return Err(response::Error::InvalidCredentials);
    }

    let session = auth_service::issue_session(ctx, user.id)
        .await
        .map_err(|_| response::Error::FailedToSignIn)?;

    Ok(response::Success::SignedIn {
        access_token: session.id,
        expires_at: session.expires_at,
    })
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
    Router::new().route("/sign-in", post(handler))
}
