use crate::{
    modules::{auth::middleware::Auth, user::repository},
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
        pub id: String,
        pub auth: Auth,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::modules::user::repository::User;

    pub enum Success {
        User(User),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::User(user) => (StatusCode::OK, Json(json!(user))).into_response(),
            }
        }
    }

    pub enum Error {
        UserNotFound,
        NotOwnProfile,
        FailedToFetchUser,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::UserNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "User not found" })),
                )
                    .into_response(),
                Self::NotOwnProfile => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "You cannot view this profile" })),
                )
                    .into_response(),
                Self::FailedToFetchUser => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch user" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    if !repository::is_admin(&payload.auth.user) && payload.auth.user.id != payload.id {
        return Err(response::Error::NotOwnProfile);
    }

    // Admins can inspect soft-deleted accounts.
    let user = if repository::is_admin(&payload.auth.user) {
        repository::find_by_id_with_inactive(&ctx.db_conn.pool, payload.id).await
    } else {
        repository::find_by_id(&ctx.db_conn.pool, payload.id).await
    };

    user.map_err(|_| response::Error::FailedToFetchUser)?
        .map(response::Success::User)
        .ok_or(response::Error::UserNotFound)
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Path(id): Path<String>,
) -> impl IntoResponse {
    service(ctx, request::Payload { id, auth }).await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/:id", get(handler))
}
