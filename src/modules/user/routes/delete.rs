use crate::{
    modules::{auth::middleware::Auth, user::repository},
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

    pub enum Success {
        UserDeleted,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::UserDeleted => (
                    StatusCode::OK,
                    Json(json!({ "message": "User deleted successfully" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        UserNotFound,
        NotOwnProfile,
        FailedToDeleteUser,
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
                    Json(json!({ "error": "You cannot delete this profile" })),
                )
                    .into_response(),
                Self::FailedToDeleteUser => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to delete user" })),
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

    match repository::deactivate(&ctx.db_conn.pool, payload.id).await {
        Ok(true) => Ok(response::Success::UserDeleted),
        Ok(false) => Err(response::Error::UserNotFound),
        Err(_) => Err(response::Error::FailedToDeleteUser),
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
