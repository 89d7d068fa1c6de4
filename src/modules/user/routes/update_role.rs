use crate::{
    modules::{
        auth::middleware::Auth,
        user::{permissions, repository},
    },
    types::Context,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{put, Router},
};
use std::sync::Arc;

pub mod request {
    use crate::modules::{auth::middleware::Auth, user::repository::Role};
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct Body {
        pub role: Role,
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
        RoleNotAssignable,
        UserNotFound,
        FailedToUpdateRole,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::RoleNotAssignable => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "You cannot assign this role" })),
                )
                    .into_response(),
                Self::UserNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "User not found" })),
                )
                    .into_response(),
                Self::FailedToUpdateRole => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to update role" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    if !permissions::can_assign(&payload.auth.user.role, &payload.body.role) {
        return Err(response::Error::RoleNotAssignable);
    }

    repository::update_role(&ctx.db_conn.pool, payload.id, payload.body.role)
        .await
        .map_err(|_| response::Error::FailedToUpdateRole)?
        .map(response::Success::User)
        .ok_or(response::Error::UserNotFound)
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
    Router::new().route("/:id/role", put(handler))
}
