use crate::{
    modules::{auth::middleware::AdminAuth, user::repository},
    types::Context,
    utils::pagination::Pagination,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, Router},
};
use std::sync::Arc;

pub mod request {
    use crate::utils::pagination::Pagination;

    pub struct Payload {
        pub pagination: Pagination,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::{modules::user::repository::User, utils::pagination::Paginated};

    pub enum Success {
        Users(Paginated<User>),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Users(users) => (StatusCode::OK, Json(json!(users))).into_response(),
            }
        }
    }

    pub enum Error {
        FailedToFetchUsers,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToFetchUsers => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch users" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    repository::find_many(&ctx.db_conn.pool, payload.pagination)
        .await
        .map(response::Success::Users)
        .map_err(|_| response::Error::FailedToFetchUsers)
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    _auth: AdminAuth,
    pagination: Pagination,
) -> impl IntoResponse {
    service(ctx, request::Payload { pagination }).await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/", get(handler))
}
