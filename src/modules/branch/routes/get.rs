use crate::{
    modules::{auth::middleware::Auth, branch::repository},
    types::Context,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, Router},
};
use std::sync::Arc;

pub mod request {
    pub struct Payload {
        pub id: String,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::modules::branch::repository::Branch;

    pub enum Success {
        Branch(Branch),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Branch(branch) => (StatusCode::OK, Json(json!(branch))).into_response(),
            }
        }
    }

    pub enum Error {
        BranchNotFound,
        FailedToFetchBranch,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::BranchNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Branch not found" })),
                )
                    .into_response(),
                Self::FailedToFetchBranch => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch branch" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    repository::find_by_id(&ctx.db_conn.pool, payload.id)
        .await
        .map_err(|_| response::Error::FailedToFetchBranch)?
        .map(response::Success::Branch)
        .ok_or(response::Error::BranchNotFound)
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    _auth: Auth,
    Path(id): Path<String>,
) -> impl IntoResponse {
    service(ctx, request::Payload { id }).await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/:id", get(handler))
}
