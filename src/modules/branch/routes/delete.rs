use crate::{
    modules::{auth::middleware::Auth, branch::repository, user},
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
        BranchDeleted,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::BranchDeleted => (
                    StatusCode::OK,
                    Json(json!({ "message": "Branch deleted successfully" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        BranchNotFound,
        NotBranchOwner,
        FailedToDeleteBranch,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::BranchNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Branch not found" })),
                )
                    .into_response(),
                Self::NotBranchOwner => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "You do not own this branch" })),
                )
                    .into_response(),
                Self::FailedToDeleteBranch => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to delete branch" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let branch = repository::find_by_id(&ctx.db_conn.pool, payload.id.clone())
        .await
        .map_err(|_| response::Error::FailedToDeleteBranch)?
        .ok_or(response::Error::BranchNotFound)?;

    let is_owner = branch.owner_id.as_deref() == Some(payload.auth.user.id.as_str());
    if !user::repository::is_admin(&payload.auth.user) && !is_owner {
        return Err(response::Error::NotBranchOwner);
    }

    match repository::deactivate(&ctx.db_conn.pool, payload.id).await {
        Ok(true) => Ok(response::Success::BranchDeleted),
        Ok(false) => Err(response::Error::BranchNotFound),
        Err(_) => Err(response::Error::FailedToDeleteBranch),
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
