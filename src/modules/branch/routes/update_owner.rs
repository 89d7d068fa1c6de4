use crate::{
    modules::{auth::middleware::AdminAuth, branch::repository, user},
    types::Context,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{put, Router},
};
use std::sync::Arc;

pub mod request {
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct Body {
        pub owner_id: String,
    }

    pub struct Payload {
        pub id: String,
        pub body: Body,
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
        OwnerNotFound,
        FailedToUpdateOwner,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::BranchNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Branch not found" })),
                )
                    .into_response(),
                Self::OwnerNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Owner not found" })),
                )
                    .into_response(),
                Self::FailedToUpdateOwner => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to update branch owner" })),
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
        .map_err(|_| response::Error::FailedToUpdateOwner)?
        .ok_or(response::Error::BranchNotFound)?;

    // Reassigning to the current owner is a no-op.
    if branch.owner_id.as_deref() == Some(payload.body.owner_id.as_str()) {
        return Ok(response::Success::Branch(branch));
    }

    user::repository::find_by_id(&ctx.db_conn.pool, payload.body.owner_id.clone())
        .await
        .map_err(|_| response::Error::FailedToUpdateOwner)?
        .ok_or(response::Error::OwnerNotFound)?;

    repository::update_owner(&ctx.db_conn.pool, payload.id, payload.body.owner_id)
        .await
        .map_err(|_| response::Error::FailedToUpdateOwner)?
        .map(response::Success::Branch)
        .ok_or(response::Error::BranchNotFound)
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    _auth: AdminAuth,
    Path(id): Path<String>,
    Json(body): Json<request::Body>,
) -> impl IntoResponse {
    service(ctx, request::Payload { id, body }).await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/:id/owner", put(handler))
}
