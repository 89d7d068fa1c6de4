use crate::{
    modules::{auth::middleware::Auth, branch::repository, user},
    types::Context,
    utils::validation,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{put, Router},
};
use std::sync::Arc;
use validator::Validate;

pub mod request {
    use crate::modules::auth::middleware::Auth;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    pub struct Body {
        #[validate(length(min = 3, max = 30))]
        pub username: Option<String>,
        pub phone: Option<String>,
        #[validate(range(min = -90.0, max = 90.0))]
        pub latitude: Option<f64>,
        #[validate(range(min = -180.0, max = 180.0))]
        pub longitude: Option<f64>,
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
        NotBranchOwner,
        UsernameTaken,
        FailedToUpdateBranch,
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
                Self::UsernameTaken => (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Branch with this username already exists" })),
                )
                    .into_response(),
                Self::FailedToUpdateBranch => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to update branch" })),
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
        .map_err(|_| response::Error::FailedToUpdateBranch)?
        .ok_or(response::Error::BranchNotFound)?;

    let is_owner = branch.owner_id.as_deref() == Some(payload.auth.user.id.as_str());
    if !user::repository::is_admin(&payload.auth.user) && !is_owner {
        return Err(response::Error::NotBranchOwner);
    }

    repository::update_by_id(
        &ctx.db_conn.pool,
        payload.id,
        repository::UpdateBranchPayload {
            username: payload.body.username,
            phone: payload.body.phone,
            latitude: payload.body.latitude,
            longitude: payload.body.longitude,
        },
    )
    .await
    .map_err(|err| match err {
        repository::Error::UsernameTaken => response::Error::UsernameTaken,
        _ => response::Error::FailedToUpdateBranch,
    })?
    .map(response::Success::Branch)
    .ok_or(response::Error::BranchNotFound)
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Path(id): Path<String>,
    Json(body): Json<request::Body>,
) -> axum::response::Response {
    if let Err(errors) = body.validate() {
        return validation::into_response(errors).into_response();
    }

    service(ctx, request::Payload { id, body, auth })
        .await
        .into_response()
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/:id", put(handler))
}
