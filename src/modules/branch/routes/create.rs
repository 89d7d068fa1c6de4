use crate::{
    modules::{
        auth::middleware::Auth,
        branch::repository,
        company,
        user::{self, repository::Role},
    },
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
    use crate::modules::auth::middleware::Auth;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    pub struct Body {
        #[validate(length(min = 3, max = 30))]
        pub username: String,
        pub phone: Option<String>,
        #[validate(range(min = -90.0, max = 90.0))]
        pub latitude: Option<f64>,
        #[validate(range(min = -180.0, max = 180.0))]
        pub longitude: Option<f64>,
        pub company_id: String,
        pub owner_id: Option<String>,
    }

    pub struct Payload {
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
                Self::Branch(branch) => (StatusCode::CREATED, Json(json!(branch))).into_response(),
            }
        }
    }

    pub enum Error {
        NotPermitted,
        UsernameTaken,
        CompanyNotFound,
        OwnerNotFound,
        FailedToCreateBranch,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::NotPermitted => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "You cannot create branches" })),
                )
                    .into_response(),
                Self::UsernameTaken => (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Branch with this username already exists" })),
                )
                    .into_response(),
                Self::CompanyNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Company not found" })),
                )
                    .into_response(),
                Self::OwnerNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Owner not found" })),
                )
                    .into_response(),
                Self::FailedToCreateBranch => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to create branch" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    if !matches!(payload.auth.user.role, Role::Admin | Role::Company) {
        return Err(response::Error::NotPermitted);
    }

    company::repository::find_by_id(&ctx.db_conn.pool, payload.body.company_id.clone())
        .await
        .map_err(|_| response::Error::FailedToCreateBranch)?
        .ok_or(response::Error::CompanyNotFound)?;

    if let Some(owner_id) = payload.body.owner_id.clone() {
        user::repository::find_by_id(&ctx.db_conn.pool, owner_id)
            .await
            .map_err(|_| response::Error::FailedToCreateBranch)?
            .ok_or(response::Error::OwnerNotFound)?;
    }

    repository::create(
        &ctx.db_conn.pool,
        repository::CreateBranchPayload {
            username: payload.body.username,
            phone: payload.body.phone,
            latitude: payload.body.latitude,
            longitude: payload.body.longitude,
            company_id: payload.body.company_id,
            owner_id: payload.body.owner_id,
        },
    )
    .await
    .map(response::Success::Branch)
    .map_err(|err| match err {
        repository::Error::UsernameTaken => response::Error::UsernameTaken,
        repository::Error::CompanyNotFound => response::Error::CompanyNotFound,
        _ => response::Error::FailedToCreateBranch,
    })
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Json(body): Json<request::Body>,
) -> axum::response::Response {
    if let Err(errors) = body.validate() {
        return validation::into_response(errors).into_response();
    }

    service(ctx, request::Payload { body, auth })
        .await
        .into_response()
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/", post(handler))
}
