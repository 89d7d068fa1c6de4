use crate::{
    modules::{auth::middleware::Auth, branch, menu::repository, user::repository::Role},
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
        #[validate(length(min = 1, max = 100))]
        pub name: String,
        pub branch_id: String,
    }

    pub struct Payload {
        pub body: Body,
        pub auth: Auth,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::modules::menu::repository::Menu;

    pub enum Success {
        Menu(Menu),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Menu(menu) => (StatusCode::CREATED, Json(json!(menu))).into_response(),
            }
        }
    }

    pub enum Error {
        NotPermitted,
        NameTaken,
        BranchNotFound,
        FailedToCreateMenu,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::NotPermitted => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "You cannot create menus" })),
                )
                    .into_response(),
                Self::NameTaken => (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Menu with this name already exists for this branch" })),
                )
                    .into_response(),
                Self::BranchNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Branch not found" })),
                )
                    .into_response(),
                Self::FailedToCreateMenu => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to create menu" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    if !matches!(
        payload.auth.user.role,
        Role::Admin | Role::Company | Role::Branch
    ) {
        return Err(response::Error::NotPermitted);
    }

    branch::repository::find_by_id(&ctx.db_conn.pool, payload.body.branch_id.clone())
        .await
        .map_err(|_| response::Error::FailedToCreateMenu)?
        .ok_or(response::Error::BranchNotFound)?;

    repository::create(
        &ctx.db_conn.pool,
        repository::CreateMenuPayload {
            name: payload.body.name.trim().to_string(),
            branch_id: payload.body.branch_id,
        },
    )
    .await
    .map(response::Success::Menu)
    .map_err(|err| match err {
        repository::Error::NameTaken => response::Error::NameTaken,
        repository::Error::BranchNotFound => response::Error::BranchNotFound,
        _ => response::Error::FailedToCreateMenu,
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
