use crate::{
    modules::{auth::middleware::Auth, menu::repository, user::repository::Role},
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
        #[validate(length(min = 1, max = 100))]
        pub name: String,
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

    use crate::modules::menu::repository::Menu;

    pub enum Success {
        Menu(Menu),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Menu(menu) => (StatusCode::OK, Json(json!(menu))).into_response(),
            }
        }
    }

    pub enum Error {
        NotPermitted,
        MenuNotFound,
        NameTaken,
        FailedToUpdateMenu,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::NotPermitted => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "You cannot update menus" })),
                )
                    .into_response(),
                Self::MenuNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Menu not found" })),
                )
                    .into_response(),
                Self::NameTaken => (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Menu with this name already exists for this branch" })),
                )
                    .into_response(),
                Self::FailedToUpdateMenu => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to update menu" })),
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

    repository::update_by_id(
        &ctx.db_conn.pool,
        payload.id,
        payload.body.name.trim().to_string(),
    )
    .await
    .map_err(|err| match err {
        repository::Error::NameTaken => response::Error::NameTaken,
        _ => response::Error::FailedToUpdateMenu,
    })?
    .map(response::Success::Menu)
    .ok_or(response::Error::MenuNotFound)
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
