use crate::{
    modules::{auth::middleware::Auth, menu_item::repository, user::repository::Role},
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
        MenuItemDeleted,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::MenuItemDeleted => (
                    StatusCode::OK,
                    Json(json!({ "message": "Menu item deleted successfully" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        NotPermitted,
        MenuItemNotFound,
        FailedToDeleteMenuItem,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::NotPermitted => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "You cannot delete menu items" })),
                )
                    .into_response(),
                Self::MenuItemNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Menu item not found" })),
                )
                    .into_response(),
                Self::FailedToDeleteMenuItem => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to delete menu item" })),
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

    match repository::deactivate(&ctx.db_conn.pool, payload.id).await {
        Ok(true) => Ok(response::Success::MenuItemDeleted),
        Ok(false) => Err(response::Error::MenuItemNotFound),
        Err(_) => Err(response::Error::FailedToDeleteMenuItem),
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
