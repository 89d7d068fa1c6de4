use crate::{
    modules::{auth::middleware::Auth, menu_item::repository, user::repository::Role},
    types::Context,
    utils::validation,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{put, Router},
};
use bigdecimal::BigDecimal;
use std::sync::Arc;
use validator::Validate;

pub mod request {
    use crate::modules::auth::middleware::Auth;
    use bigdecimal::BigDecimal;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    pub struct Body {
        #[validate(length(min = 1, max = 100))]
        pub name: Option<String>,
        pub description: Option<String>,
        pub price: Option<BigDecimal>,
        pub is_available: Option<bool>,
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

    use crate::modules::menu_item::repository::MenuItem;

    pub enum Success {
        MenuItem(MenuItem),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::MenuItem(item) => (StatusCode::OK, Json(json!(item))).into_response(),
            }
        }
    }

    pub enum Error {
        NotPermitted,
        MenuItemNotFound,
        NegativePrice,
        FailedToUpdateMenuItem,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::NotPermitted => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "You cannot update menu items" })),
                )
                    .into_response(),
                Self::MenuItemNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Menu item not found" })),
                )
                    .into_response(),
                Self::NegativePrice => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Price must not be negative" })),
                )
                    .into_response(),
                Self::FailedToUpdateMenuItem => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to update menu item" })),
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

    if let Some(price) = payload.body.price.as_ref() {
        if *price < BigDecimal::from(0) {
            return Err(response::Error::NegativePrice);
        }
    }

    repository::update_by_id(
        &ctx.db_conn.pool,
        payload.id,
        repository::UpdateMenuItemPayload {
            name: payload.body.name,
            description: payload.body.description,
            price: payload.body.price,
            is_available: payload.body.is_available,
        },
    )
    .await
    .map_err(|err| match err {
        repository::Error::NegativePrice => response::Error::NegativePrice,
        _ => response::Error::FailedToUpdateMenuItem,
    })?
    .map(response::Success::MenuItem)
    .ok_or(response::Error::MenuItemNotFound)
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
