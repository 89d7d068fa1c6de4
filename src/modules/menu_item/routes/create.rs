use crate::{
    modules::{auth::middleware::Auth, menu, menu_item::repository, user::repository::Role},
    types::Context,
    utils::validation,
};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{post, Router},
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
        pub name: String,
        pub description: Option<String>,
        pub price: BigDecimal,
        pub menu_id: String,
    }

    pub struct Payload {
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
                Self::MenuItem(item) => (StatusCode::CREATED, Json(json!(item))).into_response(),
            }
        }
    }

    pub enum Error {
        NotPermitted,
        MenuNotFound,
        NegativePrice,
        FailedToCreateMenuItem,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::NotPermitted => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "You cannot create menu items" })),
                )
                    .into_response(),
                Self::MenuNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Menu not found" })),
                )
                    .into_response(),
                Self::NegativePrice => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Price must not be negative" })),
                )
                    .into_response(),
                Self::FailedToCreateMenuItem => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to create menu item" })),
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

    if payload.body.price < BigDecimal::from(0) {
        return Err(response::Error::NegativePrice);
    }

    menu::repository::find_by_id(&ctx.db_conn.pool, payload.body.menu_id.clone())
        .await
        .map_err(|_| response::Error::FailedToCreateMenuItem)?
        .ok_or(response::Error::MenuNotFound)?;

    repository::create(
        &ctx.db_conn.pool,
        repository::CreateMenuItemPayload {
            name: payload.body.name,
            description: payload.body.description,
            price: payload.body.price,
            menu_id: payload.body.menu_id,
        },
    )
    .await
    .map(response::Success::MenuItem)
    .map_err(|err| match err {
        repository::Error::MenuNotFound => response::Error::MenuNotFound,
        repository::Error::NegativePrice => response::Error::NegativePrice,
        _ => response::Error::FailedToCreateMenuItem,
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
