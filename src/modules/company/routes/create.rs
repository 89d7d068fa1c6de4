use crate::{
    modules::{auth::middleware::AdminAuth, company::repository, user},
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
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    pub struct Body {
        #[validate(length(min = 1, max = 100))]
        pub name: String,
        #[validate(email)]
        pub email: Option<String>,
        pub phone: Option<String>,
        pub address: Option<String>,
        pub owner_id: Option<String>,
    }

    pub struct Payload {
        pub body: Body,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::modules::company::repository::Company;

    pub enum Success {
        Company(Company),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Company(company) => {
                    (StatusCode::CREATED, Json(json!(company))).into_response()
                }
            }
        }
    }

    pub enum Error {
        NameTaken,
        OwnerNotFound,
        FailedToCreateCompany,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::NameTaken => (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Company with this name already exists" })),
                )
                    .into_response(),
                Self::OwnerNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Owner not found" })),
                )
                    .into_response(),
                Self::FailedToCreateCompany => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to create company" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    if let Some(owner_id) = payload.body.owner_id.clone() {
        user::repository::find_by_id(&ctx.db_conn.pool, owner_id)
            .await
            .map_err(|_| response::Error::FailedToCreateCompany)?
            .ok_or(response::Error::OwnerNotFound)?;
    }

    repository::create(
        &ctx.db_conn.pool,
        repository::CreateCompanyPayload {
            name: payload.body.name,
            email: payload.body.email,
            phone: payload.body.phone,
            address: payload.body.address,
            owner_id: payload.body.owner_id,
        },
    )
    .await
    .map(response::Success::Company)
    .map_err(|err| match err {
        repository::Error::NameTaken => response::Error::NameTaken,
        repository::Error::OwnerNotFound => response::Error::OwnerNotFound,
        _ => response::Error::FailedToCreateCompany,
    })
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    _auth: AdminAuth,
    Json(body): Json<request::Body>,
) -> axum::response::Response {
    if let Err(errors) = body.validate() {
        return validation::into_response(errors).into_response();
    }

    service(ctx, request::Payload { body }).await.into_response()
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/", post(handler))
}
