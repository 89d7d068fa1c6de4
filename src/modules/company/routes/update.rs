use crate::{
    modules::{auth::middleware::Auth, company::repository, user},
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
        pub name: Option<String>,
        #[validate(email)]
        pub email: Option<String>,
        pub phone: Option<String>,
        pub address: Option<String>,
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

    use crate::modules::company::repository::Company;

    pub enum Success {
        Company(Company),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Company(company) => (StatusCode::OK, Json(json!(company))).into_response(),
            }
        }
    }

    pub enum Error {
        CompanyNotFound,
        NotCompanyOwner,
        NameTaken,
        FailedToUpdateCompany,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::CompanyNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Company not found" })),
                )
                    .into_response(),
                Self::NotCompanyOwner => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "You do not own this company" })),
                )
                    .into_response(),
                Self::NameTaken => (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Company with this name already exists" })),
                )
                    .into_response(),
                Self::FailedToUpdateCompany => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to update company" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let company = repository::find_by_id(&ctx.db_conn.pool, payload.id.clone())
        .await
        .map_err(|_| response::Error::FailedToUpdateCompany)?
        .ok_or(response::Error::CompanyNotFound)?;

    let is_owner = company.owner_id.as_deref() == Some(payload.auth.user.id.as_str());
    if !user::repository::is_admin(&payload.auth.user) && !is_owner {
        return Err(response::Error::NotCompanyOwner);
    }

    repository::update_by_id(
        &ctx.db_conn.pool,
        payload.id,
        repository::UpdateCompanyPayload {
            name: payload.body.name,
            email: payload.body.email,
            phone: payload.body.phone,
            address: payload.body.address,
        },
    )
    .await
    .map_err(|err| match err {
        repository::Error::NameTaken => response::Error::NameTaken,
        _ => response::Error::FailedToUpdateCompany,
    })?
    .map(response::Success::Company)
    .ok_or(response::Error::CompanyNotFound)
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
