use crate::{
    modules::{auth::middleware::Auth, company::repository},
    types::Context,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, Router},
};
use std::sync::Arc;

pub mod request {
    pub struct Payload {
        pub id: String,
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
        FailedToFetchCompany,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::CompanyNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Company not found" })),
                )
                    .into_response(),
                Self::FailedToFetchCompany => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch company" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    repository::find_by_id(&ctx.db_conn.pool, payload.id)
        .await
        .map_err(|_| response::Error::FailedToFetchCompany)?
        .map(response::Success::Company)
        .ok_or(response::Error::CompanyNotFound)
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    _auth: Auth,
    Path(id): Path<String>,
) -> impl IntoResponse {
    service(ctx, request::Payload { id }).await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/:id", get(handler))
}
