use crate::{
    modules::{auth::middleware::Auth, company::repository},
    types::Context,
    utils::pagination::Pagination,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, Router},
};
use std::sync::Arc;

pub mod request {
    use crate::utils::pagination::Pagination;

    pub struct Payload {
        pub pagination: Pagination,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::{modules::company::repository::Company, utils::pagination::Paginated};

    pub enum Success {
        Companies(Paginated<Company>),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Companies(companies) => {
                    (StatusCode::OK, Json(json!(companies))).into_response()
                }
            }
        }
    }

    pub enum Error {
        FailedToFetchCompanies,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToFetchCompanies => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch companies" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    repository::find_many(&ctx.db_conn.pool, payload.pagination)
        .await
        .map(response::Success::Companies)
        .map_err(|_| response::Error::FailedToFetchCompanies)
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    _auth: Auth,
    pagination: Pagination,
) -> impl IntoResponse {
    service(ctx, request::Payload { pagination }).await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/", get(handler))
}
