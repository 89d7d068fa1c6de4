use crate::{
    modules::{auth::middleware::Auth, branch::repository},
    types::Context,
    utils::pagination::Pagination,
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, Router},
};
use std::sync::Arc;

pub mod request {
    use crate::utils::pagination::Pagination;
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct Filters {
        pub company_id: Option<String>,
    }

    pub struct Payload {
        pub filters: Filters,
        pub pagination: Pagination,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::{modules::branch::repository::Branch, utils::pagination::Paginated};

    pub enum Success {
        Branches(Paginated<Branch>),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Branches(branches) => (StatusCode::OK, Json(json!(branches))).into_response(),
            }
        }
    }

    pub enum Error {
        FailedToFetchBranches,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToFetchBranches => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch branches" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    repository::find_many(
        &ctx.db_conn.pool,
        payload.filters.company_id,
        payload.pagination,
    )
    .await
    .map(response::Success::Branches)
    .map_err(|_| response::Error::FailedToFetchBranches)
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    _auth: Auth,
    Query(filters): Query<request::Filters>,
    pagination: Pagination,
) -> impl IntoResponse {
    service(
        ctx,
        request::Payload {
            filters,
            pagination,
        },
    )
    .await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/", get(handler))
}
