use crate::{
    modules::{auth::middleware::AdminAuth, cleanup::repository, cleanup::service as cleanup_service},
    types::Context,
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, Router},
};
use chrono::Utc;
use std::sync::Arc;

pub mod request {
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct Params {
        pub days_threshold: Option<u32>,
    }

    pub struct Payload {
        pub params: Params,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::modules::cleanup::repository::CleanupStats;

    pub enum Success {
        Stats(CleanupStats),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Stats(stats) => (StatusCode::OK, Json(json!(stats))).into_response(),
            }
        }
    }

    pub enum Error {
        FailedToFetchStats,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToFetchStats => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to get cleanup statistics" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let days_threshold = payload
        .params
        .days_threshold
        .unwrap_or(ctx.cleanup.days_threshold);
    let cutoff = cleanup_service::cutoff_for(days_threshold, Utc::now().naive_utc());

    repository::stats(&ctx.db_conn.pool, cutoff)
        .await
        .map(response::Success::Stats)
        .map_err(|_| response::Error::FailedToFetchStats)
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    _auth: AdminAuth,
    Query(params): Query<request::Params>,
) -> impl IntoResponse {
    service(ctx, request::Payload { params }).await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/stats", get(handler))
}
