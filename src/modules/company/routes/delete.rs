use crate::{
    modules::{auth::middleware::AdminAuth, company::repository},
    types::Context,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, Router},
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

    pub enum Success {
        CompanyDeleted,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::CompanyDeleted => (
                    StatusCode::OK,
                    Json(json!({ "message": "Company deleted successfully" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        CompanyNotFound,
        FailedToDeleteCompany,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::CompanyNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Company not found" })),
                )
                    .into_response(),
                Self::FailedToDeleteCompany => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to delete company" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    match repository::deactivate(&ctx.db_conn.pool, payload.id).await {
        Ok(true) => Ok(response::Success::CompanyDeleted),
        Ok(false) => Err(response::Error::CompanyNotFound),
        Err(_) => Err(response::Error::FailedToDeleteCompany),
    }
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    _auth: AdminAuth,
    Path(id): Path<String>,
) -> impl IntoResponse {
    service(ctx, request::Payload { id }).await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/:id", delete(handler))
}
