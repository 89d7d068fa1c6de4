use crate::{
    modules::{auth::middleware::AdminAuth, company::repository, user},
    types::Context,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{put, Router},
};
use std::sync::Arc;

pub mod request {
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct Body {
        pub owner_id: String,
    }

    pub struct Payload {
        pub id: String,
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
                Self::Company(company) => (StatusCode::OK, Json(json!(company))).into_response(),
            }
        }
    }

    pub enum Error {
        CompanyNotFound,
        OwnerNotFound,
        FailedToUpdateOwner,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::CompanyNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Company not found" })),
                )
                    .into_response(),
                Self::OwnerNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Owner not found" })),
                )
                    .into_response(),
                Self::FailedToUpdateOwner => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to update company owner" })),
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
        .map_err(|_| response::Error::FailedToUpdateOwner)?
        .ok_or(response::Error::CompanyNotFound)?;

    // Reassigning to the current owner is a no-op.
    if company.owner_id.as_deref() == Some(payload.body.owner_id.as_str()) {
        return Ok(response::Success::Company(company));
    }

    user::repository::find_by_id(&ctx.db_conn.pool, payload.body.owner_id.clone())
        .await
        .map_err(|_| response::Error::FailedToUpdateOwner)?
        .ok_or(response::Error::OwnerNotFound)?;

    repository::update_owner(&ctx.db_conn.pool, payload.id, payload.body.owner_id)
        .await
        .map_err(|_| response::Error::FailedToUpdateOwner)?
        .map(response::Success::Company)
        .ok_or(response::Error::CompanyNotFound)
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    _auth: AdminAuth,
    Path(id): Path<String>,
    Json(body): Json<request::Body>,
) -> impl IntoResponse {
    service(ctx, request::Payload { id, body }).await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/:id/owner", put(handler))
}
