use crate::{
    modules::{auth::middleware::AdminAuth, cleanup::service as cleanup_service},
    types::Context,
};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{post, Router},
};
use chrono::Utc;
use std::sync::Arc;

pub mod request {
    use serde::Deserialize;

    #[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
    pub enum CleanupType {
        #[serde(rename = "UNVERIFIED_USERS")]
        UnverifiedUsers,
        #[serde(rename = "EXPIRED_CODES")]
        ExpiredCodes,
        #[serde(rename = "ALL")]
        All,
    }

    impl ToString for CleanupType {
        fn to_string(&self) -> String {
            match self {
                CleanupType::UnverifiedUsers => String::from("UNVERIFIED_USERS"),
                CleanupType::ExpiredCodes => String::from("EXPIRED_CODES"),
                CleanupType::All => String::from("ALL"),
            }
        }
    }

    fn default_dry_run() -> bool {
        false
    }

    #[derive(Deserialize)]
    pub struct Body {
        pub cleanup_type: CleanupType,
        pub days_threshold: Option<u32>,
        #[serde(default = "default_dry_run")]
        pub dry_run: bool,
    }

    pub struct Payload {
        pub body: Body,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use chrono::NaiveDateTime;
    use serde::Serialize;
    use serde_json::json;

    use crate::modules::cleanup::service::ProcessedUser;

    #[derive(Serialize)]
    pub struct CleanupReport {
        pub status: String,
        pub cleanup_type: String,
        pub dry_run: bool,
        pub deleted_users: u64,
        pub deleted_codes: u64,
        pub processed_users: Vec<ProcessedUser>,
        pub execution_time: f64,
        pub message: String,
        pub timestamp: NaiveDateTime,
    }

    pub enum Success {
        Report(CleanupReport),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Report(report) => (StatusCode::OK, Json(json!(report))).into_response(),
            }
        }
    }

    pub enum Error {
        FailedToExecuteCleanup,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToExecuteCleanup => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Cleanup execution failed" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let started_at = Utc::now();
    let days_threshold = payload
        .body
        .days_threshold
        .unwrap_or(ctx.cleanup.days_threshold);
    let dry_run = payload.body.dry_run;

    let outcome = match &payload.body.cleanup_type {
        request::CleanupType::UnverifiedUsers => {
            cleanup_service::cleanup_unverified_users(ctx, days_threshold, dry_run).await
        }
        request::CleanupType::ExpiredCodes => {
            cleanup_service::cleanup_expired_codes(ctx, dry_run).await
        }
        request::CleanupType::All => {
            let users =
                cleanup_service::cleanup_unverified_users(ctx.clone(), days_threshold, dry_run)
                    .await;
            let codes = cleanup_service::cleanup_expired_codes(ctx, dry_run).await;

            match (users, codes) {
                (Ok(users), Ok(codes)) => Ok(cleanup_service::Outcome {
                    deleted_users: users.deleted_users,
                    deleted_codes: users.deleted_codes + codes.deleted_codes,
                    processed_users: users.processed_users,
                }),
                _ => Err(cleanup_service::Error::UnexpectedError),
            }
        }
    }
    .map_err(|_| response::Error::FailedToExecuteCleanup)?;

    let finished_at = Utc::now();
    let execution_time = (finished_at - started_at).num_milliseconds() as f64 / 1000.0;

    let action = if dry_run { "Would delete" } else { "Deleted" };
    let message = format!(
        "{} {} users and {} codes",
        action, outcome.deleted_users, outcome.deleted_codes
    );

    tracing::info!("Cleanup executed: {} in {:.2}s", message, execution_time);

    Ok(response::Success::Report(response::CleanupReport {
        status: String::from("success"),
        cleanup_type: payload.body.cleanup_type.to_string(),
        dry_run,
        deleted_users: outcome.deleted_users,
        deleted_codes: outcome.deleted_codes,
        processed_users: outcome.processed_users,
        execution_time,
        message,
        timestamp: finished_at.naive_utc(),
    }))
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    _auth: AdminAuth,
    Json(body): Json<request::Body>,
) -> impl IntoResponse {
    service(ctx, request::Payload { body }).await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/execute", post(handler))
}
