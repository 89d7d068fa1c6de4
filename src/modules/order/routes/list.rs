use crate::{
    modules::{auth::middleware::Auth, branch, order::repository, user},
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
    use crate::{modules::auth::middleware::Auth, utils::pagination::Pagination};
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct Filters {
        pub user_id: Option<String>,
        pub branch_id: Option<String>,
    }

    pub struct Payload {
        pub filters: Filters,
        pub pagination: Pagination,
        pub auth: Auth,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::{modules::order::repository::Order, utils::pagination::Paginated};

    pub enum Success {
        Orders(Paginated<Order>),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Orders(orders) => (
                    StatusCode::OK,
                    Json(json!({
                        "orders": orders.items,
                        "total_count": orders.meta.total,
                        "skip": orders.meta.skip,
                        "limit": orders.meta.limit,
                    })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        NotBranchOwner,
        BranchNotFound,
        FailedToFetchOrders,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::NotBranchOwner => (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "You do not own this branch" })),
                )
                    .into_response(),
                Self::BranchNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Branch not found" })),
                )
                    .into_response(),
                Self::FailedToFetchOrders => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch orders" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}

async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let filters = if user::repository::is_admin(&payload.auth.user) {
        repository::Filters {
            user_id: payload.filters.user_id,
            branch_id: payload.filters.branch_id,
        }
    } else if let Some(branch_id) = payload.filters.branch_id {
        // Branch owners may see every order placed against their branch.
        let branch = branch::repository::find_by_id(&ctx.db_conn.pool, branch_id.clone())
            .await
            .map_err(|_| response::Error::FailedToFetchOrders)?
            .ok_or(response::Error::BranchNotFound)?;

        if branch.owner_id.as_deref() != Some(payload.auth.user.id.as_str()) {
            return Err(response::Error::NotBranchOwner);
        }

        repository::Filters {
            user_id: payload.filters.user_id,
            branch_id: Some(branch_id),
        }
    } else {
        repository::Filters {
            user_id: Some(payload.auth.user.id),
            branch_id: None,
        }
    };

    repository::find_many(&ctx.db_conn.pool, filters, payload.pagination)
        .await
        .map(response::Success::Orders)
        .map_err(|_| response::Error::FailedToFetchOrders)
}

async fn handler(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Query(filters): Query<request::Filters>,
    pagination: Pagination,
) -> impl IntoResponse {
    service(
        ctx,
        request::Payload {
            filters,
            pagination,
            auth,
        },
    )
    .await
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/", get(handler))
}
