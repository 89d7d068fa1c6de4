use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json, RequestPartsExt,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const MAX_LIMIT: u32 = 100;

#[derive(Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PaginatedMeta,
}

#[derive(Serialize, Clone)]
pub struct PaginatedMeta {
    pub total: u32,
    pub skip: u32,
    pub limit: u32,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u32, skip: u32, limit: u32) -> Paginated<T> {
        Self {
            items,
            meta: PaginatedMeta { total, skip, limit },
        }
    }
}

/// Offset-based pagination options, extracted from the query string.
#[derive(Deserialize, Clone)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

fn default_limit() -> u32 {
    20
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Pagination {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extract::<Query<Pagination>>().await {
            Ok(Query(pagination)) => Ok(Pagination {
                skip: pagination.skip,
                limit: pagination.limit.min(MAX_LIMIT),
            }),
            _ => Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid pagination options"})),
            )
                .into_response()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_start_at_the_beginning() {
        let pagination = Pagination::default();
        assert_eq!(pagination.skip, 0);
        assert_eq!(pagination.limit, 20);
    }

    #[test]
    fn paginated_meta_reports_requested_window() {
        let paginated = Paginated::new(vec![1, 2, 3], 42, 10, 3);
        assert_eq!(paginated.items.len(), 3);
        assert_eq!(paginated.meta.total, 42);
        assert_eq!(paginated.meta.skip, 10);
        assert_eq!(paginated.meta.limit, 3);
    }
}
