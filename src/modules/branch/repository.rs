use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use ulid::Ulid;

use crate::utils::{
    database,
    pagination::{Paginated, Pagination},
};

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct Branch {
    pub id: String,
    pub username: String,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub company_id: String,
    pub owner_id: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

pub struct CreateBranchPayload {
    pub username: String,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub company_id: String,
    pub owner_id: Option<String>,
}

#[derive(Clone)]
pub struct UpdateBranchPayload {
    pub username: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug)]
pub enum Error {
    UsernameTaken,
    CompanyNotFound,
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateBranchPayload) -> Result<Branch> {
    sqlx::query_as::<_, Branch>(
        "
        INSERT INTO branches (id, username, phone, latitude, longitude, company_id, owner_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.username)
    .bind(payload.phone)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(payload.company_id)
    .bind(payload.owner_id)
    .fetch_one(e)
    .await
    .map_err(|err| match database::violated_constraint(&err) {
        Some("uq_branches_username") => Error::UsernameTaken,
        Some("branches_company_id_fkey") => Error::CompanyNotFound,
        _ => {
            tracing::error!("Error occurred while creating a branch: {}", err);
            Error::UnexpectedError
        }
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<Branch>> {
    sqlx::query_as::<_, Branch>("SELECT * FROM branches WHERE id = $1 AND is_active = TRUE")
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching branch {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn find_many<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    company_id: Option<String>,
    pagination: Pagination,
) -> Result<Paginated<Branch>> {
    let branches = sqlx::query_as::<_, Branch>(
        "
        SELECT * FROM branches
        WHERE is_active = TRUE
          AND ($1::TEXT IS NULL OR company_id = $1)
        ORDER BY created_at DESC
        OFFSET $2 LIMIT $3
        ",
    )
    .bind(company_id.clone())
    .bind(pagination.skip as i64)
    .bind(pagination.limit as i64)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching many branches: {}", err);
        Error::UnexpectedError
    })?;

    let total = sqlx::query_scalar::<_, i64>(
        "
        SELECT COUNT(id) FROM branches
        WHERE is_active = TRUE
          AND ($1::TEXT IS NULL OR company_id = $1)
        ",
    )
    .bind(company_id)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while counting branches: {}", err);
        Error::UnexpectedError
    })?;

    Ok(Paginated::new(
        branches,
        total as u32,
        pagination.skip,
        pagination.limit,
    ))
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    payload: UpdateBranchPayload,
) -> Result<Option<Branch>> {
    sqlx::query_as::<_, Branch>(
        "
        UPDATE branches SET
            username = COALESCE($1, username),
            phone = COALESCE($2, phone),
            latitude = COALESCE($3, latitude),
            longitude = COALESCE($4, longitude),
            updated_at = NOW()
        WHERE id = $5 AND is_active = TRUE
        RETURNING *
        ",
    )
    .bind(payload.username)
    .bind(payload.phone)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| match database::violated_constraint(&err) {
        Some("uq_branches_username") => Error::UsernameTaken,
        _ => {
            tracing::error!("Error occurred while updating branch {}: {}", id, err);
            Error::UnexpectedError
        }
    })
}

pub async fn update_owner<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    owner_id: String,
) -> Result<Option<Branch>> {
    sqlx::query_as::<_, Branch>(
        "
        UPDATE branches SET owner_id = $1, updated_at = NOW()
        WHERE id = $2 AND is_active = TRUE
        RETURNING *
        ",
    )
    .bind(owner_id)
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while reassigning owner for branch {}: {}",
            id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn deactivate<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<bool> {
    sqlx::query(
        "UPDATE branches SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active = TRUE",
    )
    .bind(id.clone())
    .execute(e)
    .await
    .map(|result| result.rows_affected() > 0)
    .map_err(|err| {
        tracing::error!("Error occurred while deactivating branch {}: {}", id, err);
        Error::UnexpectedError
    })
}
