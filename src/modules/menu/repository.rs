use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use ulid::Ulid;

use crate::utils::{
    database,
    pagination::{Paginated, Pagination},
};

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct Menu {
    pub id: String,
    pub name: String,
    pub branch_id: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

pub struct CreateMenuPayload {
    pub name: String,
    pub branch_id: String,
}

#[derive(Debug)]
pub enum Error {
    NameTaken,
    BranchNotFound,
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateMenuPayload) -> Result<Menu> {
    sqlx::query_as::<_, Menu>(
        "
        INSERT INTO menus (id, name, branch_id)
        VALUES ($1, $2, $3)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.name)
    .bind(payload.branch_id)
    .fetch_one(e)
    .await
    .map_err(|err| match database::violated_constraint(&err) {
        Some("uq_menus_branch_name") => Error::NameTaken,
        Some("menus_branch_id_fkey") => Error::BranchNotFound,
        _ => {
            tracing::error!("Error occurred while creating a menu: {}", err);
            Error::UnexpectedError
        }
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<Menu>> {
    sqlx::query_as::<_, Menu>("SELECT * FROM menus WHERE id = $1 AND is_active = TRUE")
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching menu {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn find_many<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    branch_id: Option<String>,
    pagination: Pagination,
) -> Result<Paginated<Menu>> {
    let menus = sqlx::query_as::<_, Menu>(
        "
        SELECT * FROM menus
        WHERE is_active = TRUE
          AND ($1::TEXT IS NULL OR branch_id = $1)
        ORDER BY created_at DESC
        OFFSET $2 LIMIT $3
        ",
    )
    .bind(branch_id.clone())
    .bind(pagination.skip as i64)
    .bind(pagination.limit as i64)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching many menus: {}", err);
        Error::UnexpectedError
    })?;

    let total = sqlx::query_scalar::<_, i64>(
        "
        SELECT COUNT(id) FROM menus
        WHERE is_active = TRUE
          AND ($1::TEXT IS NULL OR branch_id = $1)
        ",
    )
    .bind(branch_id)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while counting menus: {}", err);
        Error::UnexpectedError
    })?;

    Ok(Paginated::new(
        menus,
        total as u32,
        pagination.skip,
        pagination.limit,
    ))
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    name: String,
) -> Result<Option<Menu>> {
    sqlx::query_as::<_, Menu>(
        "
        UPDATE menus SET name = $1, updated_at = NOW()
        WHERE id = $2 AND is_active = TRUE
        RETURNING *
        ",
    )
    .bind(name)
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| match database::violated_constraint(&err) {
        Some("uq_menus_branch_name") => Error::NameTaken,
        _ => {
            tracing::error!("Error occurred while updating menu {}: {}", id, err);
            Error::UnexpectedError
        }
    })
}

pub async fn deactivate<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<bool> {
    sqlx::query(
        "UPDATE menus SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active = TRUE",
    )
    .bind(id.clone())
    .execute(e)
    .await
    .map(|result| result.rows_affected() > 0)
    .map_err(|err| {
        tracing::error!("Error occurred while deactivating menu {}: {}", id, err);
        Error::UnexpectedError
    })
}
