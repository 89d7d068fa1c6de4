use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use sqlx::PgExecutor;
use ulid::Ulid;

use crate::utils::{
    database,
    pagination::{Paginated, Pagination},
};

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub is_available: bool,
    pub menu_id: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

pub struct CreateMenuItemPayload {
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub menu_id: String,
}

#[derive(Clone)]
pub struct UpdateMenuItemPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<BigDecimal>,
    pub is_available: Option<bool>,
}

#[derive(Debug)]
pub enum Error {
    MenuNotFound,
    NegativePrice,
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateMenuItemPayload) -> Result<MenuItem> {
    sqlx::query_as::<_, MenuItem>(
        "
        INSERT INTO menu_items (id, name, description, price, menu_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.name)
    .bind(payload.description)
    .bind(payload.price)
    .bind(payload.menu_id)
    .fetch_one(e)
    .await
    .map_err(|err| match database::violated_constraint(&err) {
        Some("ck_menu_items_price") => Error::NegativePrice,
        Some("menu_items_menu_id_fkey") => Error::MenuNotFound,
        _ => {
            tracing::error!("Error occurred while creating a menu item: {}", err);
            Error::UnexpectedError
        }
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<MenuItem>> {
    sqlx::query_as::<_, MenuItem>("SELECT * FROM menu_items WHERE id = $1 AND is_active = TRUE")
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching menu item {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn find_many<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    menu_id: Option<String>,
    pagination: Pagination,
) -> Result<Paginated<MenuItem>> {
    let items = sqlx::query_as::<_, MenuItem>(
        "
        SELECT * FROM menu_items
        WHERE is_active = TRUE
          AND ($1::TEXT IS NULL OR menu_id = $1)
        ORDER BY created_at DESC
        OFFSET $2 LIMIT $3
        ",
    )
    .bind(menu_id.clone())
    .bind(pagination.skip as i64)
    .bind(pagination.limit as i64)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching many menu items: {}", err);
        Error::UnexpectedError
    })?;

    let total = sqlx::query_scalar::<_, i64>(
        "
        SELECT COUNT(id) FROM menu_items
        WHERE is_active = TRUE
          AND ($1::TEXT IS NULL OR menu_id = $1)
        ",
    )
    .bind(menu_id)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while counting menu items: {}", err);
        Error::UnexpectedError
    })?;

    Ok(Paginated::new(
        items,
        total as u32,
        pagination.skip,
        pagination.limit,
    ))
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    payload: UpdateMenuItemPayload,
) -> Result<Option<MenuItem>> {
    sqlx::query_as::<_, MenuItem>(
        "
        UPDATE menu_items SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            price = COALESCE($3, price),
            is_available = COALESCE($4, is_available),
            updated_at = NOW()
        WHERE id = $5 AND is_active = TRUE
        RETURNING *
        ",
    )
    .bind(payload.name)
    .bind(payload.description)
    .bind(payload.price)
    .bind(payload.is_available)
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| match database::violated_constraint(&err) {
        Some("ck_menu_items_price") => Error::NegativePrice,
        _ => {
            tracing::error!("Error occurred while updating menu item {}: {}", id, err);
            Error::UnexpectedError
        }
    })
}

pub async fn deactivate<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<bool> {
    sqlx::query(
        "UPDATE menu_items SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active = TRUE",
    )
    .bind(id.clone())
    .execute(e)
    .await
    .map(|result| result.rows_affected() > 0)
    .map_err(|err| {
        tracing::error!("Error occurred while deactivating menu item {}: {}", id, err);
        Error::UnexpectedError
    })
}
