use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use sqlx::PgExecutor;
use ulid::Ulid;

use crate::utils::database;

pub const MIN_QUANTITY: i32 = 1;
pub const MAX_QUANTITY: i32 = 99;

pub fn quantity_in_range(quantity: i32) -> bool {
    (MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity)
}

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct Basket {
    pub id: String,
    pub user_id: String,
    pub menu_item_id: String,
    pub quantity: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// A basket row joined with the menu item it points at.
#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct BasketWithItem {
    pub id: String,
    pub user_id: String,
    pub menu_item_id: String,
    pub quantity: i32,
    pub menu_item_name: String,
    pub unit_price: BigDecimal,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug)]
pub enum Error {
    MenuItemNotFound,
    DuplicateItem,
    QuantityOutOfRange,
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

fn translate_constraint(err: sqlx::Error, context: &str) -> Error {
    match database::violated_constraint(&err) {
        Some("ck_baskets_quantity") => Error::QuantityOutOfRange,
        Some("uq_baskets_user_menu_item") => Error::DuplicateItem,
        Some("baskets_menu_item_id_fkey") => Error::MenuItemNotFound,
        _ => {
            tracing::error!("Error occurred while {}: {}", context, err);
            Error::UnexpectedError
        }
    }
}

/// Adds a menu item to the user's basket. A repeated add for the same item
/// merges by incrementing the existing row's quantity.
pub async fn upsert_item<'e, E: PgExecutor<'e>>(
    e: E,
    user_id: String,
    menu_item_id: String,
    quantity: i32,
) -> Result<Basket> {
    sqlx::query_as::<_, Basket>(
        "
        INSERT INTO baskets (id, user_id, menu_item_id, quantity)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT ON CONSTRAINT uq_baskets_user_menu_item
        DO UPDATE SET quantity = baskets.quantity + EXCLUDED.quantity, updated_at = NOW()
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(user_id)
    .bind(menu_item_id)
    .bind(quantity)
    .fetch_one(e)
    .await
    .map_err(|err| translate_constraint(err, "adding a basket item"))
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<Basket>> {
    sqlx::query_as::<_, Basket>("SELECT * FROM baskets WHERE id = $1")
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching basket {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn find_many_with_items<'e, E: PgExecutor<'e>>(
    e: E,
    user_id: String,
) -> Result<Vec<BasketWithItem>> {
    sqlx::query_as::<_, BasketWithItem>(
        "
        SELECT
            baskets.id,
            baskets.user_id,
            baskets.menu_item_id,
            baskets.quantity,
            menu_items.name AS menu_item_name,
            menu_items.price AS unit_price,
            baskets.created_at,
            baskets.updated_at
        FROM baskets
        INNER JOIN menu_items ON menu_items.id = baskets.menu_item_id
        WHERE baskets.user_id = $1
        ORDER BY baskets.created_at DESC
        ",
    )
    .bind(user_id.clone())
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while fetching basket for user {}: {}",
            user_id,
            err
        );
        Error::UnexpectedError
    })
}

/// Same as `find_many_with_items` but takes row locks on the basket rows so a
/// concurrent checkout cannot drain them twice.
pub async fn find_many_with_items_for_update<'e, E: PgExecutor<'e>>(
    e: E,
    user_id: String,
) -> Result<Vec<BasketWithItem>> {
    sqlx::query_as::<_, BasketWithItem>(
        "
        SELECT
            baskets.id,
            baskets.user_id,
            baskets.menu_item_id,
            baskets.quantity,
            menu_items.name AS menu_item_name,
            menu_items.price AS unit_price,
            baskets.created_at,
            baskets.updated_at
        FROM baskets
        INNER JOIN menu_items ON menu_items.id = baskets.menu_item_id
        WHERE baskets.user_id = $1
        ORDER BY baskets.created_at DESC
        FOR UPDATE OF baskets
        ",
    )
    .bind(user_id.clone())
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while locking basket for user {}: {}",
            user_id,
            err
        );
        Error::UnexpectedError
    })
}

pub fn compute_total(items: &[BasketWithItem]) -> BigDecimal {
    items.iter().fold(BigDecimal::from(0), |acc, item| {
        acc + item.unit_price.clone() * BigDecimal::from(item.quantity)
    })
}

pub struct UpdateBasketPayload {
    pub menu_item_id: String,
    pub quantity: i32,
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    payload: UpdateBasketPayload,
) -> Result<Option<Basket>> {
    sqlx::query_as::<_, Basket>(
        "
        UPDATE baskets SET menu_item_id = $1, quantity = $2, updated_at = NOW()
        WHERE id = $3
        RETURNING *
        ",
    )
    .bind(payload.menu_item_id)
    .bind(payload.quantity)
    .bind(id)
    .fetch_optional(e)
    .await
    .map_err(|err| translate_constraint(err, "updating a basket item"))
}

pub async fn update_quantity<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    quantity: i32,
) -> Result<Option<Basket>> {
    sqlx::query_as::<_, Basket>(
        "
        UPDATE baskets SET quantity = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING *
        ",
    )
    .bind(quantity)
    .bind(id)
    .fetch_optional(e)
    .await
    .map_err(|err| translate_constraint(err, "updating a basket quantity"))
}

pub async fn find_by_user_and_menu_item<'e, E: PgExecutor<'e>>(
    e: E,
    user_id: String,
    menu_item_id: String,
) -> Result<Option<Basket>> {
    sqlx::query_as::<_, Basket>(
        "SELECT * FROM baskets WHERE user_id = $1 AND menu_item_id = $2",
    )
    .bind(user_id.clone())
    .bind(menu_item_id)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while fetching basket row for user {}: {}",
            user_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn delete_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<bool> {
    sqlx::query("DELETE FROM baskets WHERE id = $1")
        .bind(id.clone())
        .execute(e)
        .await
        .map(|result| result.rows_affected() > 0)
        .map_err(|err| {
            tracing::error!("Error occurred while deleting basket {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn delete_by_user_id<'e, E: PgExecutor<'e>>(e: E, user_id: String) -> Result<u64> {
    sqlx::query("DELETE FROM baskets WHERE user_id = $1")
        .bind(user_id.clone())
        .execute(e)
        .await
        .map(|result| result.rows_affected())
        .map_err(|err| {
            tracing::error!(
                "Error occurred while clearing basket for user {}: {}",
                user_id,
                err
            );
            Error::UnexpectedError
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::FromPrimitive;
    use chrono::Utc;

    fn row(quantity: i32, unit_price: f64) -> BasketWithItem {
        BasketWithItem {
            id: Ulid::new().to_string(),
            user_id: String::from("user"),
            menu_item_id: Ulid::new().to_string(),
            quantity,
            menu_item_name: String::from("item"),
            unit_price: BigDecimal::from_f64(unit_price).unwrap(),
            created_at: Utc::now().naive_utc(),
            updated_at: None,
        }
    }

    #[test]
    fn total_is_sum_of_price_times_quantity() {
        let items = vec![row(2, 3.50), row(3, 1.25)];
        assert_eq!(compute_total(&items), BigDecimal::from_f64(10.75).unwrap());
    }

    #[test]
    fn total_of_empty_basket_is_zero() {
        assert_eq!(compute_total(&[]), BigDecimal::from(0));
    }

    #[test]
    fn quantity_bounds_are_inclusive() {
        assert!(!quantity_in_range(0));
        assert!(quantity_in_range(1));
        assert!(quantity_in_range(99));
        assert!(!quantity_in_range(100));
    }
}
