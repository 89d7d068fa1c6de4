use chrono::NaiveDateTime;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use sqlx::{PgExecutor, Postgres, Transaction};
use std::str::FromStr;
use ulid::Ulid;

use crate::modules::basket::repository::BasketWithItem;
use crate::utils::pagination::{Paginated, Pagination};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "order_status")]
pub enum OrderStatus {
    #[serde(rename = "PENDING")]
    #[sqlx(rename = "PENDING")]
    Pending,
    #[serde(rename = "CONFIRMED")]
    #[sqlx(rename = "CONFIRMED")]
    Confirmed,
    #[serde(rename = "PREPARING")]
    #[sqlx(rename = "PREPARING")]
    Preparing,
    #[serde(rename = "READY")]
    #[sqlx(rename = "READY")]
    Ready,
    #[serde(rename = "OUT_FOR_DELIVERY")]
    #[sqlx(rename = "OUT_FOR_DELIVERY")]
    OutForDelivery,
    #[serde(rename = "COMPLETED")]
    #[sqlx(rename = "COMPLETED")]
    Completed,
    #[serde(rename = "CANCELLED")]
    #[sqlx(rename = "CANCELLED")]
    Cancelled,
}

impl ToString for OrderStatus {
    fn to_string(&self) -> String {
        match self {
            OrderStatus::Pending => String::from("PENDING"),
            OrderStatus::Confirmed => String::from("CONFIRMED"),
            OrderStatus::Preparing => String::from("PREPARING"),
            OrderStatus::Ready => String::from("READY"),
            OrderStatus::OutForDelivery => String::from("OUT_FOR_DELIVERY"),
            OrderStatus::Completed => String::from("COMPLETED"),
            OrderStatus::Cancelled => String::from("CANCELLED"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "CONFIRMED" => Ok(OrderStatus::Confirmed),
            "PREPARING" => Ok(OrderStatus::Preparing),
            "READY" => Ok(OrderStatus::Ready),
            "OUT_FOR_DELIVERY" => Ok(OrderStatus::OutForDelivery),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("'{}' is not a valid OrderStatus", s)),
        }
    }
}

impl OrderStatus {
    /// The fixed transition table. Anything not listed here is rejected.
    pub fn can_transition_to(&self, next: &OrderStatus) -> bool {
        use OrderStatus::*;

        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Preparing)
                | (Confirmed, Cancelled)
                | (Preparing, Ready)
                | (Preparing, Cancelled)
                | (Ready, OutForDelivery)
                | (Ready, Completed)
                | (OutForDelivery, Completed)
                | (OutForDelivery, Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Orders may only be soft-deleted before work starts or after it ends.
    pub fn is_deletable(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Completed | OrderStatus::Cancelled
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct Order {
    pub id: String,
    pub code: String,
    pub user_id: String,
    pub branch_id: String,
    pub status: OrderStatus,
    pub total_amount: BigDecimal,
    pub special_instructions: Option<String>,
    pub delivery_address: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub total_price: BigDecimal,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Clone, Debug)]
pub struct FullOrder {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Price snapshot for one order item, taken at checkout time.
#[derive(Clone, Debug)]
pub struct OrderItemSnapshot {
    pub menu_item_id: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub total_price: BigDecimal,
}

pub fn generate_order_code() -> String {
    format!("order#{:04}", rand::thread_rng().gen_range(0..10_000))
}

/// Converts basket rows into immutable order-item snapshots plus the order
/// total. Later menu-item price changes do not affect these rows.
pub fn build_order_items(baskets: &[BasketWithItem]) -> (Vec<OrderItemSnapshot>, BigDecimal) {
    let snapshots = baskets
        .iter()
        .map(|basket| OrderItemSnapshot {
            menu_item_id: basket.menu_item_id.clone(),
            quantity: basket.quantity,
            unit_price: basket.unit_price.clone(),
            total_price: basket.unit_price.clone() * BigDecimal::from(basket.quantity),
        })
        .collect::<Vec<OrderItemSnapshot>>();

    let total = snapshots
        .iter()
        .fold(BigDecimal::from(0), |acc, item| acc + item.total_price.clone());

    (snapshots, total)
}

#[derive(Debug)]
pub enum Error {
    CodeExhausted,
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

const MAX_CODE_ATTEMPTS: u32 = 5;

/// Picks an order code that is free at the time of the check. The unique
/// constraint on `orders.code` still backstops the race window.
pub async fn allocate_code<'e, E: PgExecutor<'e> + Copy>(e: E) -> Result<String> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate_order_code();

        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE code = $1)",
        )
        .bind(code.clone())
        .fetch_one(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while checking order code {}: {}", code, err);
            Error::UnexpectedError
        })?;

        if !taken {
            return Ok(code);
        }
    }

    tracing::error!(
        "Could not allocate a free order code after {} attempts",
        MAX_CODE_ATTEMPTS
    );
    Err(Error::CodeExhausted)
}

pub struct CreateOrderPayload {
    pub code: String,
    pub user_id: String,
    pub branch_id: String,
    pub special_instructions: Option<String>,
    pub delivery_address: Option<String>,
    pub baskets: Vec<BasketWithItem>,
}

/// Inserts the order and its item snapshots and drains the consumed basket
/// rows, all on the caller's transaction. The caller commits or rolls back.
pub async fn create(
    tx: &mut Transaction<'_, Postgres>,
    payload: CreateOrderPayload,
) -> Result<FullOrder> {
    let (snapshots, total) = build_order_items(&payload.baskets);

    let order = sqlx::query_as::<_, Order>(
        "
        INSERT INTO orders (
            id,
            code,
            user_id,
            branch_id,
            status,
            total_amount,
            special_instructions,
            delivery_address
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.code)
    .bind(payload.user_id.clone())
    .bind(payload.branch_id)
    .bind(OrderStatus::Pending)
    .bind(total)
    .bind(payload.special_instructions)
    .bind(payload.delivery_address)
    .fetch_one(&mut **tx)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while creating an order: {}", err);
        Error::UnexpectedError
    })?;

    let mut items = Vec::with_capacity(snapshots.len());

    for snapshot in snapshots {
        let item = sqlx::query_as::<_, OrderItem>(
            "
            INSERT INTO order_items (id, order_id, menu_item_id, quantity, unit_price, total_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            ",
        )
        .bind(Ulid::new().to_string())
        .bind(order.id.clone())
        .bind(snapshot.menu_item_id)
        .bind(snapshot.quantity)
        .bind(snapshot.unit_price)
        .bind(snapshot.total_price)
        .fetch_one(&mut **tx)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while creating order items for order {}: {}",
                order.id,
                err
            );
            Error::UnexpectedError
        })?;

        items.push(item);
    }

    sqlx::query("DELETE FROM baskets WHERE user_id = $1")
        .bind(payload.user_id)
        .execute(&mut **tx)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while draining basket for order {}: {}",
                order.id,
                err
            );
            Error::UnexpectedError
        })?;

    Ok(FullOrder { order, items })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<Order>> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 AND is_active = TRUE")
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching order {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn find_items_by_order_id<'e, E: PgExecutor<'e>>(
    e: E,
    order_id: String,
) -> Result<Vec<OrderItem>> {
    sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_items WHERE order_id = $1 AND is_active = TRUE ORDER BY created_at",
    )
    .bind(order_id.clone())
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while fetching items for order {}: {}",
            order_id,
            err
        );
        Error::UnexpectedError
    })
}

#[derive(Clone, Debug, Default)]
pub struct Filters {
    pub user_id: Option<String>,
    pub branch_id: Option<String>,
}

pub async fn find_many<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    filters: Filters,
    pagination: Pagination,
) -> Result<Paginated<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        "
        SELECT * FROM orders
        WHERE is_active = TRUE
          AND ($1::TEXT IS NULL OR user_id = $1)
          AND ($2::TEXT IS NULL OR branch_id = $2)
        ORDER BY created_at DESC
        OFFSET $3 LIMIT $4
        ",
    )
    .bind(filters.user_id.clone())
    .bind(filters.branch_id.clone())
    .bind(pagination.skip as i64)
    .bind(pagination.limit as i64)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching many orders: {}", err);
        Error::UnexpectedError
    })?;

    let total = sqlx::query_scalar::<_, i64>(
        "
        SELECT COUNT(id) FROM orders
        WHERE is_active = TRUE
          AND ($1::TEXT IS NULL OR user_id = $1)
          AND ($2::TEXT IS NULL OR branch_id = $2)
        ",
    )
    .bind(filters.user_id)
    .bind(filters.branch_id)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while counting orders: {}", err);
        Error::UnexpectedError
    })?;

    Ok(Paginated::new(
        orders,
        total as u32,
        pagination.skip,
        pagination.limit,
    ))
}

#[derive(Clone, Debug)]
pub struct UpdateOrderPayload {
    pub status: Option<OrderStatus>,
    pub special_instructions: Option<String>,
    pub delivery_address: Option<String>,
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    payload: UpdateOrderPayload,
) -> Result<Option<Order>> {
    sqlx::query_as::<_, Order>(
        "
        UPDATE orders SET
            status = COALESCE($1, status),
            special_instructions = COALESCE($2, special_instructions),
            delivery_address = COALESCE($3, delivery_address),
            updated_at = NOW()
        WHERE id = $4 AND is_active = TRUE
        RETURNING *
        ",
    )
    .bind(payload.status)
    .bind(payload.special_instructions)
    .bind(payload.delivery_address)
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while updating order {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn update_status<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    status: OrderStatus,
) -> Result<Option<Order>> {
    sqlx::query_as::<_, Order>(
        "
        UPDATE orders SET status = $1, updated_at = NOW()
        WHERE id = $2 AND is_active = TRUE
        RETURNING *
        ",
    )
    .bind(status)
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while updating status of order {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub async fn deactivate<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<bool> {
    sqlx::query(
        "UPDATE orders SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active = TRUE",
    )
    .bind(id.clone())
    .execute(e)
    .await
    .map(|result| result.rows_affected() > 0)
    .map_err(|err| {
        tracing::error!("Error occurred while deactivating order {}: {}", id, err);
        Error::UnexpectedError
    })
}

pub fn is_owner(order: &Order, user_id: &str) -> bool {
    order.user_id == user_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::FromPrimitive;
    use chrono::Utc;

    use OrderStatus::*;

    #[test]
    fn happy_path_reaches_completed() {
        let path = [Pending, Confirmed, Preparing, Ready, OutForDelivery, Completed];
        for pair in path.windows(2) {
            assert!(
                pair[0].can_transition_to(&pair[1]),
                "{:?} -> {:?} should be allowed",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn pickup_orders_skip_delivery() {
        assert!(Ready.can_transition_to(&Completed));
    }

    #[test]
    fn skipping_stages_is_rejected() {
        assert!(!Pending.can_transition_to(&Ready));
        assert!(!Pending.can_transition_to(&Preparing));
        assert!(!Confirmed.can_transition_to(&OutForDelivery));
    }

    #[test]
    fn cancellation_is_allowed_before_completion() {
        assert!(Pending.can_transition_to(&Cancelled));
        assert!(Confirmed.can_transition_to(&Cancelled));
        assert!(Preparing.can_transition_to(&Cancelled));
        assert!(OutForDelivery.can_transition_to(&Cancelled));
        assert!(!Ready.can_transition_to(&Cancelled));
    }

    #[test]
    fn terminal_statuses_allow_no_transitions() {
        for next in [
            Pending,
            Confirmed,
            Preparing,
            Ready,
            OutForDelivery,
            Completed,
            Cancelled,
        ] {
            assert!(!Completed.can_transition_to(&next));
            assert!(!Cancelled.can_transition_to(&next));
        }
        assert!(Completed.is_terminal());
        assert!(Cancelled.is_terminal());
    }

    #[test]
    fn only_settled_orders_are_deletable() {
        assert!(Pending.is_deletable());
        assert!(Completed.is_deletable());
        assert!(Cancelled.is_deletable());
        assert!(!Confirmed.is_deletable());
        assert!(!Preparing.is_deletable());
        assert!(!Ready.is_deletable());
        assert!(!OutForDelivery.is_deletable());
    }

    #[test]
    fn order_codes_have_a_four_digit_suffix() {
        for _ in 0..100 {
            let code = generate_order_code();
            let suffix = code.strip_prefix("order#").expect("missing prefix");
            assert_eq!(suffix.len(), 4);
            assert!(suffix.chars().all(|c| c.is_ascii_digit()));
        }
    }

    fn basket(quantity: i32, unit_price: f64) -> BasketWithItem {
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
    fn snapshots_cover_every_basket_row() {
        let baskets = vec![basket(2, 4.50), basket(1, 2.25), basket(3, 1.00)];
        let (snapshots, total) = build_order_items(&baskets);

        assert_eq!(snapshots.len(), baskets.len());

        let item_sum = snapshots
            .iter()
            .fold(BigDecimal::from(0), |acc, item| acc + item.total_price.clone());
        assert_eq!(total, item_sum);
        assert_eq!(total, BigDecimal::from_f64(14.25).unwrap());
    }

    #[test]
    fn snapshot_line_totals_multiply_out() {
        let baskets = vec![basket(5, 3.00)];
        let (snapshots, _) = build_order_items(&baskets);

        assert_eq!(snapshots[0].quantity, 5);
        assert_eq!(
            snapshots[0].total_price,
            snapshots[0].unit_price.clone() * BigDecimal::from(5)
        );
    }

    #[test]
    fn empty_basket_builds_nothing() {
        let (snapshots, total) = build_order_items(&[]);
        assert!(snapshots.is_empty());
        assert_eq!(total, BigDecimal::from(0));
    }
}
