use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::str::FromStr;
use ulid::Ulid;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_status")]
pub enum PaymentStatus {
    #[serde(rename = "PENDING")]
    #[sqlx(rename = "PENDING")]
    Pending,
    #[serde(rename = "PROCESSING")]
    #[sqlx(rename = "PROCESSING")]
    Processing,
    #[serde(rename = "SUCCEEDED")]
    #[sqlx(rename = "SUCCEEDED")]
    Succeeded,
    #[serde(rename = "FAILED")]
    #[sqlx(rename = "FAILED")]
    Failed,
    #[serde(rename = "CANCELLED")]
    #[sqlx(rename = "CANCELLED")]
    Cancelled,
    #[serde(rename = "REFUNDED")]
    #[sqlx(rename = "REFUNDED")]
    Refunded,
}

impl ToString for PaymentStatus {
    fn to_string(&self) -> String {
        match self {
            PaymentStatus::Pending => String::from("PENDING"),
            PaymentStatus::Processing => String::from("PROCESSING"),
            PaymentStatus::Succeeded => String::from("SUCCEEDED"),
            PaymentStatus::Failed => String::from("FAILED"),
            PaymentStatus::Cancelled => String::from("CANCELLED"),
            PaymentStatus::Refunded => String::from("REFUNDED"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PaymentStatus::Pending),
            "PROCESSING" => Ok(PaymentStatus::Processing),
            "SUCCEEDED" => Ok(PaymentStatus::Succeeded),
            "FAILED" => Ok(PaymentStatus::Failed),
            "CANCELLED" => Ok(PaymentStatus::Cancelled),
            "REFUNDED" => Ok(PaymentStatus::Refunded),
            _ => Err(format!("'{}' is not a valid PaymentStatus", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub intent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub failure_reason: Option<String>,
    pub receipt_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

pub struct UpsertPaymentPayload {
    pub order_id: String,
    pub intent_id: String,
    pub client_secret: Option<String>,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

/// One payment row per order. Re-initializing an intent for the same order
/// replaces the previous attempt and resets the row to PENDING.
pub async fn upsert_for_order<'e, E: PgExecutor<'e>>(
    e: E,
    payload: UpsertPaymentPayload,
) -> Result<Payment> {
    sqlx::query_as::<_, Payment>(
        "
        INSERT INTO payments (id, order_id, intent_id, client_secret, amount, currency)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT ON CONSTRAINT uq_payments_order
        DO UPDATE SET
            intent_id = EXCLUDED.intent_id,
            client_secret = EXCLUDED.client_secret,
            amount = EXCLUDED.amount,
            currency = EXCLUDED.currency,
            status = 'PENDING',
            failure_reason = NULL,
            receipt_url = NULL,
            updated_at = NOW()
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.order_id.clone())
    .bind(payload.intent_id)
    .bind(payload.client_secret)
    .bind(payload.amount)
    .bind(payload.currency)
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while upserting payment for order {}: {}",
            payload.order_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_by_order_id<'e, E: PgExecutor<'e>>(
    e: E,
    order_id: String,
) -> Result<Option<Payment>> {
    sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE order_id = $1")
        .bind(order_id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while fetching payment for order {}: {}",
                order_id,
                err
            );
            Error::UnexpectedError
        })
}

pub async fn find_by_intent_id<'e, E: PgExecutor<'e>>(
    e: E,
    intent_id: String,
) -> Result<Option<Payment>> {
    sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE intent_id = $1")
        .bind(intent_id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while fetching payment for intent {}: {}",
                intent_id,
                err
            );
            Error::UnexpectedError
        })
}

pub struct UpdatePaymentStatusPayload {
    pub status: PaymentStatus,
    pub failure_reason: Option<String>,
    pub receipt_url: Option<String>,
}

pub async fn update_status<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    payload: UpdatePaymentStatusPayload,
) -> Result<Option<Payment>> {
    sqlx::query_as::<_, Payment>(
        "
        UPDATE payments SET
            status = $1,
            failure_reason = COALESCE($2, failure_reason),
            receipt_url = COALESCE($3, receipt_url),
            updated_at = NOW()
        WHERE id = $4
        RETURNING *
        ",
    )
    .bind(payload.status)
    .bind(payload.failure_reason)
    .bind(payload.receipt_url)
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while updating payment {}: {}", id, err);
        Error::UnexpectedError
    })
}
