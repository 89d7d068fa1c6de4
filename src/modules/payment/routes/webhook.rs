use crate::{
    modules::{
        order::{self, repository::OrderStatus},
        payment::{
            repository::{self, PaymentStatus},
            service as payment_service,
        },
    },
    types::Context,
};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
struct Event {
    #[serde(rename = "type")]
    event_type: String,
    data: EventData,
}

#[derive(Deserialize)]
struct EventData {
    object: IntentObject,
}

#[derive(Deserialize)]
struct IntentObject {
    id: String,
    #[serde(default)]
    receipt_url: Option<String>,
    #[serde(default)]
    last_payment_error: Option<PaymentFailure>,
}

#[derive(Deserialize)]
struct PaymentFailure {
    message: Option<String>,
}

/// Applies the intent outcome to the payment row and the order's status,
/// within one transaction. Orders that already moved on are left untouched,
/// which keeps webhook retries idempotent.
async fn apply_intent_outcome(
    ctx: Arc<Context>,
    intent: IntentObject,
    payment_status: PaymentStatus,
    order_status: OrderStatus,
    failure_reason: Option<String>,
) -> Response {
    let mut tx = match ctx.db_conn.pool.begin().await {
        Ok(tx) => tx,
        Err(err) => {
            tracing::error!("Failed to start database transaction: {}", err);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let payment = match repository::find_by_intent_id(&mut *tx, intent.id.clone()).await {
        Ok(Some(payment)) => payment,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };

    if let Err(_) = repository::update_status(
        &mut *tx,
        payment.id.clone(),
        repository::UpdatePaymentStatusPayload {
            status: payment_status,
            failure_reason,
            receipt_url: intent.receipt_url,
        },
    )
    .await
    {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let order = match order::repository::find_by_id(&mut *tx, payment.order_id.clone()).await {
        Ok(Some(order)) => order,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };

    if order.status.can_transition_to(&order_status) {
        if let Err(_) =
            order::repository::update_status(&mut *tx, order.id.clone(), order_status).await
        {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    } else {
        tracing::info!(
            "Order {} already in status {}; webhook leaves it unchanged",
            order.id,
            order.status.to_string()
        );
    }

    match tx.commit().await {
        Ok(_) => StatusCode::OK.into_response(),
        Err(err) => {
            tracing::error!("Failed to commit database transaction: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn handle_webhook(State(ctx): State<Arc<Context>>, req: Request) -> Response {
    let signature_header = match req.headers().get("Stripe-Signature") {
        Some(header) => match header.to_str() {
            Ok(header) => String::from(header),
            Err(_) => return StatusCode::BAD_REQUEST.into_response(),
        },
        None => return StatusCode::BAD_REQUEST.into_response(),
    };

    let body = match axum::body::to_bytes(req.into_body(), usize::MAX).await {
        Ok(bytes) => match String::from_utf8(bytes.to_vec()) {
            Ok(body) => body,
            Err(_) => return StatusCode::BAD_REQUEST.into_response(),
        },
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    if !payment_service::verify_signature(
        ctx.payment.webhook_secret.as_str(),
        signature_header.as_str(),
        body.as_str(),
    ) {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let event = match serde_json::de::from_str::<Event>(body.as_str()) {
        Ok(event) => event,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    match event.event_type.as_str() {
        "payment_intent.succeeded" => {
            apply_intent_outcome(
                ctx,
                event.data.object,
                PaymentStatus::Succeeded,
                OrderStatus::Confirmed,
                None,
            )
            .await
        }
        "payment_intent.payment_failed" => {
            let failure_reason = event
                .data
                .object
                .last_payment_error
                .as_ref()
                .and_then(|failure| failure.message.clone());

            apply_intent_outcome(
                ctx,
                event.data.object,
                PaymentStatus::Failed,
                OrderStatus::Cancelled,
                failure_reason,
            )
            .await
        }
        "payment_intent.canceled" => {
            apply_intent_outcome(
                ctx,
                event.data.object,
                PaymentStatus::Cancelled,
                OrderStatus::Cancelled,
                None,
            )
            .await
        }
        event_type => {
            tracing::debug!("Ignoring webhook event type {}", event_type);
            StatusCode::OK.into_response()
        }
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/webhook", post(handle_webhook))
}
