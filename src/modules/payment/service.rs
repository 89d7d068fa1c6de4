use crate::modules::order::repository::Order;
use crate::types::Context;
use bigdecimal::{BigDecimal, ToPrimitive};
use hmac::{Hmac, Mac};
use reqwest::StatusCode;
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;

#[derive(Debug)]
pub enum Error {
    InvalidAmount,
    UnexpectedError,
}

#[derive(Deserialize, Debug)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub status: String,
}

pub fn amount_in_cents(total: &BigDecimal) -> Result<i64, Error> {
    (total.clone() * BigDecimal::from(100))
        .with_scale(0)
        .to_i64()
        .ok_or(Error::InvalidAmount)
}

/// Creates a payment intent with the provider for the order's full total.
pub async fn create_payment_intent(
    ctx: Arc<Context>,
    order: &Order,
    currency: &str,
) -> Result<PaymentIntent, Error> {
    let amount = amount_in_cents(&order.total_amount)?;

    let params = [
        ("amount", amount.to_string()),
        ("currency", currency.to_lowercase()),
        ("automatic_payment_methods[enabled]", String::from("true")),
        ("metadata[order_id]", order.id.clone()),
        ("metadata[order_code]", order.code.clone()),
        ("metadata[user_id]", order.user_id.clone()),
        (
            "metadata[environment]",
            String::from(ctx.app.environment.name()),
        ),
    ];

    let res = reqwest::Client::new()
        .post(format!("{}/v1/payment_intents", ctx.payment.api_endpoint))
        .bearer_auth(ctx.payment.secret_key.clone())
        .form(&params)
        .send()
        .await
        .map_err(|err| {
            tracing::error!(
                "Failed to create payment intent for order {}: {}",
                order.id,
                err
            );
            Error::UnexpectedError
        })?;

    if res.status() != StatusCode::OK {
        let data = res.text().await.unwrap_or_default();
        tracing::error!(
            "Payment provider rejected intent for order {}: {}",
            order.id,
            data
        );
        return Err(Error::UnexpectedError);
    }

    res.json::<PaymentIntent>().await.map_err(|err| {
        tracing::error!(
            "Failed to parse payment intent response for order {}: {}",
            order.id,
            err
        );
        Error::UnexpectedError
    })
}

/// Checks the `t=<timestamp>,v1=<hex>` webhook signature header: the
/// signature is HMAC-SHA256 over `"<timestamp>.<body>"` with the webhook
/// secret.
pub fn verify_signature(secret: &str, header: &str, body: &str) -> bool {
    let mut timestamp = None;
    let mut signature = None;

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => signature = Some(value),
            _ => {}
        }
    }

    let (timestamp, signature) = match (timestamp, signature) {
        (Some(timestamp), Some(signature)) => (timestamp, signature),
        _ => return false,
    };

    let decoded = match hex::decode(signature) {
        Ok(decoded) => decoded,
        Err(_) => return false,
    };

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(format!("{}.{}", timestamp, body).as_bytes());

    mac.verify_slice(decoded.as_ref()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::FromPrimitive;

    fn sign(secret: &str, timestamp: &str, body: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{}.{}", timestamp, body).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn valid_signature_passes() {
        let body = r#"{"type":"payment_intent.succeeded"}"#;
        let header = format!("t=1712000000,v1={}", sign("whsec_test", "1712000000", body));
        assert!(verify_signature("whsec_test", &header, body));
    }

    #[test]
    fn tampered_body_fails() {
        let body = r#"{"type":"payment_intent.succeeded"}"#;
        let header = format!("t=1712000000,v1={}", sign("whsec_test", "1712000000", body));
        assert!(!verify_signature(
            "whsec_test",
            &header,
            r#"{"type":"payment_intent.payment_failed"}"#
        ));
    }

    #[test]
    fn malformed_header_fails() {
        assert!(!verify_signature("whsec_test", "v1=deadbeef", "{}"));
        assert!(!verify_signature("whsec_test", "t=123", "{}"));
        assert!(!verify_signature("whsec_test", "t=123,v1=not-hex", "{}"));
    }

    #[test]
    fn totals_convert_to_cents() {
        let total = BigDecimal::from_f64(12.75).unwrap();
        assert_eq!(amount_in_cents(&total).unwrap(), 1275);
    }
}
