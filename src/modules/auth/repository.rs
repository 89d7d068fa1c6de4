use chrono::{NaiveDateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use ulid::Ulid;

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub expires_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct VerificationCode {
    pub id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub code: String,
    pub expires_at: NaiveDateTime,
    pub is_used: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

const SESSION_LIFETIME_DAYS: i64 = 7;
const CODE_LIFETIME_MINUTES: i64 = 10;

pub async fn create_session<'e, E: PgExecutor<'e>>(e: E, user_id: String) -> Result<Session> {
    sqlx::query_as::<_, Session>(
        "INSERT INTO sessions (id, user_id, expires_at) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Ulid::new().to_string())
    .bind(user_id.clone())
    .bind(Utc::now().naive_utc() + chrono::Duration::days(SESSION_LIFETIME_DAYS))
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while creating a session for user {}: {}",
            user_id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn find_session_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<Session>> {
    sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching session {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub struct CreateVerificationCodePayload {
    pub email: Option<String>,
    pub phone: Option<String>,
}

fn generate_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

pub async fn create_verification_code<'e, E: PgExecutor<'e>>(
    e: E,
    payload: CreateVerificationCodePayload,
) -> Result<VerificationCode> {
    sqlx::query_as::<_, VerificationCode>(
        "
        INSERT INTO verification_codes (id, email, phone, code, expires_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.email)
    .bind(payload.phone)
    .bind(generate_code())
    .bind(Utc::now().naive_utc() + chrono::Duration::minutes(CODE_LIFETIME_MINUTES))
    .fetch_one(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while creating a verification code: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_valid_code_by_email<'e, E: PgExecutor<'e>>(
    e: E,
    email: String,
    code: String,
) -> Result<Option<VerificationCode>> {
    sqlx::query_as::<_, VerificationCode>(
        "
        SELECT * FROM verification_codes
        WHERE email = $1 AND code = $2 AND is_used = FALSE AND expires_at >= NOW()
        ORDER BY created_at DESC
        LIMIT 1
        ",
    )
    .bind(email.clone())
    .bind(code)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while fetching verification code for {}: {}",
            email,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn mark_code_used<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<()> {
    sqlx::query("UPDATE verification_codes SET is_used = TRUE WHERE id = $1")
        .bind(id.clone())
        .execute(e)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!(
                "Error occurred while consuming verification code {}: {}",
                id,
                err
            );
            Error::UnexpectedError
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
