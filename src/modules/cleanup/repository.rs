use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::PgExecutor;

use crate::modules::user::repository::User;

#[derive(Serialize, Clone, Debug)]
pub struct CleanupStats {
    pub total_users: i64,
    pub verified_users: i64,
    pub unverified_users: i64,
    pub unverified_old_users: i64,
    pub total_verification_codes: i64,
    pub expired_codes: i64,
    pub active_codes: i64,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

async fn count<'e, E: PgExecutor<'e>>(e: E, sql: &str, cutoff: Option<NaiveDateTime>) -> Result<i64> {
    let mut query = sqlx::query_scalar::<_, i64>(sql);

    if let Some(cutoff) = cutoff {
        query = query.bind(cutoff);
    }

    query.fetch_one(e).await.map_err(|err| {
        tracing::error!("Error occurred while collecting cleanup stats: {}", err);
        Error::UnexpectedError
    })
}

pub async fn stats<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    cutoff: NaiveDateTime,
) -> Result<CleanupStats> {
    Ok(CleanupStats {
        total_users: count(e, "SELECT COUNT(id) FROM users WHERE is_active = TRUE", None).await?,
        verified_users: count(
            e,
            "SELECT COUNT(id) FROM users WHERE is_active = TRUE AND is_verified = TRUE",
            None,
        )
        .await?,
        unverified_users: count(
            e,
            "SELECT COUNT(id) FROM users WHERE is_active = TRUE AND is_verified = FALSE",
            None,
        )
        .await?,
        unverified_old_users: count(
            e,
            "SELECT COUNT(id) FROM users WHERE is_active = TRUE AND is_verified = FALSE AND created_at < $1",
            Some(cutoff),
        )
        .await?,
        total_verification_codes: count(e, "SELECT COUNT(id) FROM verification_codes", None)
            .await?,
        expired_codes: count(
            e,
            "SELECT COUNT(id) FROM verification_codes WHERE expires_at < NOW()",
            None,
        )
        .await?,
        active_codes: count(
            e,
            "SELECT COUNT(id) FROM verification_codes WHERE expires_at >= NOW() AND is_used = FALSE",
            None,
        )
        .await?,
    })
}

pub async fn find_unverified_users_before<'e, E: PgExecutor<'e>>(
    e: E,
    cutoff: NaiveDateTime,
) -> Result<Vec<User>> {
    sqlx::query_as::<_, User>(
        "
        SELECT * FROM users
        WHERE is_active = TRUE AND is_verified = FALSE AND created_at < $1
        ORDER BY created_at
        ",
    )
    .bind(cutoff)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching unverified users: {}", err);
        Error::UnexpectedError
    })
}

pub async fn delete_codes_for_contact<'e, E: PgExecutor<'e>>(
    e: E,
    email: String,
    phone: Option<String>,
) -> Result<u64> {
    sqlx::query("DELETE FROM verification_codes WHERE email = $1 OR ($2::TEXT IS NOT NULL AND phone = $2)")
        .bind(email.clone())
        .bind(phone)
        .execute(e)
        .await
        .map(|result| result.rows_affected())
        .map_err(|err| {
            tracing::error!(
                "Error occurred while deleting verification codes for {}: {}",
                email,
                err
            );
            Error::UnexpectedError
        })
}

pub async fn delete_expired_codes<'e, E: PgExecutor<'e>>(e: E) -> Result<u64> {
    sqlx::query("DELETE FROM verification_codes WHERE expires_at < NOW()")
        .execute(e)
        .await
        .map(|result| result.rows_affected())
        .map_err(|err| {
            tracing::error!("Error occurred while deleting expired codes: {}", err);
            Error::UnexpectedError
        })
}

pub async fn count_expired_codes<'e, E: PgExecutor<'e>>(e: E) -> Result<i64> {
    count(
        e,
        "SELECT COUNT(id) FROM verification_codes WHERE expires_at < NOW()",
        None,
    )
    .await
}
