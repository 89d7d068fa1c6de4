use super::repository;
use crate::modules::user::repository as user_repository;
use crate::types::Context;
use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

#[derive(Serialize, Clone, Debug)]
pub struct ProcessedUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: NaiveDateTime,
    pub days_old: i64,
}

#[derive(Serialize, Clone, Debug, Default)]
pub struct Outcome {
    pub deleted_users: u64,
    pub deleted_codes: u64,
    pub processed_users: Vec<ProcessedUser>,
}

pub fn cutoff_for(days_threshold: u32, now: NaiveDateTime) -> NaiveDateTime {
    now - chrono::Duration::days(days_threshold as i64)
}

/// Deactivates unverified accounts older than the cutoff and removes their
/// verification codes. With `dry_run` the candidates are only reported.
pub async fn cleanup_unverified_users(
    ctx: Arc<Context>,
    days_threshold: u32,
    dry_run: bool,
) -> Result<Outcome, Error> {
    let now = Utc::now().naive_utc();
    let cutoff = cutoff_for(days_threshold, now);

    tracing::info!(
        "Starting cleanup of unverified users created before {} (dry_run: {})",
        cutoff,
        dry_run
    );

    let users = repository::find_unverified_users_before(&ctx.db_conn.pool, cutoff)
        .await
        .map_err(|_| Error::UnexpectedError)?;

    let processed_users = users
        .iter()
        .map(|user| ProcessedUser {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            created_at: user.created_at,
            days_old: (now - user.created_at).num_days(),
        })
        .collect::<Vec<ProcessedUser>>();

    if dry_run {
        return Ok(Outcome {
            deleted_users: 0,
            deleted_codes: 0,
            processed_users,
        });
    }

    let mut tx = ctx.db_conn.pool.begin().await.map_err(|err| {
        tracing::error!("Failed to start database transaction: {}", err);
        Error::UnexpectedError
    })?;

    let mut deleted_users = 0;
    let mut deleted_codes = 0;

    for user in users {
        deleted_codes +=
            repository::delete_codes_for_contact(&mut *tx, user.email.clone(), user.phone.clone())
                .await
                .map_err(|_| Error::UnexpectedError)?;

        user_repository::deactivate(&mut *tx, user.id.clone())
            .await
            .map_err(|_| Error::UnexpectedError)?;

        tracing::info!("Deactivating unverified user {} ({})", user.id, user.email);
        deleted_users += 1;
    }

    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit database transaction: {}", err);
        Error::UnexpectedError
    })?;

    Ok(Outcome {
        deleted_users,
        deleted_codes,
        processed_users,
    })
}

/// Hard-deletes verification codes past their expiry.
pub async fn cleanup_expired_codes(ctx: Arc<Context>, dry_run: bool) -> Result<Outcome, Error> {
    let deleted_codes = if dry_run {
        repository::count_expired_codes(&ctx.db_conn.pool)
            .await
            .map_err(|_| Error::UnexpectedError)? as u64
    } else {
        repository::delete_expired_codes(&ctx.db_conn.pool)
            .await
            .map_err(|_| Error::UnexpectedError)?
    };

    Ok(Outcome {
        deleted_users: 0,
        deleted_codes,
        processed_users: vec![],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn cutoff_is_days_before_now() {
        let now = NaiveDate::from_ymd_opt(2025, 6, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let cutoff = cutoff_for(7, now);
        assert_eq!(
            cutoff,
            NaiveDate::from_ymd_opt(2025, 6, 3)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        );
    }
}
