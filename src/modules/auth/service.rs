use super::repository::{self, Session};
use crate::types::Context;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use std::sync::Arc;

#[derive(Debug)]
pub enum Error {
    InvalidToken,
    UnexpectedError,
}

pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| {
            tracing::error!("Failed to hash password: {}", err);
            Error::UnexpectedError
        })
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(hash) => hash,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

pub async fn issue_session(ctx: Arc<Context>, user_id: String) -> Result<Session, Error> {
    repository::create_session(&ctx.db_conn.pool, user_id)
        .await
        .map_err(|_| Error::UnexpectedError)
}

pub async fn verify_access_token(ctx: Arc<Context>, token: String) -> Result<Session, Error> {
    let session = repository::find_session_by_id(&ctx.db_conn.pool, token)
        .await
        .map_err(|_| Error::UnexpectedError)?
        .ok_or(Error::InvalidToken)?;

    if session.expires_at < Utc::now().naive_utc() {
        return Err(Error::InvalidToken);
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip_verifies() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
