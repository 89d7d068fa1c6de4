use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::str::FromStr;
use ulid::Ulid;

use crate::utils::{
    database,
    pagination::{Paginated, Pagination},
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role")]
pub enum Role {
    #[serde(rename = "ADMIN")]
    #[sqlx(rename = "ADMIN")]
    Admin,
    #[serde(rename = "COMPANY")]
    #[sqlx(rename = "COMPANY")]
    Company,
    #[serde(rename = "BRANCH")]
    #[sqlx(rename = "BRANCH")]
    Branch,
    #[serde(rename = "USER")]
    #[sqlx(rename = "USER")]
    User,
}

impl ToString for Role {
    fn to_string(&self) -> String {
        match self {
            Role::Admin => String::from("ADMIN"),
            Role::Company => String::from("COMPANY"),
            Role::Branch => String::from("BRANCH"),
            Role::User => String::from("USER"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "COMPANY" => Ok(Role::Company),
            "BRANCH" => Ok(Role::Branch),
            "USER" => Ok(Role::User),
            _ => Err(format!("'{}' is not a valid Role", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_verified: bool,
    pub role: Role,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

pub fn is_admin(user: &User) -> bool {
    user.role == Role::Admin
}

pub struct CreateUserPayload {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub hashed_password: String,
}

#[derive(Debug)]
pub enum Error {
    UsernameTaken,
    EmailTaken,
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

pub async fn create<'e, E>(e: E, payload: CreateUserPayload) -> Result<User>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, User>(
        "
        INSERT INTO users (id, username, email, phone, hashed_password)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.username)
    .bind(payload.email)
    .bind(payload.phone)
    .bind(payload.hashed_password)
    .fetch_one(e)
    .await
    .map_err(|err| match database::violated_constraint(&err) {
        Some("uq_users_username") => Error::UsernameTaken,
        Some("uq_users_email") => Error::EmailTaken,
        _ => {
            tracing::error!("Error occurred while creating a user account: {}", err);
            Error::UnexpectedError
        }
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND is_active = TRUE")
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching user with id {}: {}", id, err);
            Error::UnexpectedError
        })
}

/// Opt-in lookup that also returns soft-deleted accounts.
pub async fn find_by_id_with_inactive<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching user with id {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn find_by_email<'e, E: PgExecutor<'e>>(e: E, email: String) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1 AND is_active = TRUE")
        .bind(email.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while fetching user with email {}: {}",
                email,
                err
            );
            Error::UnexpectedError
        })
}

pub async fn find_many<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    pagination: Pagination,
) -> Result<Paginated<User>> {
    let users = sqlx::query_as::<_, User>(
        "
        SELECT * FROM users
        WHERE is_active = TRUE
        ORDER BY created_at DESC
        OFFSET $1 LIMIT $2
        ",
    )
    .bind(pagination.skip as i64)
    .bind(pagination.limit as i64)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while fetching many users: {}", err);
        Error::UnexpectedError
    })?;

    let total =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(id) FROM users WHERE is_active = TRUE")
            .fetch_one(e)
            .await
            .map_err(|err| {
                tracing::error!("Error occurred while counting users: {}", err);
                Error::UnexpectedError
            })?;

    Ok(Paginated::new(
        users,
        total as u32,
        pagination.skip,
        pagination.limit,
    ))
}

pub async fn update_role<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    role: Role,
) -> Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "
        UPDATE users SET role = $1, updated_at = NOW()
        WHERE id = $2 AND is_active = TRUE
        RETURNING *
        ",
    )
    .bind(role)
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while updating role for user {}: {}",
            id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn mark_verified<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<()> {
    sqlx::query("UPDATE users SET is_verified = TRUE, updated_at = NOW() WHERE id = $1")
        .bind(id.clone())
        .execute(e)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!("Error occurred while verifying user {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn deactivate<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<bool> {
    sqlx::query(
        "UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active = TRUE",
    )
    .bind(id.clone())
    .execute(e)
    .await
    .map(|result| result.rows_affected() > 0)
    .map_err(|err| {
        tracing::error!("Error occurred while deactivating user {}: {}", id, err);
        Error::UnexpectedError
    })
}
