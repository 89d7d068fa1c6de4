use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use ulid::Ulid;

use crate::utils::{
    database,
    pagination::{Paginated, Pagination},
};

#[derive(Serialize, Deserialize, Clone, Debug, sqlx::FromRow)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub owner_id: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

pub struct CreateCompanyPayload {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub owner_id: Option<String>,
}

#[derive(Clone)]
pub struct UpdateCompanyPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug)]
pub enum Error {
    NameTaken,
    OwnerNotFound,
    UnexpectedError,
}

type Result<T> = std::result::Result<T, Error>;

pub async fn create<'e, E: PgExecutor<'e>>(e: E, payload: CreateCompanyPayload) -> Result<Company> {
    sqlx::query_as::<_, Company>(
        "
        INSERT INTO companies (id, name, email, phone, address, owner_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.name)
    .bind(payload.email)
    .bind(payload.phone)
    .bind(payload.address)
    .bind(payload.owner_id)
    .fetch_one(e)
    .await
    .map_err(|err| match database::violated_constraint(&err) {
        Some("uq_companies_name") => Error::NameTaken,
        Some("companies_owner_id_fkey") => Error::OwnerNotFound,
        _ => {
            tracing::error!("Error occurred while creating a company: {}", err);
            Error::UnexpectedError
        }
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<Company>> {
    sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1 AND is_active = TRUE")
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching company {}: {}", id, err);
            Error::UnexpectedError
        })
}

pub async fn find_many<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    pagination: Pagination,
) -> Result<Paginated<Company>> {
    let companies = sqlx::query_as::<_, Company>(
        "
        SELECT * FROM companies
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
        tracing::error!("Error occurred while fetching many companies: {}", err);
        Error::UnexpectedError
    })?;

    let total =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(id) FROM companies WHERE is_active = TRUE")
            .fetch_one(e)
            .await
            .map_err(|err| {
                tracing::error!("Error occurred while counting companies: {}", err);
                Error::UnexpectedError
            })?;

    Ok(Paginated::new(
        companies,
        total as u32,
        pagination.skip,
        pagination.limit,
    ))
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    payload: UpdateCompanyPayload,
) -> Result<Option<Company>> {
    sqlx::query_as::<_, Company>(
        "
        UPDATE companies SET
            name = COALESCE($1, name),
            email = COALESCE($2, email),
            phone = COALESCE($3, phone),
            address = COALESCE($4, address),
            updated_at = NOW()
        WHERE id = $5 AND is_active = TRUE
        RETURNING *
        ",
    )
    .bind(payload.name)
    .bind(payload.email)
    .bind(payload.phone)
    .bind(payload.address)
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| match database::violated_constraint(&err) {
        Some("uq_companies_name") => Error::NameTaken,
        _ => {
            tracing::error!("Error occurred while updating company {}: {}", id, err);
            Error::UnexpectedError
        }
    })
}

pub async fn update_owner<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    owner_id: String,
) -> Result<Option<Company>> {
    sqlx::query_as::<_, Company>(
        "
        UPDATE companies SET owner_id = $1, updated_at = NOW()
        WHERE id = $2 AND is_active = TRUE
        RETURNING *
        ",
    )
    .bind(owner_id)
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while reassigning owner for company {}: {}",
            id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn deactivate<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<bool> {
    sqlx::query(
        "UPDATE companies SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active = TRUE",
    )
    .bind(id.clone())
    .execute(e)
    .await
    .map(|result| result.rows_affected() > 0)
    .map_err(|err| {
        tracing::error!("Error occurred while deactivating company {}: {}", id, err);
        Error::UnexpectedError
    })
}
