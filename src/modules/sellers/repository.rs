use sqlx::SqlitePool;

use super::models::{CreateSeller, Seller, UpdateSeller};
use crate::error::StoreError;

const SELLER_COLUMNS: &str = "id, first_name, last_name, email, password";

/// Insert a seller whose password has already been hashed.
pub async fn insert(
    pool: &SqlitePool,
    new: &CreateSeller,
    password_hash: &str,
) -> Result<Seller, StoreError> {
    sqlx::query_as::<_, Seller>(&format!(
        "INSERT INTO sellers (first_name, last_name, email, password)
         VALUES (?, ?, ?, ?)
         RETURNING {SELLER_COLUMNS}"
    ))
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|err| StoreError::from_seller_write(err, &new.email))
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<Seller>, StoreError> {
    let sellers = sqlx::query_as::<_, Seller>(&format!(
        "SELECT {SELLER_COLUMNS} FROM sellers ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(sellers)
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Seller>, StoreError> {
    let seller = sqlx::query_as::<_, Seller>(&format!(
        "SELECT {SELLER_COLUMNS} FROM sellers WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(seller)
}

/// Email lookup; the column collates case-insensitively.
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Seller>, StoreError> {
    let seller = sqlx::query_as::<_, Seller>(&format!(
        "SELECT {SELLER_COLUMNS} FROM sellers WHERE email = ?"
    ))
    .bind(email.trim())
    .fetch_optional(pool)
    .await?;
    Ok(seller)
}

/// Apply the provided fields; returns `None` when the seller does not exist.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    changes: &UpdateSeller,
) -> Result<Option<Seller>, StoreError> {
    sqlx::query_as::<_, Seller>(&format!(
        "UPDATE sellers
         SET first_name = COALESCE(?, first_name),
             last_name  = COALESCE(?, last_name),
             email      = COALESCE(?, email)
         WHERE id = ?
         RETURNING {SELLER_COLUMNS}"
    ))
    .bind(changes.first_name.as_deref())
    .bind(changes.last_name.as_deref())
    .bind(changes.email.as_deref())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|err| StoreError::from_seller_write(err, changes.email.as_deref().unwrap_or_default()))
}

/// Delete a seller and their books in one transaction. Returns whether the
/// seller existed.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, StoreError> {
    let mut tx = pool.begin().await?;

    let books = sqlx::query("DELETE FROM books WHERE seller_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let removed = sqlx::query("DELETE FROM sellers WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    tracing::debug!(seller_id = id, books, removed, "seller delete committed");
    Ok(removed > 0)
}
