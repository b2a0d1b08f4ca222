use sqlx::SqlitePool;

use super::models::{Book, CreateBook, UpdateBook};
use crate::error::StoreError;

const BOOK_COLUMNS: &str = "id, title, author, year, pages, seller_id";

pub async fn insert(pool: &SqlitePool, new: &CreateBook, seller_id: i64) -> Result<Book, StoreError> {
    let book = sqlx::query_as::<_, Book>(&format!(
        "INSERT INTO books (title, author, year, pages, seller_id)
         VALUES (?, ?, ?, ?, ?)
         RETURNING {BOOK_COLUMNS}"
    ))
    .bind(&new.title)
    .bind(&new.author)
    .bind(new.year)
    .bind(new.pages)
    .bind(seller_id)
    .fetch_one(pool)
    .await?;
    Ok(book)
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<Book>, StoreError> {
    let books = sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(books)
}

pub async fn list_by_seller(pool: &SqlitePool, seller_id: i64) -> Result<Vec<Book>, StoreError> {
    let books = sqlx::query_as::<_, Book>(&format!(
        "SELECT {BOOK_COLUMNS} FROM books WHERE seller_id = ? ORDER BY id"
    ))
    .bind(seller_id)
    .fetch_all(pool)
    .await?;
    Ok(books)
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Book>, StoreError> {
    let book = sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(book)
}

/// Replace the mutable fields; returns `None` when the book does not exist.
pub async fn update(pool: &SqlitePool, id: i64, changes: &UpdateBook) -> Result<Option<Book>, StoreError> {
    let book = sqlx::query_as::<_, Book>(&format!(
        "UPDATE books
         SET title = ?, author = ?, year = ?, pages = ?
         WHERE id = ?
         RETURNING {BOOK_COLUMNS}"
    ))
    .bind(&changes.title)
    .bind(&changes.author)
    .bind(changes.year)
    .bind(changes.pages)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(book)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, StoreError> {
    let removed = sqlx::query("DELETE FROM books WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(removed > 0)
}
