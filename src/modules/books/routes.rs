use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use bookstall_http::AppError;

use super::models::{Book, BookList, CreateBook, UpdateBook};
use super::repository;
use crate::extract::{Path, ValidatedJson};
use crate::modules::auth::CurrentSeller;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(state)
}

fn not_found(id: i64) -> AppError {
    AppError::not_found(format!("Book {} not found", id))
}

/// Load a book the current seller owns: 404 if absent, 403 if someone else's.
async fn owned_book(
    state: &AppState,
    current: &CurrentSeller,
    id: i64,
    action: &str,
) -> Result<Book, AppError> {
    let book = repository::find(&state.db, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if book.seller_id != current.0.id {
        return Err(AppError::forbidden(format!(
            "Not authorized to {} this book",
            action
        )));
    }
    Ok(book)
}

/// `POST /books`
async fn create_book(
    State(state): State<AppState>,
    current: CurrentSeller,
    ValidatedJson(payload): ValidatedJson<CreateBook>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let seller_id = current.0.id;
    if payload.seller_id.is_some_and(|requested| requested != seller_id) {
        return Err(AppError::forbidden(
            "Not authorized to create books for another seller",
        ));
    }

    let book = repository::insert(&state.db, &payload, seller_id).await?;

    tracing::info!(book_id = book.id, seller_id, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

/// `GET /books`
async fn list_books(State(state): State<AppState>) -> Result<Json<BookList>, AppError> {
    let books = repository::list(&state.db).await?;
    Ok(Json(BookList { books }))
}

/// `GET /books/{id}`
async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Book>, AppError> {
    repository::find(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// `PUT /books/{id}`
async fn update_book(
    State(state): State<AppState>,
    current: CurrentSeller,
    Path(id): Path<i64>,
    ValidatedJson(changes): ValidatedJson<UpdateBook>,
) -> Result<Json<Book>, AppError> {
    owned_book(&state, &current, id, "update").await?;

    let book = repository::update(&state.db, id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(book_id = id, "book updated");
    Ok(Json(book))
}

/// `DELETE /books/{id}`
async fn delete_book(
    State(state): State<AppState>,
    current: CurrentSeller,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    owned_book(&state, &current, id, "delete").await?;

    if !repository::delete(&state.db, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(book_id = id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
