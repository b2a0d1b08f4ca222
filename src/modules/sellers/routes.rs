use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use bookstall_http::AppError;

use super::models::{CreateSeller, SellerDetailResponse, SellerResponse, UpdateSeller};
use super::repository;
use crate::error::auth_failure;
use crate::extract::{Path, ValidatedJson};
use crate::modules::auth::CurrentSeller;
use crate::modules::books::repository as books;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_sellers).post(create_seller))
        .route(
            "/{id}",
            get(get_seller).put(update_seller).delete(delete_seller),
        )
        .with_state(state)
}

fn not_found(id: i64) -> AppError {
    AppError::not_found(format!("Seller {} not found", id))
}

fn ensure_self(current: &CurrentSeller, id: i64, action: &str) -> Result<(), AppError> {
    if current.0.id == id {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Not authorized to {} this seller",
            action
        )))
    }
}

/// `POST /seller`
async fn create_seller(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateSeller>,
) -> Result<(StatusCode, Json<SellerResponse>), AppError> {
    let password_hash = state
        .passwords
        .hash(&payload.password)
        .await
        .map_err(auth_failure)?;

    let seller = repository::insert(&state.db, &payload, &password_hash).await?;

    tracing::info!(seller_id = seller.id, "seller registered");
    Ok((StatusCode::CREATED, Json(seller.into())))
}

/// `GET /seller`
async fn list_sellers(State(state): State<AppState>) -> Result<Json<Vec<SellerResponse>>, AppError> {
    let sellers = repository::list(&state.db).await?;
    Ok(Json(sellers.into_iter().map(SellerResponse::from).collect()))
}

/// `GET /seller/{id}`
async fn get_seller(
    State(state): State<AppState>,
    _current: CurrentSeller,
    Path(id): Path<i64>,
) -> Result<Json<SellerDetailResponse>, AppError> {
    let seller = repository::find(&state.db, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let books = books::list_by_seller(&state.db, id).await?;

    Ok(Json(SellerDetailResponse {
        seller: seller.into(),
        books: books.into_iter().map(Into::into).collect(),
    }))
}

/// `PUT /seller/{id}`
async fn update_seller(
    State(state): State<AppState>,
    current: CurrentSeller,
    Path(id): Path<i64>,
    ValidatedJson(changes): ValidatedJson<UpdateSeller>,
) -> Result<Json<SellerResponse>, AppError> {
    ensure_self(&current, id, "update")?;

    let seller = repository::update(&state.db, id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(seller_id = id, "seller updated");
    Ok(Json(seller.into()))
}

/// `DELETE /seller/{id}`
async fn delete_seller(
    State(state): State<AppState>,
    current: CurrentSeller,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    ensure_self(&current, id, "delete")?;

    if !repository::delete(&state.db, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(seller_id = id, "seller deleted");
    Ok(StatusCode::NO_CONTENT)
}
