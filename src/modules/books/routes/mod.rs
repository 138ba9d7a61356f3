//! HTTP handlers for the books module.

mod payload;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookshelf_http::error::AppError;
use serde_json::Value;

use super::models::{Book, Page};
use super::query::{BookQuery, QueryOptions};
use super::service::BookManager;

type SharedManager = Arc<BookManager>;

/// Routes relative to the module mount point.
pub fn router(manager: SharedManager) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{id}",
            get(get_book)
                .patch(update_book)
                .put(update_book)
                .delete(delete_book),
        )
        .with_state(manager)
}

async fn create_book(
    State(manager): State<SharedManager>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(body) = body.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let new_book = payload::parse_new_book(&body)?;

    let book = manager.create_book(new_book).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn list_books(
    State(manager): State<SharedManager>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Page<Book>>, AppError> {
    let Query(pairs) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let options = QueryOptions::from(BookQuery::from_pairs(pairs));

    Ok(Json(manager.get_all_books(&options).await))
}

async fn get_book(
    State(manager): State<SharedManager>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(manager.get_book_by_id(&id).await?))
}

async fn update_book(
    State(manager): State<SharedManager>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Json(body) = body.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let patch = payload::parse_patch(&body)?;

    Ok(Json(manager.update_book(&id, patch).await?))
}

async fn delete_book(
    State(manager): State<SharedManager>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    manager.delete_book(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
