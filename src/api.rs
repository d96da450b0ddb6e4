use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    routing::get,
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{internal_error, ApiError};
use crate::models::{
    Book, BookFilters, BookPatch, BookResponse, BooksResponse, MessageResponse,
};
use crate::repo::BookRepo;
use crate::validation::Validated;

#[derive(Clone)]
struct AppState<R> {
    repo: R,
}

pub fn build_app<R: BookRepo>(repo: R) -> Router {
    Router::new()
        .route("/books", get(list_books::<R>).post(insert_book::<R>))
        .route(
            "/books/{isbn}",
            get(get_book::<R>)
                .put(update_book::<R>)
                .delete(delete_book::<R>),
        )
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { repo })
}

/// The `{isbn}` path segment, rejecting in the API's error shape.
struct IsbnPath(String);

impl<S> FromRequestParts<S> for IsbnPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(isbn) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::rejected(rejection.status(), rejection.body_text())
            })?;
        Ok(IsbnPath(isbn))
    }
}

async fn list_books<R: BookRepo>(
    State(state): State<AppState<R>>,
    Query(filters): Query<BookFilters>,
) -> Result<Json<BooksResponse>, ApiError> {
    let books = state
        .repo
        .list_books(filters)
        .await
        .map_err(internal_error)?;

    info!("Retrieved {} books from the DB", books.len());

    Ok(Json(BooksResponse { books }))
}

async fn get_book<R: BookRepo>(
    State(state): State<AppState<R>>,
    IsbnPath(isbn): IsbnPath,
) -> Result<Json<BookResponse>, ApiError> {
    let book = state.repo.get_book(&isbn).await.map_err(internal_error)?;

    match book {
        Some(book) => {
            info!("Retrieved book from DB: {:?}", book);
            Ok(Json(BookResponse { book }))
        }
        None => {
            info!("No book found in DB with isbn: {}", isbn);
            Err(ApiError::book_not_found(&isbn))
        }
    }
}

async fn insert_book<R: BookRepo>(
    State(state): State<AppState<R>>,
    Validated(book): Validated<Book>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let inserted_book = state
        .repo
        .insert_book(book)
        .await
        .map_err(internal_error)?;

    info!("Inserted book into the DB: {:?}", inserted_book);

    Ok((
        StatusCode::CREATED,
        Json(BookResponse {
            book: inserted_book,
        }),
    ))
}

async fn update_book<R: BookRepo>(
    State(state): State<AppState<R>>,
    IsbnPath(isbn): IsbnPath,
    Validated(patch): Validated<BookPatch>,
) -> Result<Json<BookResponse>, ApiError> {
    let updated_book = state
        .repo
        .update_book(&isbn, patch)
        .await
        .map_err(internal_error)?;

    match updated_book {
        Some(book) => {
            info!("Updated book in DB: {:?}", book);
            Ok(Json(BookResponse { book }))
        }
        None => {
            info!("Tried to update non-existent book with isbn: {}", isbn);
            Err(ApiError::book_not_found(&isbn))
        }
    }
}

async fn delete_book<R: BookRepo>(
    State(state): State<AppState<R>>,
    IsbnPath(isbn): IsbnPath,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = state
        .repo
        .delete_book(&isbn)
        .await
        .map_err(internal_error)?;

    if deleted {
        info!("Deleted book from DB with isbn: {}", isbn);
        Ok(Json(MessageResponse {
            message: "Book deleted",
        }))
    } else {
        info!("Tried to delete non-existent book with isbn: {}", isbn);
        Err(ApiError::book_not_found(&isbn))
    }
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}
