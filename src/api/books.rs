//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookInput, BookPatch, BookQuery, ListBooksParams},
    services::books::parse_book_id,
    AppState,
};

use super::{ApiResponse, PageMeta};

/// List books with genre filter, sorting and pagination
#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    params(
        ("filter" = Option<String>, Query, description = "Genre code, case-insensitive"),
        ("sortBy" = Option<String>, Query, description = "Sort field (default: createdAt)"),
        ("sort" = Option<String>, Query, description = "`asc` or `desc` (default: desc)"),
        ("limit" = Option<String>, Query, description = "Page size, positive integer (default: 10)"),
        ("page" = Option<String>, Query, description = "Page number, positive integer (default: 1)")
    ),
    responses(
        (status = 200, description = "Page of books, wrapped in the response envelope with meta", body = [Book]),
        (status = 400, description = "Invalid filter, sort field or pagination", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListBooksParams>, AppError>,
) -> AppResult<Json<ApiResponse<Vec<Book>>>> {
    let query = BookQuery::from_params(&params)?;

    let (books, total) = state
        .services
        .books
        .list(&query)
        .await
        .map_err(|e| e.context("Failed to retrieve books"))?;

    Ok(Json(
        ApiResponse::ok("Books retrieved successfully", books).with_meta(PageMeta {
            total,
            page: query.pagination.page,
            limit: query.pagination.limit,
        }),
    ))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 409, description = "ISBN already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<Book>>)> {
    let input = BookInput::from_json(body)?;

    let book = state
        .services
        .books
        .create(input)
        .await
        .map_err(|e| e.context("Failed to create book"))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Book created successfully", book)),
    ))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/api/books/{bookId}",
    tag = "books",
    params(("bookId" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 400, description = "Invalid book ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    WithRejection(Path(book_id), _): WithRejection<Path<String>, AppError>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let id = parse_book_id(&book_id)?;

    let book = state
        .services
        .books
        .get(id)
        .await
        .map_err(|e| e.context("Failed to retrieve book"))?;

    Ok(Json(ApiResponse::ok("Book retrieved successfully", book)))
}

/// Partially update a book
#[utoipa::path(
    put,
    path = "/api/books/{bookId}",
    tag = "books",
    params(("bookId" = String, Path, description = "Book ID")),
    request_body = BookPatch,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid book ID or validation failed", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "ISBN already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    WithRejection(Path(book_id), _): WithRejection<Path<String>, AppError>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, AppError>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let id = parse_book_id(&book_id)?;
    let patch = BookPatch::from_json(body)?;

    let book = state
        .services
        .books
        .update(id, patch)
        .await
        .map_err(|e| e.context("Failed to update book"))?;

    Ok(Json(ApiResponse::ok("Book updated successfully", book)))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/api/books/{bookId}",
    tag = "books",
    params(("bookId" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted, data is null"),
        (status = 400, description = "Invalid book ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    WithRejection(Path(book_id), _): WithRejection<Path<String>, AppError>,
) -> AppResult<Json<ApiResponse<()>>> {
    let id = parse_book_id(&book_id)?;

    state
        .services
        .books
        .delete(id)
        .await
        .map_err(|e| e.context("Failed to delete book"))?;

    Ok(Json(ApiResponse::ok("Book deleted successfully", ())))
}
