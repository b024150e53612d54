//! Borrow endpoints

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{Borrow, BorrowInput, BorrowSummary},
    AppState,
};

use super::ApiResponse;

/// Borrow copies of a book
#[utoipa::path(
    post,
    path = "/api/borrow",
    tag = "borrow",
    request_body = BorrowInput,
    responses(
        (status = 201, description = "Book borrowed", body = Borrow),
        (status = 400, description = "Validation failed or not enough copies", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<Borrow>>)> {
    let input = BorrowInput::from_json(body)?;

    let borrow = state
        .services
        .borrows
        .borrow(input)
        .await
        .map_err(|e| e.context("Failed to borrow book"))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Book borrowed successfully", borrow)),
    ))
}

/// Total borrowed quantity per book
#[utoipa::path(
    get,
    path = "/api/borrow",
    tag = "borrow",
    responses(
        (status = 200, description = "Borrowed books summary", body = [BorrowSummary])
    )
)]
pub async fn borrow_summary(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<BorrowSummary>>>> {
    let summary = state
        .services
        .borrows
        .summary()
        .await
        .map_err(|e| e.context("Failed to retrieve borrowed books summary"))?;

    Ok(Json(ApiResponse::ok(
        "Borrowed books summary retrieved successfully",
        summary,
    )))
}
