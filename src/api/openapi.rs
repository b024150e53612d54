//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, borrows, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "1.0.0",
        description = "Library Management System REST API. Every response is wrapped in \
                       `{ success, message, data, error, meta }`."
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::create_book,
        books::get_book,
        books::update_book,
        books::delete_book,
        // Borrow
        borrows::borrow_book,
        borrows::borrow_summary,
    ),
    components(
        schemas(
            crate::models::Book,
            crate::models::BookInput,
            crate::models::BookPatch,
            crate::models::Genre,
            crate::models::Borrow,
            crate::models::BorrowInput,
            crate::models::BorrowSummary,
            crate::models::BorrowedBook,
            crate::api::PageMeta,
            crate::error::ErrorResponse,
            health::HealthResponse,
            health::ReadinessResponse,
            crate::config::StorageBackend,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog"),
        (name = "borrow", description = "Book borrowing")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
