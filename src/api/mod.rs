//! API handlers for Bookshelf REST endpoints

pub mod books;
pub mod borrows;
pub mod health;
pub mod openapi;

use axum::{routing::get, Router};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::AppState;

/// Pagination metadata of list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageMeta {
    /// Number of records matching the filter, across all pages
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// Success envelope shared by every endpoint.
///
/// `data` is always serialized, so a `()` payload renders as `null`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: &'static str,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: &'static str, data: T) -> Self {
        Self {
            success: true,
            message,
            data,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: PageMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:bookId",
            get(books::get_book).put(books::update_book).delete(books::delete_book),
        )
        // Borrows
        .route("/borrow", get(borrows::borrow_summary).post(borrows::borrow_book));

    Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api", api)
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
