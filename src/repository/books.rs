//! Books repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookQuery, Genre, NewBook},
};

const BOOK_COLUMNS: &str =
    "id, title, author, genre, isbn, description, copies, available, created_at, updated_at";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Map a unique violation on `isbn` to a conflict, everything else stays a
/// database error.
fn map_write_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("A book with this ISBN already exists".to_string())
        }
        _ => AppError::Database(e),
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        // Sort column and direction come from closed enums, never from raw input.
        let select_query = format!(
            r#"
            SELECT {}
            FROM books
            WHERE ($1::genre IS NULL OR genre = $1)
            ORDER BY {} {}, id ASC
            LIMIT $2 OFFSET $3
            "#,
            BOOK_COLUMNS,
            query.sort_by.column(),
            query.direction.sql(),
        );

        let books = sqlx::query_as::<_, Book>(&select_query)
            .bind(query.genre)
            .bind(query.pagination.limit)
            .bind(query.pagination.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn count(&self, genre: Option<Genre>) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE ($1::genre IS NULL OR genre = $1)")
            .bind(genre)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn insert(&self, book: &NewBook) -> AppResult<Book> {
        let now = Utc::now();
        sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (id, title, author, genre, isbn, description, copies, available, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.genre)
        .bind(&book.isbn)
        .bind(&book.description)
        .bind(book.copies)
        .bind(book.available)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn update(&self, id: Uuid, book: &NewBook) -> AppResult<Option<Book>> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $2, author = $3, genre = $4, isbn = $5, description = $6,
                copies = $7, available = $8, updated_at = $9
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.genre)
        .bind(&book.isbn)
        .bind(&book.description)
        .bind(book.copies)
        .bind(book.available)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn take_copies(&self, id: Uuid, quantity: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET copies = copies - $2,
                available = (copies - $2) > 0,
                updated_at = $3
            WHERE id = $1 AND copies >= $2
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(id)
        .bind(quantity)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }
}
