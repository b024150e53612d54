//! Borrows repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::BorrowStore;
use crate::{
    error::AppResult,
    models::{Borrow, BorrowSummary, BorrowedBook, NewBorrow},
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BorrowStore for BorrowsRepository {
    async fn insert(&self, borrow: &NewBorrow) -> AppResult<Borrow> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, Borrow>(
            r#"
            INSERT INTO borrows (id, book_id, quantity, due_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, book_id, quantity, due_date, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(borrow.book_id)
        .bind(borrow.quantity)
        .bind(borrow.due_date)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn summary(&self) -> AppResult<Vec<BorrowSummary>> {
        let rows: Vec<(String, String, i64)> = sqlx::query_as(
            r#"
            SELECT b.title, b.isbn, SUM(br.quantity)::bigint AS total_quantity
            FROM borrows br
            JOIN books b ON b.id = br.book_id
            GROUP BY b.id, b.title, b.isbn
            ORDER BY b.title, b.isbn
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(title, isbn, total_quantity)| BorrowSummary {
                book: BorrowedBook { title, isbn },
                total_quantity,
            })
            .collect())
    }
}
