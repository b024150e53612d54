//! Borrowing service

use crate::{
    error::{AppError, AppResult},
    models::{Borrow, BorrowInput, BorrowSummary},
    repository::Repository,
};

use super::books::book_not_found;

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
}

impl BorrowsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow copies of a book.
    ///
    /// Copies are taken with a single conditional update, then the borrow is
    /// recorded. The two writes are not transactional.
    pub async fn borrow(&self, input: BorrowInput) -> AppResult<Borrow> {
        let new_borrow = input.into_new_borrow()?;

        let book = self
            .repository
            .books
            .get(new_borrow.book_id)
            .await?
            .ok_or_else(book_not_found)?;

        if book.copies < new_borrow.quantity {
            return Err(AppError::InsufficientCopies {
                requested: new_borrow.quantity,
                available: book.copies,
            });
        }

        let Some(book) = self
            .repository
            .books
            .take_copies(new_borrow.book_id, new_borrow.quantity)
            .await?
        else {
            // Another borrow or a delete won the race since the read above.
            let available = match self.repository.books.get(new_borrow.book_id).await? {
                Some(book) => book.copies,
                None => return Err(book_not_found()),
            };
            return Err(AppError::InsufficientCopies {
                requested: new_borrow.quantity,
                available,
            });
        };

        let borrow = self.repository.borrows.insert(&new_borrow).await?;
        tracing::info!(
            "Borrowed {} copies of book id={} ({} left)",
            borrow.quantity,
            book.id,
            book.copies
        );
        Ok(borrow)
    }

    pub async fn summary(&self) -> AppResult<Vec<BorrowSummary>> {
        self.repository.borrows.summary().await
    }
}
