//! Business logic services

pub mod books;
pub mod borrows;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub borrows: borrows::BorrowsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            books: books::BooksService::new(repository.clone()),
            borrows: borrows::BorrowsService::new(repository),
        }
    }
}
