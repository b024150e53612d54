//! Data models for Bookshelf

pub mod book;
pub mod book_query;
pub mod borrow;
pub mod enums;
pub mod payload;

// Re-export commonly used types
pub use book::{Book, BookInput, BookPatch, NewBook};
pub use book_query::{BookQuery, ListBooksParams, Pagination, SortDirection, SortField};
pub use borrow::{Borrow, BorrowInput, BorrowSummary, BorrowedBook, NewBorrow};
pub use enums::Genre;
pub use payload::JsonFields;
