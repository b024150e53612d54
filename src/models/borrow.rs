//! Borrow model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::borrow::Cow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::payload::JsonFields;
use crate::error::AppResult;

/// Borrow record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Borrow {
    pub id: Uuid,
    /// Borrowed book ID
    #[serde(rename = "book")]
    pub book_id: Uuid,
    pub quantity: i32,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBorrow {
    pub book_id: Uuid,
    pub quantity: i32,
    pub due_date: DateTime<Utc>,
}

/// Borrow request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowInput {
    /// ID of the book to borrow
    pub book: Option<String>,
    #[validate(range(min = 1, message = "Quantity must be a positive integer"))]
    pub quantity: Option<i32>,
    /// RFC 3339 timestamp
    pub due_date: Option<DateTime<Utc>>,
}

impl BorrowInput {
    pub fn from_json(body: Value) -> AppResult<Self> {
        let mut fields = JsonFields::new(body)?;
        let input = Self {
            book: fields.take("book", "String"),
            quantity: fields.take("quantity", "Number"),
            due_date: fields.take("dueDate", "Date"),
        };
        fields.finish(input)
    }

    pub fn into_new_borrow(self) -> Result<NewBorrow, ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

        let book_id = match self.book.as_deref().map(Uuid::parse_str) {
            Some(Ok(id)) => Some(id),
            Some(Err(_)) => {
                let mut error = ValidationError::new("format");
                error.message = Some(Cow::Borrowed("Invalid book ID"));
                error.add_param(Cow::Borrowed("value"), &self.book);
                errors.add("book", error);
                None
            }
            None => {
                errors.add("book", missing("Book is required"));
                None
            }
        };
        if self.quantity.is_none() {
            errors.add("quantity", missing("Quantity is required"));
        }
        if self.due_date.is_none() {
            errors.add("dueDate", missing("Due date is required"));
        }

        match (book_id, self.quantity, self.due_date) {
            (Some(book_id), Some(quantity), Some(due_date)) if errors.is_empty() => Ok(NewBorrow {
                book_id,
                quantity,
                due_date,
            }),
            _ => Err(errors),
        }
    }
}

fn missing(message: &'static str) -> ValidationError {
    let mut error = ValidationError::new("required");
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Book reference shown in the borrow summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BorrowedBook {
    pub title: String,
    pub isbn: String,
}

/// Total borrowed quantity for one book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowSummary {
    pub book: BorrowedBook,
    pub total_quantity: i64,
}
