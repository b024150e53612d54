//! Book model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::borrow::Cow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::{enums::Genre, payload::JsonFields};
use crate::error::AppResult;

/// Stored book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub isbn: String,
    pub description: Option<String>,
    /// Copies currently on the shelf
    pub copies: i32,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated book content, the only shape storage accepts for writes
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub isbn: String,
    pub description: Option<String>,
    pub copies: i32,
    pub available: bool,
}

/// Create book request.
///
/// Every field is optional at the wire level so that missing or invalid
/// values are reported per field instead of as a body parse failure.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: Option<String>,
    /// One of the genre codes (e.g. `FICTION`)
    pub genre: Option<String>,
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    pub isbn: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Copies must be a non-negative number"))]
    pub copies: Option<i32>,
    /// Defaults to true
    pub available: Option<bool>,
}

/// Update book request (partial)
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub isbn: Option<String>,
    /// `null` clears the description
    #[serde(default, deserialize_with = "serde_with::rust::double_option::deserialize")]
    #[schema(value_type = Option<String>, nullable)]
    pub description: Option<Option<String>>,
    pub copies: Option<i32>,
    pub available: Option<bool>,
}

impl BookPatch {
    /// Decode a request body, reporting wrong-typed fields per field.
    pub fn from_json(body: Value) -> AppResult<Self> {
        let mut fields = JsonFields::new(body)?;
        let patch = Self {
            title: fields.take("title", "String"),
            author: fields.take("author", "String"),
            genre: fields.take("genre", "String"),
            isbn: fields.take("isbn", "String"),
            description: fields.take_nullable("description", "String"),
            copies: fields.take("copies", "Number"),
            available: fields.take("available", "Boolean"),
        };
        fields.finish(patch)
    }
}

impl BookInput {
    /// Decode a request body, reporting wrong-typed fields per field.
    pub fn from_json(body: Value) -> AppResult<Self> {
        let mut fields = JsonFields::new(body)?;
        let input = Self {
            title: fields.take("title", "String"),
            author: fields.take("author", "String"),
            genre: fields.take("genre", "String"),
            isbn: fields.take("isbn", "String"),
            description: fields.take("description", "String"),
            copies: fields.take("copies", "Number"),
            available: fields.take("available", "Boolean"),
        };
        fields.finish(input)
    }

    /// Validate the payload and turn it into a writable book.
    pub fn into_new_book(self) -> Result<NewBook, ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

        let title = required(self.title, "title", "Title is required", &mut errors);
        let author = required(self.author, "author", "Author is required", &mut errors);
        let isbn = required(self.isbn, "isbn", "ISBN is required", &mut errors);
        let copies = required(self.copies, "copies", "Copies is required", &mut errors);
        let genre = required(self.genre, "genre", "Genre is required", &mut errors)
            .and_then(|code| match code.parse::<Genre>() {
                Ok(genre) => Some(genre),
                Err(_) => {
                    errors.add("genre", invalid_genre(&code));
                    None
                }
            });

        match (title, author, genre, isbn, copies) {
            (Some(title), Some(author), Some(genre), Some(isbn), Some(copies)) if errors.is_empty() => {
                Ok(NewBook {
                    title,
                    author,
                    genre,
                    isbn,
                    description: self.description,
                    copies,
                    available: self.available.unwrap_or(true),
                })
            }
            _ => Err(errors),
        }
    }

    /// Overlay the fields present in `patch`.
    pub fn merge(self, patch: BookPatch) -> Self {
        Self {
            title: patch.title.or(self.title),
            author: patch.author.or(self.author),
            genre: patch.genre.or(self.genre),
            isbn: patch.isbn.or(self.isbn),
            description: match patch.description {
                Some(description) => description,
                None => self.description,
            },
            copies: patch.copies.or(self.copies),
            available: patch.available.or(self.available),
        }
    }
}

impl From<&Book> for BookInput {
    fn from(book: &Book) -> Self {
        Self {
            title: Some(book.title.clone()),
            author: Some(book.author.clone()),
            genre: Some(book.genre.code().to_string()),
            isbn: Some(book.isbn.clone()),
            description: book.description.clone(),
            copies: Some(book.copies),
            available: Some(book.available),
        }
    }
}

fn required<T>(value: Option<T>, field: &'static str, message: &'static str, errors: &mut ValidationErrors) -> Option<T> {
    if value.is_none() {
        let mut error = ValidationError::new("required");
        error.message = Some(Cow::Borrowed(message));
        errors.add(field, error);
    }
    value
}

fn invalid_genre(code: &str) -> ValidationError {
    let mut error = ValidationError::new("enum");
    error.message = Some(Cow::Owned(format!("`{}` is not a valid genre", code)));
    error.add_param(Cow::Borrowed("value"), &code);
    error
}
