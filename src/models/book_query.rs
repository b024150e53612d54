//! List query parameters and their validated form

use serde::Deserialize;

use super::enums::Genre;
use crate::error::{AppError, AppResult};

pub const DEFAULT_SORT_BY: &str = "createdAt";
pub const DEFAULT_LIMIT: &str = "10";
pub const DEFAULT_PAGE: &str = "1";

/// Raw query string of `GET /api/books`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBooksParams {
    pub filter: Option<String>,
    pub sort_by: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

/// Fields a book list may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Title,
    Author,
    Genre,
    Isbn,
    Copies,
    Available,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        SortField::CreatedAt,
        SortField::UpdatedAt,
        SortField::Title,
        SortField::Author,
        SortField::Genre,
        SortField::Isbn,
        SortField::Copies,
        SortField::Available,
    ];

    /// Name accepted in the `sortBy` parameter
    pub fn param_name(self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::Title => "title",
            SortField::Author => "author",
            SortField::Genre => "genre",
            SortField::Isbn => "isbn",
            SortField::Copies => "copies",
            SortField::Available => "available",
        }
    }

    /// Column in the `books` table
    pub fn column(self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Title => "title",
            SortField::Author => "author",
            SortField::Genre => "genre",
            SortField::Isbn => "isbn",
            SortField::Copies => "copies",
            SortField::Available => "available",
        }
    }

    pub fn from_param(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.param_name() == name)
    }

    pub fn param_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|f| f.param_name()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Only the exact string `asc` sorts ascending.
    pub fn from_param(value: &str) -> Self {
        if value == "asc" {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    /// `(page - 1) * limit`
    pub offset: i64,
}

/// Validated list query, built once per request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookQuery {
    pub genre: Option<Genre>,
    pub sort_by: SortField,
    pub direction: SortDirection,
    pub pagination: Pagination,
}

impl BookQuery {
    pub fn from_params(params: &ListBooksParams) -> AppResult<Self> {
        let genre = match params.filter.as_deref() {
            None | Some("") => None,
            Some(filter) => {
                let code = filter.to_uppercase();
                Some(code.parse::<Genre>().map_err(|_| AppError::InvalidFilter(filter.to_string()))?)
            }
        };

        let raw_limit = params.limit.as_deref().unwrap_or(DEFAULT_LIMIT);
        let raw_page = params.page.as_deref().unwrap_or(DEFAULT_PAGE);
        let pagination = parse_pagination(raw_limit, raw_page).ok_or_else(|| AppError::InvalidPagination {
            limit: raw_limit.to_string(),
            page: raw_page.to_string(),
        })?;

        let sort_by_name = params.sort_by.as_deref().unwrap_or(DEFAULT_SORT_BY);
        let sort_by = SortField::from_param(sort_by_name)
            .ok_or_else(|| AppError::InvalidSortField(sort_by_name.to_string()))?;

        let direction = SortDirection::from_param(params.sort.as_deref().unwrap_or("desc"));

        Ok(Self {
            genre,
            sort_by,
            direction,
            pagination,
        })
    }
}

fn parse_pagination(raw_limit: &str, raw_page: &str) -> Option<Pagination> {
    let limit = raw_limit.trim().parse::<i64>().ok().filter(|n| *n >= 1)?;
    let page = raw_page.trim().parse::<i64>().ok().filter(|n| *n >= 1)?;
    let offset = (page - 1).checked_mul(limit)?;
    Some(Pagination { page, limit, offset })
}
