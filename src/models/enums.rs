//! Shared domain enums

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Genre
// ---------------------------------------------------------------------------

/// Book genre classification.
///
/// Declaration order matches the `genre` Postgres enum so that sorting by
/// genre yields the same order in every storage backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "genre", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Genre {
    Fiction,
    NonFiction,
    Science,
    History,
    Biography,
    Fantasy,
}

impl Genre {
    pub const ALL: [Genre; 6] = [
        Genre::Fiction,
        Genre::NonFiction,
        Genre::Science,
        Genre::History,
        Genre::Biography,
        Genre::Fantasy,
    ];

    /// Wire code of the genre (e.g. `NON_FICTION`)
    pub fn code(self) -> &'static str {
        match self {
            Genre::Fiction => "FICTION",
            Genre::NonFiction => "NON_FICTION",
            Genre::Science => "SCIENCE",
            Genre::History => "HISTORY",
            Genre::Biography => "BIOGRAPHY",
            Genre::Fantasy => "FANTASY",
        }
    }

    /// All valid wire codes, in declaration order
    pub fn codes() -> Vec<&'static str> {
        Self::ALL.iter().map(|g| g.code()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown genre: {0}")]
pub struct UnknownGenre(pub String);

/// Exact, case-sensitive match on the wire code.
impl FromStr for Genre {
    type Err = UnknownGenre;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.code() == s)
            .ok_or_else(|| UnknownGenre(s.to_string()))
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
