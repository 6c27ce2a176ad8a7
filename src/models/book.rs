//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Book record from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    /// Kept as text, e.g. "2020"
    pub published_year: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create book request body (raw JSON values, checked by the validator)
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    #[schema(value_type = Option<String>)]
    pub title: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub author: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub published_year: Option<Value>,
}

/// Book input after validation
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub published_year: String,
}

/// Partial update request body; only provided fields are replaced
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    #[schema(value_type = Option<String>)]
    pub title: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub author: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub published_year: Option<Value>,
}

/// Fields to overwrite on an existing book
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_year: Option<String>,
}

impl BookPatch {
    pub fn apply(&self, book: &mut Book) {
        if let Some(ref title) = self.title {
            book.title = title.clone();
        }
        if let Some(ref author) = self.author {
            book.author = author.clone();
        }
        if let Some(ref published_year) = self.published_year {
            book.published_year = published_year.clone();
        }
    }
}

/// Exact-title search body
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SearchBookRequest {
    pub title: Option<String>,
}

/// Pagination query parameters.
///
/// Kept as strings: unparsable, zero or negative values fall back to the
/// defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Offset (default: 0)
    pub skip: Option<String>,
    /// Page size (default: 10)
    pub limit: Option<String>,
}

pub const DEFAULT_PAGE_LIMIT: i64 = 10;

impl PaginationQuery {
    /// Resolve to `(skip, limit)`
    pub fn resolve(&self) -> (i64, i64) {
        let parse = |v: &Option<String>| v.as_deref().and_then(|s| s.trim().parse::<i64>().ok());

        let skip = parse(&self.skip).unwrap_or(0).max(0);
        let limit = match parse(&self.limit) {
            Some(limit) if limit > 0 => limit,
            _ => DEFAULT_PAGE_LIMIT,
        };
        (skip, limit)
    }
}

/// One page of books with its position in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct BookPage {
    pub books: Vec<Book>,
    pub total_count: i64,
    pub total_page: i64,
    pub current_page: i64,
}

impl BookPage {
    pub fn new(books: Vec<Book>, total_count: i64, skip: i64, limit: i64) -> Self {
        Self {
            books,
            total_count,
            total_page: total_count / limit + i64::from(total_count % limit != 0),
            current_page: skip / limit + 1,
        }
    }
}
