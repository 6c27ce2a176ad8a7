//! Books repository (catalog store)

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::book::{Book, BookPatch, NewBook},
};

use super::map_unique_violation;

/// Catalog store port.
///
/// Listing order is insertion order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BooksRepository: Send + Sync {
    /// Insert a book. A duplicate title yields
    /// [`AppError::Conflict`](crate::error::AppError::Conflict).
    async fn create(&self, book: &NewBook) -> AppResult<Book>;

    async fn list(&self) -> AppResult<Vec<Book>>;

    async fn list_page(&self, skip: i64, limit: i64) -> AppResult<Vec<Book>>;

    async fn count(&self) -> AppResult<i64>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;

    /// Exact, case-sensitive title match
    async fn find_by_title(&self, title: &str) -> AppResult<Option<Book>>;

    /// Overwrite the patched fields; `None` if no book has this id
    async fn update(&self, id: Uuid, patch: &BookPatch) -> AppResult<Option<Book>>;

    /// Returns whether a book was removed
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

const BOOK_COLUMNS: &str = "id, title, author, published_year, created_at, updated_at";

#[derive(Clone)]
pub struct PgBooksRepository {
    pool: Pool<Postgres>,
}

impl PgBooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BooksRepository for PgBooksRepository {
    async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (id, title, author, published_year)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.published_year)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(created)
    }

    async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY seq",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn list_page(&self, skip: i64, limit: i64) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY seq LIMIT $1 OFFSET $2",
            BOOK_COLUMNS
        ))
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn count(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn find_by_title(&self, title: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE title = $1 ORDER BY seq LIMIT 1",
            BOOK_COLUMNS
        ))
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn update(&self, id: Uuid, patch: &BookPatch) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                published_year = COALESCE($4, published_year),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.author)
        .bind(&patch.published_year)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(book)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
