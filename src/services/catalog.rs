//! Catalog management service

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, ConflictKind, NotFoundKind},
    models::book::{Book, BookPage, CreateBookRequest, UpdateBookRequest},
    repository::BooksRepository,
};

use super::validation;

#[derive(Clone)]
pub struct CatalogService {
    books: Arc<dyn BooksRepository>,
}

fn parse_id(id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::BadRequest(format!("Invalid book id: {}", id)))
}

impl CatalogService {
    pub fn new(books: Arc<dyn BooksRepository>) -> Self {
        Self { books }
    }

    /// Create a book; titles must be unique
    pub async fn create_book(&self, request: CreateBookRequest) -> AppResult<Book> {
        let book = validation::validate_book(&request)?;

        if self.books.find_by_title(&book.title).await?.is_some() {
            return Err(AppError::Conflict(ConflictKind::Title));
        }

        let created = self.books.create(&book).await?;
        tracing::info!(book_id = %created.id, "Book created");
        Ok(created)
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.books.list().await
    }

    /// One page of books; `limit` must be positive
    pub async fn paginate(&self, skip: i64, limit: i64) -> AppResult<BookPage> {
        let (books, total_count) = tokio::try_join!(self.books.list_page(skip, limit), self.books.count())?;
        Ok(BookPage::new(books, total_count, skip, limit))
    }

    /// Get a book by id; `None` when no book has this id
    pub async fn get_book(&self, id: &str) -> AppResult<Option<Book>> {
        self.books.find_by_id(parse_id(id)?).await
    }

    /// Replace the provided fields. Content is not re-validated.
    pub async fn update_book(&self, id: &str, request: UpdateBookRequest) -> AppResult<Book> {
        let id = parse_id(id)?;
        let patch = validation::book_patch(&request)?;

        self.books
            .update(id, &patch)
            .await?
            .ok_or(AppError::NotFound(NotFoundKind::Book))
    }

    pub async fn delete_book(&self, id: &str) -> AppResult<()> {
        if !self.books.delete(parse_id(id)?).await? {
            return Err(AppError::NotFound(NotFoundKind::Book));
        }
        tracing::info!(book_id = %id, "Book deleted");
        Ok(())
    }

    /// Exact title lookup
    pub async fn find_by_title(&self, title: &str) -> AppResult<Book> {
        self.books
            .find_by_title(title)
            .await?
            .ok_or(AppError::NotFound(NotFoundKind::Book))
    }
}
