//! In-memory store adapters.
//!
//! Used by the `memory` store backend and by tests. Uniqueness is checked
//! and the record inserted under a single write lock, so concurrent
//! requests cannot both claim the same email, username or title.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, ConflictKind},
    models::{
        book::{Book, BookPatch, NewBook},
        user::{CreateUser, User},
    },
};

use super::{books::BooksRepository, users::UsersRepository};

#[derive(Clone, Default)]
pub struct InMemoryUsersRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUsersRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsersRepository for InMemoryUsersRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, user: &CreateUser) -> AppResult<User> {
        let mut users = self.users.write().await;

        let email_taken = users.iter().any(|u| u.email == user.email);
        let username_taken = users.iter().any(|u| u.username == user.username);
        match (email_taken, username_taken) {
            (true, true) => return Err(AppError::Conflict(ConflictKind::EmailAndUsername)),
            (true, false) => return Err(AppError::Conflict(ConflictKind::Email)),
            (false, true) => return Err(AppError::Conflict(ConflictKind::Username)),
            (false, false) => {}
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());

        Ok(created)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryBooksRepository {
    books: Arc<RwLock<Vec<Book>>>,
}

impl InMemoryBooksRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BooksRepository for InMemoryBooksRepository {
    async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let mut books = self.books.write().await;

        if books.iter().any(|b| b.title == book.title) {
            return Err(AppError::Conflict(ConflictKind::Title));
        }

        let now = Utc::now();
        let created = Book {
            id: Uuid::new_v4(),
            title: book.title.clone(),
            author: book.author.clone(),
            published_year: book.published_year.clone(),
            created_at: now,
            updated_at: now,
        };
        books.push(created.clone());

        Ok(created)
    }

    async fn list(&self) -> AppResult<Vec<Book>> {
        Ok(self.books.read().await.clone())
    }

    async fn list_page(&self, skip: i64, limit: i64) -> AppResult<Vec<Book>> {
        let skip = usize::try_from(skip).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);

        let books = self.books.read().await;
        Ok(books.iter().skip(skip).take(limit).cloned().collect())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.books.read().await.len() as i64)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let books = self.books.read().await;
        Ok(books.iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> AppResult<Option<Book>> {
        let books = self.books.read().await;
        Ok(books.iter().find(|b| b.title == title).cloned())
    }

    async fn update(&self, id: Uuid, patch: &BookPatch) -> AppResult<Option<Book>> {
        let mut books = self.books.write().await;

        if let Some(ref title) = patch.title {
            if books.iter().any(|b| b.id != id && &b.title == title) {
                return Err(AppError::Conflict(ConflictKind::Title));
            }
        }

        let Some(book) = books.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        patch.apply(book);
        book.updated_at = Utc::now();

        Ok(Some(book.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|b| b.id != id);
        Ok(books.len() < before)
    }
}
