//! Repository layer for store operations

pub mod books;
pub mod memory;
pub mod users;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::error::{AppError, AppResult, ConflictKind};

pub use books::{BooksRepository, PgBooksRepository};
pub use memory::{InMemoryBooksRepository, InMemoryUsersRepository};
pub use users::{PgUsersRepository, UsersRepository};

/// Main repository struct holding the store adapters
#[derive(Clone)]
pub struct Repository {
    pub users: Arc<dyn UsersRepository>,
    pub books: Arc<dyn BooksRepository>,
    pool: Option<Pool<Postgres>>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(PgUsersRepository::new(pool.clone())),
            books: Arc::new(PgBooksRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Repository backed by process memory; contents are lost on exit
    pub fn in_memory() -> Self {
        Self::from_parts(
            Arc::new(InMemoryUsersRepository::new()),
            Arc::new(InMemoryBooksRepository::new()),
        )
    }

    pub fn from_parts(users: Arc<dyn UsersRepository>, books: Arc<dyn BooksRepository>) -> Self {
        Self {
            users,
            books,
            pool: None,
        }
    }

    /// Check the store is reachable
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(ref pool) = self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}

/// Translate a unique-index violation into the matching conflict
pub(crate) fn map_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            let kind = match db_err.constraint() {
                Some("users_email_key") => Some(ConflictKind::Email),
                Some("users_username_key") => Some(ConflictKind::Username),
                Some("books_title_key") => Some(ConflictKind::Title),
                _ => None,
            };
            if let Some(kind) = kind {
                tracing::warn!("Unique constraint rejected write: {:?}", kind);
                return AppError::Conflict(kind);
            }
        }
    }
    AppError::Database(err)
}

#[cfg(test)]
mod tests {
    use std::{error::Error as StdError, fmt};

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug)]
    struct ConstraintError {
        constraint: &'static str,
        unique: bool,
    }

    impl fmt::Display for ConstraintError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "violates constraint {}", self.constraint)
        }
    }

    impl StdError for ConstraintError {}

    impl DatabaseError for ConstraintError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            Some(self.constraint)
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::ForeignKeyViolation
            }
        }
    }

    fn db_error(constraint: &'static str, unique: bool) -> sqlx::Error {
        sqlx::Error::Database(Box::new(ConstraintError { constraint, unique }))
    }

    #[test]
    fn unique_violations_map_to_conflicts() {
        let cases = [
            ("users_email_key", ConflictKind::Email),
            ("users_username_key", ConflictKind::Username),
            ("books_title_key", ConflictKind::Title),
        ];
        for (constraint, expected) in cases {
            match map_unique_violation(db_error(constraint, true)) {
                AppError::Conflict(kind) => assert_eq!(kind, expected),
                other => panic!("expected conflict for {constraint}, got {other:?}"),
            }
        }
    }

    #[test]
    fn other_store_errors_pass_through() {
        let unknown = map_unique_violation(db_error("some_other_key", true));
        assert!(matches!(unknown, AppError::Database(_)));

        let not_unique = map_unique_violation(db_error("books_title_key", false));
        assert!(matches!(not_unique, AppError::Database(_)));

        assert!(matches!(map_unique_violation(sqlx::Error::RowNotFound), AppError::Database(_)));
    }
}
