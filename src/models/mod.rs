//! Data models for Bookshelf

pub mod book;
pub mod session;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookPage, BookPatch, NewBook};
pub use session::Session;
pub use user::{CreateUser, LoginLookup, NewUser, User, UserResponse};
