//! Bookshelf server
//!
//! A REST JSON API for a book catalog with user registration and
//! email-or-username login.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(config: AppConfig, repository: repository::Repository) -> AppResult<Self> {
        let services = services::Services::new(
            repository,
            config.auth.clone(),
            config.validation.clone(),
        )?;

        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }
}
