//! Business logic services

pub mod auth;
pub mod catalog;
pub mod validation;

use crate::{
    config::{AuthConfig, ValidationConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        validation_config: ValidationConfig,
    ) -> AppResult<Self> {
        Ok(Self {
            auth: auth::AuthService::new(repository.users.clone(), auth_config, validation_config)?,
            catalog: catalog::CatalogService::new(repository.books.clone()),
            repository,
        })
    }
}
