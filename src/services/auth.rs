//! Registration and login service

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::{
    config::{AuthConfig, ValidationConfig},
    error::{AppError, AppResult, ConflictKind, NotFoundKind},
    models::{
        session::Session,
        user::{CreateUser, LoginLookup, LoginRequest, RegisterRequest, User, UserResponse},
    },
    repository::UsersRepository,
};

use super::validation;

/// A signed-in session and its bearer token
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session: Session,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UsersRepository>,
    config: AuthConfig,
    rules: ValidationConfig,
    argon2: Argon2<'static>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UsersRepository>,
        config: AuthConfig,
        rules: ValidationConfig,
    ) -> AppResult<Self> {
        let params = Params::new(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self {
            users,
            config,
            rules,
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Register a new user.
    ///
    /// Both uniqueness lookups run before deciding, so a request colliding
    /// on email and username reports both.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<UserResponse> {
        let new_user = validation::validate_user(&request, &self.rules)?;

        let (email_taken, username_taken) = tokio::try_join!(
            self.users.find_by_email(&new_user.email),
            self.users.find_by_username(&new_user.username),
        )?;

        match (email_taken.is_some(), username_taken.is_some()) {
            (true, true) => return Err(AppError::Conflict(ConflictKind::EmailAndUsername)),
            (true, false) => return Err(AppError::Conflict(ConflictKind::Email)),
            (false, true) => return Err(AppError::Conflict(ConflictKind::Username)),
            (false, false) => {}
        }

        let password_hash = self.hash_password(new_user.password).await?;

        let created = self
            .users
            .create(&CreateUser {
                name: new_user.name,
                email: new_user.email,
                username: new_user.username,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %created.id, "Register Successfully");

        Ok(UserResponse::from(created))
    }

    /// Authenticate by email or username and issue a session token
    pub async fn login(&self, request: LoginRequest) -> AppResult<IssuedSession> {
        let (login_id, password) = match (request.login_id, request.password) {
            (Some(login_id), Some(password)) if !login_id.is_empty() && !password.is_empty() => {
                (login_id, password)
            }
            _ => return Err(AppError::Validation("Missing credentials".to_string())),
        };

        let user = match LoginLookup::classify(&login_id) {
            LoginLookup::ByEmail(email) => self
                .users
                .find_by_email(email)
                .await?
                .ok_or(AppError::NotFound(NotFoundKind::Email))?,
            LoginLookup::ByUsername(username) => self
                .users
                .find_by_username(username)
                .await?
                .ok_or(AppError::NotFound(NotFoundKind::Username))?,
        };

        if !self.verify_password(&user, password).await? {
            tracing::debug!(user_id = %user.id, "Login rejected: password mismatch");
            return Err(AppError::IncorrectPassword);
        }

        let session = Session::for_user(&user, self.config.jwt_expiration_hours);
        let token = session
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!(user_id = %user.id, "Login Successfully");

        Ok(IssuedSession { token, session })
    }

    /// Decode a bearer token issued by [`AuthService::login`]
    pub fn verify_session(&self, token: &str) -> AppResult<Session> {
        let session = Session::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        if !session.authenticated {
            return Err(AppError::Authentication("Session is not authenticated".to_string()));
        }
        Ok(session)
    }

    /// Hash a password using Argon2
    async fn hash_password(&self, password: String) -> AppResult<String> {
        let argon2 = self.argon2.clone();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
        })
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
    }

    /// Verify user password
    async fn verify_password(&self, user: &User, password: String) -> AppResult<bool> {
        let argon2 = self.argon2.clone();
        let hash = user.password_hash.clone();
        tokio::task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&hash)
                .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
            Ok(argon2
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok())
        })
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
    }
}
