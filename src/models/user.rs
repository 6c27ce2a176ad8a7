//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidateEmail};

/// Stored user record.
///
/// Deliberately not `Serialize`: responses go through [`UserResponse`],
/// which has no password hash field.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User as returned to API clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            username: user.username,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Registration request body.
///
/// Fields are kept as raw JSON so the validator can tell a missing field
/// from one of the wrong type.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub email: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub username: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub password: Option<Value>,
}

/// Registration input after presence and type checks
#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    pub name: String,
    #[validate(email(message = "Email format is incorrect"))]
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Row to insert; the password is already hashed
#[derive(Debug, Clone, PartialEq)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Login request body
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address or username
    pub login_id: Option<String>,
    pub password: Option<String>,
}

/// How a login identifier is looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginLookup<'a> {
    ByEmail(&'a str),
    ByUsername(&'a str),
}

impl<'a> LoginLookup<'a> {
    /// Anything with valid email syntax is treated as an email.
    pub fn classify(login_id: &'a str) -> Self {
        if login_id.validate_email() {
            LoginLookup::ByEmail(login_id)
        } else {
            LoginLookup::ByUsername(login_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_email_and_username() {
        assert_eq!(
            LoginLookup::classify("reader@example.com"),
            LoginLookup::ByEmail("reader@example.com")
        );
        assert_eq!(LoginLookup::classify("reader"), LoginLookup::ByUsername("reader"));
        assert_eq!(LoginLookup::classify("reader@"), LoginLookup::ByUsername("reader@"));
        assert_eq!(LoginLookup::classify(""), LoginLookup::ByUsername(""));
    }

    #[test]
    fn response_never_carries_the_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.keys().all(|k| !k.to_lowercase().contains("password")));
        assert_eq!(json["username"], "ada");
        assert!(json.get("createdAt").is_some());
    }
}
