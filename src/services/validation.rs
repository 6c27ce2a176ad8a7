//! Payload validation for registration and book writes.
//!
//! Pure functions: no I/O. Uniqueness is checked by the services.

use serde_json::Value;
use validator::Validate;

use crate::{
    config::ValidationConfig,
    error::{AppError, AppResult},
    models::{
        book::{BookPatch, CreateBookRequest, NewBook, UpdateBookRequest},
        user::{NewUser, RegisterRequest},
    },
};

/// Missing, `null`, `""`, `0` and `false` all count as absent.
fn is_present(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn require_string(value: Option<&Value>, message: &str) -> AppResult<String> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(AppError::Validation(message.to_string())),
    }
}

/// String form of a scalar, as the store would cast it
fn stored_string(field: &str, value: &Value) -> AppResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(AppError::Validation(format!(
            "{} cannot be stored as a string",
            field
        ))),
    }
}

/// Check a registration payload
pub fn validate_user(request: &RegisterRequest, rules: &ValidationConfig) -> AppResult<NewUser> {
    let fields = [&request.name, &request.email, &request.username, &request.password];
    if !fields.iter().all(|f| is_present(f)) {
        return Err(AppError::Validation("Missing credentials".to_string()));
    }

    let user = NewUser {
        name: require_string(request.name.as_ref(), "Name is not a String")?,
        email: require_string(request.email.as_ref(), "Email is not a String")?,
        username: require_string(request.username.as_ref(), "Username is not a String")?,
        password: require_string(request.password.as_ref(), "Password is not a String")?,
    };

    user.validate().map_err(|e| {
        let reason = e
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .filter_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| e.to_string());
        AppError::Validation(reason)
    })?;

    if let Some(min) = rules.username_min_length {
        if user.username.chars().count() < min {
            return Err(AppError::Validation(format!(
                "Username must be at least {} characters",
                min
            )));
        }
    }
    if let Some(min) = rules.password_min_length {
        if user.password.chars().count() < min {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                min
            )));
        }
    }

    Ok(user)
}

/// Check a create-book payload.
///
/// `publishedYear` is only checked for presence; a scalar value is kept in
/// its string form.
pub fn validate_book(request: &CreateBookRequest) -> AppResult<NewBook> {
    if !is_present(&request.title) || !is_present(&request.author) || !is_present(&request.published_year) {
        return Err(AppError::Validation("Missing Credential".to_string()));
    }

    let title = require_string(request.title.as_ref(), "Title is not a String")?;
    let author = require_string(request.author.as_ref(), "Author's name is not a String")?;

    let published_year = match request.published_year {
        Some(ref value) => stored_string("publishedYear", value)?,
        None => return Err(AppError::Validation("Missing Credential".to_string())),
    };

    Ok(NewBook {
        title,
        author,
        published_year,
    })
}

/// Convert an update payload into a patch; no content rules apply.
///
/// `null` leaves the field untouched.
pub fn book_patch(request: &UpdateBookRequest) -> AppResult<BookPatch> {
    let field = |name: &str, value: &Option<Value>| -> AppResult<Option<String>> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(v) => stored_string(name, v).map(Some),
        }
    };

    Ok(BookPatch {
        title: field("title", &request.title)?,
        author: field("author", &request.author)?,
        published_year: field("publishedYear", &request.published_year)?,
    })
}
