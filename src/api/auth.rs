//! Registration, login and session endpoints

use axum::extract::State;

use crate::{
    error::AppResult,
    models::{
        session::Session,
        user::{LoginRequest, RegisterRequest, UserResponse},
    },
    AppState,
};

use super::{response::ApiResponse, AppJson, AuthenticatedSession};

/// Register a new user
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Register Successfully; `data` holds the user without password hash"),
        (status = 400, description = "Validation Failed, or email/username already exist"),
        (status = 500, description = "Database error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.services.auth.register(request).await?;
    Ok(ApiResponse::ok("Register Successfully").with_data(user))
}

/// Login with email or username
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login Successfully; `token` holds the session bearer token"),
        (status = 400, description = "Email or username not found"),
        (status = 401, description = "Password incorrect"),
        (status = 500, description = "Database error")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> AppResult<ApiResponse<()>> {
    let issued = state.services.auth.login(request).await?;
    Ok(ApiResponse::ok("Login Successfully").with_token(issued.token))
}

/// Current session
#[utoipa::path(
    get,
    path = "/session",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session active; `data` holds the session descriptor"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn session(AuthenticatedSession(session): AuthenticatedSession) -> ApiResponse<Session> {
    ApiResponse::ok("Session active").with_data(session)
}
