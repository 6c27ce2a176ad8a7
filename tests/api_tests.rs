//! Router tests against the in-memory store

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{api, config::AppConfig, repository::Repository, AppState};

fn create_test_router() -> Router {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "test-secret".to_string();
    config.auth.argon2_memory_kib = 1024;
    config.auth.argon2_iterations = 1;

    let state = AppState::new(config, Repository::in_memory()).expect("Failed to build state");
    api::router(state)
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Ok((status, json))
}

async fn register(router: &Router, email: &str, username: &str) -> Result<(StatusCode, Value)> {
    send(
        router,
        Method::POST,
        "/register",
        Some(json!({
            "name": "Test User",
            "email": email,
            "username": username,
            "password": "s3cret-pass"
        })),
    )
    .await
}

async fn create_book(router: &Router, title: &str) -> Result<Value> {
    let (status, body) = send(
        router,
        Method::POST,
        "/books",
        Some(json!({ "title": title, "author": "A", "publishedYear": "2020" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(body["data"].clone())
}

#[tokio::test]
async fn test_root_and_health() -> Result<()> {
    let router = create_test_router();

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&bytes[..], b"Server is running");

    let (status, body) = send(&router, Method::GET, "/ready", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");

    Ok(())
}

#[tokio::test]
async fn test_register_returns_user_without_hash() -> Result<()> {
    let router = create_test_router();

    let (status, body) = register(&router, "ada@example.com", "ada").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 200);
    assert_eq!(body["message"], "Register Successfully");
    assert_eq!(body["data"]["username"], "ada");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("passwordHash").is_none());

    Ok(())
}

#[tokio::test]
async fn test_register_validation_and_conflicts() -> Result<()> {
    let router = create_test_router();

    let (status, body) = send(
        &router,
        Method::POST,
        "/register",
        Some(json!({ "name": "No Password", "email": "np@example.com", "username": "np" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation Failed");
    assert_eq!(body["error"], "Missing credentials");

    register(&router, "ada@example.com", "ada").await?;

    let (status, body) = register(&router, "ada@example.com", "other").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["emailExists"], true);

    let (_, body) = register(&router, "other@example.com", "ada").await?;
    assert_eq!(body["usernameExists"], true);
    assert_eq!(body["message"], "Username already exist");

    let (_, body) = register(&router, "ada@example.com", "ada").await?;
    assert_eq!(body["exists"], true);

    Ok(())
}

#[tokio::test]
async fn test_login_flow_and_session() -> Result<()> {
    let router = create_test_router();
    register(&router, "ada@example.com", "ada").await?;

    for login_id in ["ada@example.com", "ada"] {
        let (status, body) = send(
            &router,
            Method::POST,
            "/login",
            Some(json!({ "loginId": login_id, "password": "s3cret-pass" })),
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Login Successfully");
        assert!(body.get("data").is_none());
        assert!(body["token"].is_string());
    }

    let (status, body) = send(
        &router,
        Method::POST,
        "/login",
        Some(json!({ "loginId": "ada", "password": "wrong" })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["pwExists"], false);

    let (status, body) = send(
        &router,
        Method::POST,
        "/login",
        Some(json!({ "loginId": "nobody@example.com", "password": "x" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email not found");
    assert_eq!(body["exists"], false);

    let (_, body) = send(
        &router,
        Method::POST,
        "/login",
        Some(json!({ "loginId": "ada", "password": "s3cret-pass" })),
    )
    .await?;
    let token = body["token"].as_str().unwrap_or_default().to_string();

    let request = Request::builder()
        .uri("/session")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())?;
    let response = router.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["data"]["username"], "ada");
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_eq!(body["data"]["authenticated"], true);

    let (status, _) = send(&router, Method::GET, "/session", None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_auth_routes_under_books_prefix() -> Result<()> {
    let router = create_test_router();

    let (status, _) = send(
        &router,
        Method::POST,
        "/books/register",
        Some(json!({ "name": "B", "email": "b@example.com", "username": "b", "password": "pw" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &router,
        Method::POST,
        "/books/login",
        Some(json!({ "loginId": "b", "password": "pw" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_book_crud() -> Result<()> {
    let router = create_test_router();

    let created = create_book(&router, "T").await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(created["publishedYear"], "2020");

    let (status, body) = send(&router, Method::GET, &format!("/books/{}", id), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Finallyyyyyy ! Got your Book");
    assert_eq!(body["data"]["title"], "T");

    let (status, body) = send(
        &router,
        Method::PUT,
        &format!("/books/{}", id),
        Some(json!({ "author": "X" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book update successfully");
    assert_eq!(body["data"]["author"], "X");
    assert_eq!(body["data"]["title"], "T");
    assert_eq!(body["data"]["publishedYear"], "2020");

    let (status, body) = send(&router, Method::DELETE, &format!("/books/{}", id), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book delete successfully");

    let (status, body) = send(&router, Method::DELETE, &format!("/books/{}", id), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Book not found");

    let (status, body) = send(&router, Method::GET, &format!("/books/{}", id), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());

    let (status, _) = send(&router, Method::GET, "/books/not-an-id", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_duplicate_title_and_search() -> Result<()> {
    let router = create_test_router();
    create_book(&router, "Dune").await?;

    let (status, body) = send(
        &router,
        Method::POST,
        "/books",
        Some(json!({ "title": "Dune", "author": "B", "publishedYear": "1999" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Book title already present,Give a different title");

    let (status, body) = send(&router, Method::POST, "/books/search", Some(json!({ "title": "Dune" }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Got the Book");
    assert_eq!(body["data"]["author"], "A");

    let (status, body) = send(&router, Method::POST, "/books/search", Some(json!({ "title": "dune" }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Book not found");

    Ok(())
}

#[tokio::test]
async fn test_pagination() -> Result<()> {
    let router = create_test_router();
    for i in 0..25 {
        create_book(&router, &format!("Book {:02}", i)).await?;
    }

    let (status, body) = send(&router, Method::GET, "/books/pagination?skip=0&limit=10", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalPage"], 3);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["totalCount"], 25);
    let data = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(data.len(), 10);
    assert_eq!(data[0]["title"], "Book 00");
    assert_eq!(data[9]["title"], "Book 09");

    let (_, body) = send(&router, Method::GET, "/books/pagination", None).await?;
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(10));

    let (_, body) = send(&router, Method::GET, "/books/pagination?skip=20&limit=abc", None).await?;
    assert_eq!(body["currentPage"], 3);
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(5));

    let (_, body) = send(&router, Method::GET, "/books", None).await?;
    assert_eq!(body["message"], "Finallyyyyyy ! Got your Books");
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(25));

    let (status, body) = send(
        &router,
        Method::GET,
        "/books/pagination?skip=0&limit=9223372036854775807",
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalPage"], 1);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(25));

    Ok(())
}

#[tokio::test]
async fn test_malformed_json_uses_envelope() -> Result<()> {
    let router = create_test_router();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;
    let response = router.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["status"], 400);

    Ok(())
}
