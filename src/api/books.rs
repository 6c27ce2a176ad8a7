//! Book (catalog) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBookRequest, PaginationQuery, SearchBookRequest, UpdateBookRequest},
    AppState,
};

use super::{response::ApiResponse, AppJson};

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBookRequest,
    responses(
        (status = 200, description = "Book created successfully"),
        (status = 400, description = "Validation Failed, or title already present"),
        (status = 500, description = "Database error")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateBookRequest>,
) -> AppResult<ApiResponse<Book>> {
    let book = state.services.catalog.create_book(request).await?;
    Ok(ApiResponse::ok("Book created successfully").with_data(book))
}

/// List every book
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books in insertion order"),
        (status = 500, description = "Database error")
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<Book>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(ApiResponse::ok("Finallyyyyyy ! Got your Books").with_data(books))
}

/// List books with offset pagination
#[utoipa::path(
    get,
    path = "/books/pagination",
    tag = "books",
    params(PaginationQuery),
    responses(
        (status = 200, description = "One page with `totalPage`, `currentPage` and `totalCount`"),
        (status = 500, description = "Database error")
    )
)]
pub async fn paginate_books(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> AppResult<ApiResponse<Vec<Book>>> {
    let (skip, limit) = query.resolve();
    let page = state.services.catalog.paginate(skip, limit).await?;

    let mut response = ApiResponse::bare(StatusCode::OK).with_data(page.books);
    response.total_page = Some(page.total_page);
    response.current_page = Some(page.current_page);
    response.total_count = Some(page.total_count);
    Ok(response)
}

/// Get a book by ID; `data` is null when absent
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Got your Book"),
        (status = 400, description = "Invalid book id")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Option<Book>>> {
    let book = state.services.catalog.get_book(&id).await?;
    Ok(ApiResponse::ok("Finallyyyyyy ! Got your Book").with_data(book))
}

/// Update some fields of a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Book update successfully"),
        (status = 400, description = "Book not found or invalid id")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateBookRequest>,
) -> AppResult<ApiResponse<Book>> {
    let book = state.services.catalog.update_book(&id, request).await?;
    Ok(ApiResponse::ok("Book update successfully").with_data(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book delete successfully"),
        (status = 400, description = "Book not found or invalid id")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.services.catalog.delete_book(&id).await?;
    Ok(ApiResponse::ok("Book delete successfully"))
}

/// Find a book by exact title
#[utoipa::path(
    post,
    path = "/books/search",
    tag = "books",
    request_body = SearchBookRequest,
    responses(
        (status = 200, description = "Got the Book"),
        (status = 400, description = "Book not found")
    )
)]
pub async fn search_book(
    State(state): State<AppState>,
    AppJson(request): AppJson<SearchBookRequest>,
) -> AppResult<ApiResponse<Book>> {
    let title = request
        .title
        .ok_or_else(|| AppError::Validation("Missing Credential".to_string()))?;

    let book = state.services.catalog.find_by_title(&title).await?;
    Ok(ApiResponse::ok("Got the Book").with_data(book))
}
