//! Catalog browsing endpoints: home page, books and authors

use axum::extract::{Path, State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{Author, AuthorDetail, Book, BookDetail},
    render::{render, Rendered},
    services::catalog::CatalogCounts,
    AppState,
};

pub const INDEX_TEMPLATE: &str = "index.html";
pub const BOOK_LIST_TEMPLATE: &str = "catalog/book_list.html";
pub const BOOK_DETAIL_TEMPLATE: &str = "catalog/book_detail.html";
pub const AUTHOR_LIST_TEMPLATE: &str = "catalog/author_list.html";
pub const AUTHOR_DETAIL_TEMPLATE: &str = "catalog/author_detail.html";

#[derive(Serialize, ToSchema)]
pub struct BookListContext {
    pub book_list: Vec<Book>,
}

#[derive(Serialize, ToSchema)]
pub struct BookDetailContext {
    pub book: BookDetail,
}

#[derive(Serialize, ToSchema)]
pub struct AuthorListContext {
    pub author_list: Vec<Author>,
}

#[derive(Serialize, ToSchema)]
pub struct AuthorDetailContext {
    pub author: AuthorDetail,
}

/// Home page with catalog totals
#[utoipa::path(
    get,
    path = "/catalog/",
    tag = "catalog",
    responses(
        (status = 200, description = "index.html context", body = CatalogCounts)
    )
)]
pub async fn index(State(state): State<AppState>) -> AppResult<Rendered<CatalogCounts>> {
    let counts = state.services.catalog.counts().await?;
    Ok(render(INDEX_TEMPLATE, counts))
}

/// List all books
#[utoipa::path(
    get,
    path = "/catalog/books/",
    tag = "catalog",
    responses(
        (status = 200, description = "catalog/book_list.html context", body = BookListContext)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Rendered<BookListContext>> {
    let book_list = state.services.catalog.list_books().await?;
    Ok(render(BOOK_LIST_TEMPLATE, BookListContext { book_list }))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/catalog/book/{id}",
    tag = "catalog",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "catalog/book_detail.html context", body = BookDetailContext),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Rendered<BookDetailContext>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(render(BOOK_DETAIL_TEMPLATE, BookDetailContext { book }))
}

/// List all authors
#[utoipa::path(
    get,
    path = "/catalog/authors/",
    tag = "catalog",
    responses(
        (status = 200, description = "catalog/author_list.html context", body = AuthorListContext)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Rendered<AuthorListContext>> {
    let author_list = state.services.catalog.list_authors().await?;
    Ok(render(AUTHOR_LIST_TEMPLATE, AuthorListContext { author_list }))
}

/// Get author details by ID
#[utoipa::path(
    get,
    path = "/catalog/author/{id}",
    tag = "catalog",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "catalog/author_detail.html context", body = AuthorDetailContext),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Rendered<AuthorDetailContext>> {
    let author = state.services.catalog.get_author(id).await?;
    Ok(render(AUTHOR_DETAIL_TEMPLATE, AuthorDetailContext { author }))
}
