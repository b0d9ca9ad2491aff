//! Catalog browsing service

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{Author, AuthorDetail, Book, BookDetail, LoanStatus},
    repository::CatalogStore,
};

/// Headline numbers for the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogCounts {
    pub num_books: i64,
    pub num_instances: i64,
    /// Copies with status `a`
    pub num_instances_available: i64,
    pub num_authors: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        Ok(CatalogCounts {
            num_books: self.store.count_books().await?,
            num_instances: self.store.count_instances(None).await?,
            num_instances_available: self
                .store
                .count_instances(Some(LoanStatus::Available))
                .await?,
            num_authors: self.store.count_authors().await?,
        })
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.store.list_books().await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<BookDetail> {
        self.store.get_book(id).await
    }

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.store.list_authors().await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetail> {
        self.store.get_author(id).await
    }

    /// Check the store is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
