//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod instances;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Author, AuthorDetail, Book, BookDetail, BookInstance, LoanStatus},
};

/// Everything the request handlers need from persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn count_books(&self) -> AppResult<i64>;

    async fn count_authors(&self) -> AppResult<i64>;

    /// All copies, or only those in `status`
    async fn count_instances(&self, status: Option<LoanStatus>) -> AppResult<i64>;

    async fn list_books(&self) -> AppResult<Vec<Book>>;

    async fn get_book(&self, id: i32) -> AppResult<BookDetail>;

    async fn list_authors(&self) -> AppResult<Vec<Author>>;

    async fn get_author(&self, id: i32) -> AppResult<AuthorDetail>;

    /// Copies on loan, to one borrower when given
    async fn count_on_loan(&self, borrower_id: Option<i32>) -> AppResult<i64>;

    /// One slice of the on-loan copies, soonest due first
    async fn list_on_loan(
        &self,
        borrower_id: Option<i32>,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<BookInstance>>;

    async fn get_instance(&self, id: Uuid) -> AppResult<BookInstance>;

    async fn update_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance>;

    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub authors: authors::AuthorsRepository,
    pub instances: instances::InstancesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            authors: authors::AuthorsRepository::new(pool.clone()),
            instances: instances::InstancesRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl CatalogStore for Repository {
    async fn count_books(&self) -> AppResult<i64> {
        self.books.count().await
    }

    async fn count_authors(&self) -> AppResult<i64> {
        self.authors.count().await
    }

    async fn count_instances(&self, status: Option<LoanStatus>) -> AppResult<i64> {
        self.instances.count(status).await
    }

    async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.books.list().await
    }

    async fn get_book(&self, id: i32) -> AppResult<BookDetail> {
        let book = self.books.get_by_id(id).await?;
        let genres = self.books.genres(id).await?;
        let instances = self.instances.for_book(id).await?;
        Ok(BookDetail {
            book,
            genres,
            instances,
        })
    }

    async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.authors.list().await
    }

    async fn get_author(&self, id: i32) -> AppResult<AuthorDetail> {
        let author = self.authors.get_by_id(id).await?;
        let books = self.books.by_author(id).await?;
        Ok(AuthorDetail { author, books })
    }

    async fn count_on_loan(&self, borrower_id: Option<i32>) -> AppResult<i64> {
        self.instances.count_on_loan(borrower_id).await
    }

    async fn list_on_loan(
        &self,
        borrower_id: Option<i32>,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<BookInstance>> {
        self.instances.list_on_loan(borrower_id, offset, limit).await
    }

    async fn get_instance(&self, id: Uuid) -> AppResult<BookInstance> {
        self.instances.get_by_id(id).await
    }

    async fn update_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance> {
        self.instances.update_due_back(id, due_back).await
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
