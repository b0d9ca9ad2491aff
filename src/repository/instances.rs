//! Book instances repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    forms::renewal::today,
    models::{book_instance::BookInstanceRow, BookInstance, LoanStatus},
};

const SELECT_INSTANCE: &str = r#"
    SELECT bi.id, bi.book_id, b.title AS book_title, bi.imprint,
           bi.due_back, bi.status, bi.borrower_id
    FROM catalog_bookinstance bi
    JOIN catalog_book b ON b.id = bi.book_id
"#;

#[derive(Clone)]
pub struct InstancesRepository {
    pool: Pool<Postgres>,
}

impl InstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn finish(rows: Vec<BookInstanceRow>) -> Vec<BookInstance> {
        let today = today();
        rows.into_iter().map(|row| row.into_instance(today)).collect()
    }

    /// Count copies, optionally only those in one status
    pub async fn count(&self, status: Option<LoanStatus>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM catalog_bookinstance WHERE ($1::VARCHAR IS NULL OR status = $1)",
        )
        .bind(status.map(LoanStatus::code))
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Copies of one book, soonest due first
    pub async fn for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstanceRow>(&format!(
            "{SELECT_INSTANCE} WHERE bi.book_id = $1 ORDER BY bi.due_back, bi.id"
        ))
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(Self::finish(rows))
    }

    pub async fn count_on_loan(&self, borrower_id: Option<i32>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM catalog_bookinstance
            WHERE status = $1 AND ($2::INT IS NULL OR borrower_id = $2)
            "#,
        )
        .bind(LoanStatus::OnLoan.code())
        .bind(borrower_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// On-loan copies ordered by due date, one page at a time
    pub async fn list_on_loan(
        &self,
        borrower_id: Option<i32>,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstanceRow>(&format!(
            r#"{SELECT_INSTANCE}
            WHERE bi.status = $1 AND ($2::INT IS NULL OR bi.borrower_id = $2)
            ORDER BY bi.due_back ASC, bi.id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(LoanStatus::OnLoan.code())
        .bind(borrower_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(Self::finish(rows))
    }

    /// Get book instance by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstanceRow>(&format!("{SELECT_INSTANCE} WHERE bi.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| row.into_instance(today()))
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Overwrite the due date of a single copy
    pub async fn update_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance> {
        let result = sqlx::query("UPDATE catalog_bookinstance SET due_back = $1 WHERE id = $2")
            .bind(due_back)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }

        self.get_by_id(id).await
    }
}
