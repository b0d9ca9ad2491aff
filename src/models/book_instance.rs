//! Book instance (physical loanable copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Loan status of a copy, stored and serialized as a single character code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LoanStatus {
    #[default]
    #[serde(rename = "m")]
    Maintenance,
    #[serde(rename = "o")]
    OnLoan,
    #[serde(rename = "a")]
    Available,
    #[serde(rename = "r")]
    Reserved,
}

impl LoanStatus {
    /// Storage code (`m`, `o`, `a`, `r`)
    pub fn code(self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }
}

impl From<&str> for LoanStatus {
    fn from(code: &str) -> Self {
        match code {
            "o" => LoanStatus::OnLoan,
            "a" => LoanStatus::Available,
            "r" => LoanStatus::Reserved,
            _ => LoanStatus::default(),
        }
    }
}

/// Book instance as shown to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: i32,
    pub book_title: String,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    pub borrower_id: Option<i32>,
    pub is_overdue: bool,
}

/// Raw `catalog_bookinstance` row joined with the book title
#[derive(Debug, Clone, FromRow)]
pub struct BookInstanceRow {
    pub id: Uuid,
    pub book_id: i32,
    pub book_title: String,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: String,
    pub borrower_id: Option<i32>,
}

impl BookInstanceRow {
    /// Convert to the public model; `today` decides `is_overdue`
    pub fn into_instance(self, today: NaiveDate) -> BookInstance {
        BookInstance {
            is_overdue: self.due_back.map(|d| d < today).unwrap_or(false),
            id: self.id,
            book_id: self.book_id,
            book_title: self.book_title,
            imprint: self.imprint,
            due_back: self.due_back,
            status: LoanStatus::from(self.status.as_str()),
            borrower_id: self.borrower_id,
        }
    }
}
