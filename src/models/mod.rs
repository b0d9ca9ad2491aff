//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;
pub mod page;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorDetail};
pub use book::{Book, BookDetail};
pub use book_instance::{BookInstance, LoanStatus};
pub use genre::Genre;
pub use page::{Page, PageInfo, PageQuery, Paginator};
pub use user::{UserClaims, CAN_MARK_RETURNED};
