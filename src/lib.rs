//! LocalLibrary catalog server
//!
//! Lists books, authors and their loanable copies, tracks loans and lets
//! staff renew them. Views answer with a template reference plus context;
//! rendering, login and storage engines live outside this crate.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod render;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
