//! Page-number pagination for list views

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Records per page on the loan lists
pub const PAGINATE_BY: i64 = 10;

/// `?page=` query string; a positive integer or `last`
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Position of one page within a result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageInfo {
    /// 1-based page number
    pub number: i64,
    pub num_pages: i64,
    /// Total records across all pages
    pub count: i64,
    pub per_page: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageInfo {
    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }

    pub fn is_paginated(&self) -> bool {
        self.num_pages > 1
    }
}

/// One page of records together with its position
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

/// Splits `count` records into pages of `per_page`
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    count: i64,
    per_page: i64,
}

impl Paginator {
    pub fn new(count: i64, per_page: i64) -> Self {
        Self { count, per_page }
    }

    /// Never zero: an empty result set still has one (empty) page
    pub fn num_pages(&self) -> i64 {
        if self.count <= 0 {
            return 1;
        }
        (self.count + self.per_page - 1) / self.per_page
    }

    /// Resolve the requested page; unusable page numbers are not found
    pub fn page(&self, query: &PageQuery) -> AppResult<PageInfo> {
        let num_pages = self.num_pages();
        let number = match query.page.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some("last") => num_pages,
            Some(raw) => raw.parse::<i64>().map_err(|_| {
                AppError::NotFound("Page is not 'last', nor can it be converted to an int".to_string())
            })?,
        };

        if number < 1 {
            return Err(AppError::NotFound("That page number is less than 1".to_string()));
        }
        if number > num_pages {
            return Err(AppError::NotFound("That page contains no results".to_string()));
        }

        Ok(PageInfo {
            number,
            num_pages,
            count: self.count,
            per_page: self.per_page,
            has_next: number < num_pages,
            has_previous: number > 1,
        })
    }
}
