//! Loan listing and renewal service

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::AppResult,
    forms::renewal::{RenewBookForm, RenewalFormView, RenewalSubmission},
    models::{page::PAGINATE_BY, BookInstance, Page, PageQuery, Paginator},
    repository::CatalogStore,
};

/// Result of a renewal submission
#[derive(Debug)]
pub enum RenewalOutcome {
    /// New due date saved
    Renewed(BookInstance),
    /// Form rejected; nothing was saved
    Rejected {
        instance: BookInstance,
        form: RenewalFormView,
    },
}

#[derive(Clone)]
pub struct LoansService {
    store: Arc<dyn CatalogStore>,
}

impl LoansService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    async fn on_loan_page(
        &self,
        borrower_id: Option<i32>,
        query: &PageQuery,
    ) -> AppResult<Page<BookInstance>> {
        let count = self.store.count_on_loan(borrower_id).await?;
        let info = Paginator::new(count, PAGINATE_BY).page(query)?;
        let items = self
            .store
            .list_on_loan(borrower_id, info.offset(), info.per_page)
            .await?;
        Ok(Page { items, info })
    }

    /// Copies on loan to one user, soonest due first
    pub async fn borrowed_by(&self, user_id: i32, query: &PageQuery) -> AppResult<Page<BookInstance>> {
        self.on_loan_page(Some(user_id), query).await
    }

    /// Every copy on loan, soonest due first
    pub async fn all_borrowed(&self, query: &PageQuery) -> AppResult<Page<BookInstance>> {
        self.on_loan_page(None, query).await
    }

    pub async fn get_instance(&self, id: Uuid) -> AppResult<BookInstance> {
        self.store.get_instance(id).await
    }

    /// Validate a new due date and save it when acceptable
    pub async fn renew(&self, id: Uuid, submission: &RenewalSubmission) -> AppResult<RenewalOutcome> {
        let instance = self.store.get_instance(id).await?;

        match RenewBookForm::bind(submission) {
            Ok(form) => {
                let renewed = self.store.update_due_back(id, form.due_back).await?;
                tracing::info!("Renewed book instance {} until {}", id, form.due_back);
                Ok(RenewalOutcome::Renewed(renewed))
            }
            Err(errors) => {
                tracing::debug!("Renewal of book instance {} rejected: {:?}", id, errors);
                Ok(RenewalOutcome::Rejected {
                    instance,
                    form: RenewalFormView::rejected(submission, errors),
                })
            }
        }
    }
}
