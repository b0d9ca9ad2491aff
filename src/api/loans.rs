//! Loan management endpoints

use axum::{
    async_trait,
    extract::{FromRequest, Path, Query, Request, State},
    http::{
        header::{CONTENT_TYPE, LOCATION},
        StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    forms::renewal::{RenewalFormView, RenewalSubmission},
    models::{BookInstance, Page, PageInfo, PageQuery, CAN_MARK_RETURNED},
    render::{render, Rendered},
    services::loans::RenewalOutcome,
    AppState,
};

use super::Caller;

pub const BORROWED_USER_TEMPLATE: &str = "catalog/bookinstance_list_borrowed_user.html";
pub const BORROWED_ALL_TEMPLATE: &str = "catalog/bookinstance_list_borrowed.html";
pub const RENEW_TEMPLATE: &str = "catalog/bookinstance_update.html";

/// Where a successful renewal lands
pub const ALL_BORROWED_URL: &str = "/catalog/borrowed/";

/// One page of borrowed copies
#[derive(Serialize, ToSchema)]
pub struct BorrowedContext {
    pub bookinstance_list: Vec<BookInstance>,
    pub page_obj: PageInfo,
    pub is_paginated: bool,
}

impl From<Page<BookInstance>> for BorrowedContext {
    fn from(page: Page<BookInstance>) -> Self {
        Self {
            is_paginated: page.info.is_paginated(),
            bookinstance_list: page.items,
            page_obj: page.info,
        }
    }
}

/// Renewal form together with the copy being renewed
#[derive(Serialize, ToSchema)]
pub struct RenewalContext {
    pub form: RenewalFormView,
    pub bookinstance: BookInstance,
}

/// Renewal submission posted either as an HTML form or as JSON
pub struct RenewalBody(pub RenewalSubmission);

#[async_trait]
impl<S> FromRequest<S> for RenewalBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(submission) = Form::<RenewalSubmission>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(submission))
        } else {
            let Json(submission) = Json::<RenewalSubmission>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(submission))
        }
    }
}

/// Books on loan to the current user
#[utoipa::path(
    get,
    path = "/catalog/mybooks/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "catalog/bookinstance_list_borrowed_user.html context", body = BorrowedContext),
        (status = 302, description = "Not logged in, redirected to the login page"),
        (status = 404, description = "No such page", body = crate::error::ErrorResponse)
    )
)]
pub async fn my_borrowed(
    State(state): State<AppState>,
    caller: Caller,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> AppResult<Rendered<BorrowedContext>> {
    let user = caller.login_required(&state.config.auth, &uri)?;

    let page = state.services.loans.borrowed_by(user.user_id, &query).await?;
    Ok(render(BORROWED_USER_TEMPLATE, BorrowedContext::from(page)))
}

/// Books on loan to anyone.
///
/// Callers without `catalog.can_mark_returned` still get the page, rendered
/// with an empty context.
#[utoipa::path(
    get,
    path = "/catalog/borrowed/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "catalog/bookinstance_list_borrowed.html context, empty without permission", body = BorrowedContext),
        (status = 404, description = "No such page", body = crate::error::ErrorResponse)
    )
)]
pub async fn all_borrowed(
    State(state): State<AppState>,
    caller: Caller,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> AppResult<Rendered<BorrowedContext>> {
    if caller
        .permission_required(CAN_MARK_RETURNED, &state.config.auth, &uri)
        .is_err()
    {
        return Ok(Rendered::empty(BORROWED_ALL_TEMPLATE));
    }

    let page = state.services.loans.all_borrowed(&query).await?;
    Ok(render(BORROWED_ALL_TEMPLATE, BorrowedContext::from(page)))
}

/// Renewal form for one copy
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/renew/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    responses(
        (status = 200, description = "catalog/bookinstance_update.html context", body = RenewalContext),
        (status = 302, description = "Not logged in, redirected to the login page"),
        (status = 403, description = "Missing catalog.can_mark_returned", body = crate::error::ErrorResponse),
        (status = 404, description = "Book instance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn renew_form(
    State(state): State<AppState>,
    caller: Caller,
    uri: Uri,
    Path(id): Path<Uuid>,
) -> AppResult<Rendered<RenewalContext>> {
    caller.permission_required(CAN_MARK_RETURNED, &state.config.auth, &uri)?;

    let bookinstance = state.services.loans.get_instance(id).await?;
    Ok(render(
        RENEW_TEMPLATE,
        RenewalContext {
            form: RenewalFormView::initial(bookinstance.due_back),
            bookinstance,
        },
    ))
}

/// Submit a new due date for one copy
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/renew/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    request_body(
        content = RenewalSubmission,
        description = "JSON or application/x-www-form-urlencoded"
    ),
    responses(
        (status = 302, description = "Renewed, redirected to the borrowed list (or to login when anonymous)"),
        (status = 200, description = "Rejected, form re-rendered with errors", body = RenewalContext),
        (status = 403, description = "Missing catalog.can_mark_returned", body = crate::error::ErrorResponse),
        (status = 404, description = "Book instance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn renew_submit(
    State(state): State<AppState>,
    caller: Caller,
    uri: Uri,
    Path(id): Path<Uuid>,
    RenewalBody(submission): RenewalBody,
) -> AppResult<Response> {
    caller.permission_required(CAN_MARK_RETURNED, &state.config.auth, &uri)?;

    match state.services.loans.renew(id, &submission).await? {
        RenewalOutcome::Renewed(_) => {
            Ok((StatusCode::FOUND, [(LOCATION, ALL_BORROWED_URL)]).into_response())
        }
        RenewalOutcome::Rejected { instance, form } => Ok(render(
            RENEW_TEMPLATE,
            RenewalContext {
                form,
                bookinstance: instance,
            },
        )
        .into_response()),
    }
}
