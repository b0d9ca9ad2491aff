//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{catalog, health, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LocalLibrary API",
        version = "0.1.0",
        description = "Library catalog and loan renewal. Every view answers with the template it renders and that template's context."
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        catalog::index,
        catalog::list_books,
        catalog::get_book,
        catalog::list_authors,
        catalog::get_author,
        // Loans
        loans::my_borrowed,
        loans::all_borrowed,
        loans::renew_form,
        loans::renew_submit,
    ),
    components(
        schemas(
            // Catalog
            crate::models::Book,
            crate::models::BookDetail,
            crate::models::Author,
            crate::models::AuthorDetail,
            crate::models::Genre,
            crate::services::catalog::CatalogCounts,
            catalog::BookListContext,
            catalog::BookDetailContext,
            catalog::AuthorListContext,
            catalog::AuthorDetailContext,
            // Loans
            crate::models::BookInstance,
            crate::models::LoanStatus,
            crate::models::PageInfo,
            crate::forms::renewal::RenewalSubmission,
            crate::forms::renewal::RenewalFormView,
            loans::BorrowedContext,
            loans::RenewalContext,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Books and authors"),
        (name = "loans", description = "Borrowed copies and renewals")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
