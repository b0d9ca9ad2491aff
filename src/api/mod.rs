//! HTTP handlers for the catalog site

pub mod catalog;
pub mod health;
pub mod loans;
pub mod openapi;


use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::LOCATION, request::Parts, StatusCode, Uri},
    routing::get,
    Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::UserClaims,
    AppState,
};

/// Who is calling: verified token claims, or `None` for anonymous callers.
///
/// A token that fails verification (malformed, badly signed, expired) counts
/// as no token at all.
pub struct Caller(pub Option<UserClaims>);

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let bearer =
            match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
                Ok(TypedHeader(Authorization(bearer))) => bearer,
                Err(rejection) => {
                    if !rejection.is_missing() {
                        tracing::debug!("Ignoring authorization header: {}", rejection);
                    }
                    return Ok(Caller(None));
                }
            };

        match UserClaims::from_token(bearer.token(), &state.config.auth.jwt_secret) {
            Ok(claims) => Ok(Caller(Some(claims))),
            Err(e) => {
                tracing::debug!("Treating caller as anonymous, token rejected: {}", e);
                Ok(Caller(None))
            }
        }
    }
}

impl Caller {
    /// Proceed with the signed-in user; anonymous callers are sent to log in
    pub fn login_required(&self, auth: &AuthConfig, uri: &Uri) -> AppResult<&UserClaims> {
        self.0.as_ref().ok_or_else(|| AppError::LoginRequired {
            location: login_redirect(&auth.login_url, uri),
        })
    }

    /// Proceed only when the user holds `permission`.
    ///
    /// Anonymous callers are sent to log in, signed-in users without the
    /// permission get an authorization error.
    pub fn permission_required(
        &self,
        permission: &str,
        auth: &AuthConfig,
        uri: &Uri,
    ) -> AppResult<&UserClaims> {
        let claims = self.login_required(auth, uri)?;
        if let Err(e) = claims.require_perm(permission) {
            tracing::debug!("User {} lacks {}", claims.sub, permission);
            return Err(e);
        }
        Ok(claims)
    }
}

/// `{login_url}?next={quoted path and query}`
fn login_redirect(login_url: &str, uri: &Uri) -> String {
    let next = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let separator = if login_url.contains('?') { '&' } else { '?' };
    format!("{}{}next={}", login_url, separator, quote(next))
}

/// Percent-encode everything but unreserved characters and `/`
fn quote(raw: &str) -> String {
    raw.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let site = Router::new()
        .route(
            "/",
            get(|| async { (StatusCode::MOVED_PERMANENTLY, [(LOCATION, "/catalog/")]) }),
        )
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Catalog
        .route("/catalog/", get(catalog::index))
        .route("/catalog/books/", get(catalog::list_books))
        .route("/catalog/book/:id", get(catalog::get_book))
        .route("/catalog/authors/", get(catalog::list_authors))
        .route("/catalog/author/:id", get(catalog::get_author))
        // Loans
        .route("/catalog/mybooks/", get(loans::my_borrowed))
        .route("/catalog/borrowed/", get(loans::all_borrowed))
        .route(
            "/catalog/book/:id/renew/",
            get(loans::renew_form).post(loans::renew_submit),
        )
        .with_state(state);

    Router::new()
        .merge(site)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
