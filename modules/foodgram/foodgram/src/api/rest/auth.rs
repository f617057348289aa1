//! Token authentication middleware and the `Authz` extractor.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::error::domain_error_to_problem;
use super::problem::{Problem, internal_error};
use crate::domain::error::DomainError;
use crate::domain::service::AppServices;
use crate::security::SecurityContext;

/// Extractor for `SecurityContext`; requires `authenticate` to have run.
#[derive(Debug, Clone, Copy)]
pub struct Authz(pub SecurityContext);

impl<S> FromRequestParts<S> for Authz
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .copied()
            .map(Authz)
            .ok_or_else(|| {
                internal_error("SecurityContext not found - auth middleware not configured")
            })
    }
}

/// What the `Authorization` header carries.
#[derive(Debug, PartialEq, Eq)]
enum Credentials<'a> {
    Missing,
    Token(&'a str),
    Malformed,
}

fn extract_token(headers: &HeaderMap) -> Credentials<'_> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Credentials::Missing;
    };
    let Ok(value) = value.to_str() else {
        return Credentials::Malformed;
    };
    match value.trim().split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("token") && !token.trim().is_empty() => {
            Credentials::Token(token.trim())
        }
        _ => Credentials::Malformed,
    }
}

/// Resolve `Authorization: Token <key>` into a `SecurityContext`.
///
/// Requests without the header proceed anonymously; unknown or malformed
/// credentials are rejected with 401.
pub async fn authenticate(
    State(services): State<Arc<AppServices>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let ctx = match extract_token(request.headers()) {
        Credentials::Missing => SecurityContext::anonymous(),
        Credentials::Token(token) => match services.users.authenticate(token).await {
            Ok(ctx) => ctx,
            Err(err) => return domain_error_to_problem(&err, &path).into_response(),
        },
        Credentials::Malformed => {
            tracing::debug!("malformed Authorization header");
            return domain_error_to_problem(&DomainError::InvalidToken, &path).into_response();
        }
    };
    request.extensions_mut().insert(ctx);
    next.run(request).await
}
