use axum::extract::Request;
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::problem::{APPLICATION_PROBLEM_JSON, Problem, ValidationViolation};
use crate::domain::error::DomainError;

pub type ApiResult<T = ()> = Result<T, Problem>;

const ERROR_TYPE_BASE: &str = "https://foodgram.example.com/errors/";

fn problem(status: StatusCode, title: &str, code: &str, detail: impl Into<String>) -> Problem {
    Problem::new(status, title, detail)
        .with_type(format!("{ERROR_TYPE_BASE}{}", code.to_lowercase()))
        .with_code(code)
}

/// Map domain error to RFC 9457 Problem.
pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    let trace_id = tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string());

    let problem = match e {
        DomainError::NotFound { .. } => {
            problem(StatusCode::NOT_FOUND, "Not Found", "NOT_FOUND", e.to_string())
        }
        DomainError::Validation { violations } => problem(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Validation Failed",
            "VALIDATION",
            e.to_string(),
        )
        .with_errors(
            violations
                .iter()
                .map(|v| ValidationViolation {
                    field: v.field.clone(),
                    message: v.message.clone(),
                })
                .collect(),
        ),
        DomainError::BadRequest { message } => {
            problem(StatusCode::BAD_REQUEST, "Bad Request", "BAD_REQUEST", message)
        }
        DomainError::Conflict { .. } => {
            problem(StatusCode::CONFLICT, "Conflict", "CONFLICT", e.to_string())
        }
        DomainError::Unauthorized | DomainError::InvalidToken => problem(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "UNAUTHORIZED",
            e.to_string(),
        ),
        DomainError::Forbidden { message } => {
            tracing::warn!(error = %e, "access forbidden");
            problem(StatusCode::FORBIDDEN, "Forbidden", "FORBIDDEN", message)
        }
        DomainError::Database { .. } => {
            tracing::error!(error = %e, "database error occurred");
            problem(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "INTERNAL_DATABASE",
                "An internal database error occurred",
            )
        }
        DomainError::Internal { .. } => {
            tracing::error!(error = %e, "internal error");
            problem(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "INTERNAL",
                "An internal error occurred",
            )
        }
    };

    let problem = problem.with_instance(instance);
    match trace_id {
        Some(id) => problem.with_trace_id(id),
        None => problem,
    }
}

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        domain_error_to_problem(&e, "")
    }
}

/// Fill in `instance` and `trace_id` of problem responses produced below
/// this layer from the request path and `x-request-id`.
pub async fn problem_context_middleware(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let response = next.run(request).await;
    if !is_problem_response(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let Ok(bytes) = axum::body::to_bytes(body, 64 * 1024).await else {
        return parts.status.into_response();
    };
    match serde_json::from_slice::<Problem>(&bytes) {
        Ok(mut problem) => {
            if problem.instance.is_empty() {
                problem.instance = path;
            }
            if let Some(id) = request_id {
                problem.trace_id = Some(id);
            }
            problem.into_response()
        }
        Err(_) => Response::from_parts(parts, axum::body::Body::from(bytes)),
    }
}

fn is_problem_response(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains(APPLICATION_PROBLEM_JSON))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::Violation;

    #[test]
    fn not_found_maps_to_404() {
        let p = domain_error_to_problem(&DomainError::not_found("Recipe", &5), "/api/recipes/5/");
        assert_eq!(p.status, StatusCode::NOT_FOUND);
        assert_eq!(p.code, "NOT_FOUND");
        assert_eq!(p.detail, "Recipe not found: 5");
        assert_eq!(p.instance, "/api/recipes/5/");
    }

    #[test]
    fn validation_maps_to_422_with_field_errors() {
        let e = DomainError::violations(vec![
            Violation::new("ingredients", "must not be empty"),
            Violation::new("cooking_time", "must be at least 1"),
        ]);
        let p = domain_error_to_problem(&e, "/api/recipes/");
        assert_eq!(p.status, StatusCode::UNPROCESSABLE_ENTITY);
        let errors = p.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "ingredients");
    }

    #[test]
    fn duplicate_mark_maps_to_400() {
        let p = domain_error_to_problem(
            &DomainError::bad_request("Recipe is already added to favorites"),
            "/",
        );
        assert_eq!(p.status, StatusCode::BAD_REQUEST);
        assert_eq!(p.detail, "Recipe is already added to favorites");
    }

    #[test]
    fn auth_errors_map_to_401_and_403() {
        assert_eq!(
            domain_error_to_problem(&DomainError::Unauthorized, "/").status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            domain_error_to_problem(&DomainError::InvalidToken, "/").status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            domain_error_to_problem(&DomainError::forbidden("nope"), "/").status,
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn storage_details_are_not_exposed() {
        let p = domain_error_to_problem(&DomainError::database("UNIQUE constraint failed"), "/");
        assert_eq!(p.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!p.detail.contains("UNIQUE"));
    }

    #[test]
    fn conflict_maps_to_409() {
        let p = domain_error_to_problem(&DomainError::conflict("name taken"), "/");
        assert_eq!(p.status, StatusCode::CONFLICT);
    }
}
