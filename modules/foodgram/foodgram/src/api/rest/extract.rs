//! Request extractors that reject with Problem responses.

use std::str::FromStr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use foodgram_sdk::{PageRequest, RecipeFilter};
use serde::de::DeserializeOwned;

use super::problem::{Problem, bad_request};
use crate::config::FoodgramConfig;

/// JSON request body; malformed input becomes a Problem response.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection_to_problem(&rejection)),
        }
    }
}

fn json_rejection_to_problem(rejection: &JsonRejection) -> Problem {
    let code = match rejection {
        JsonRejection::JsonDataError(_) => "INVALID_BODY",
        JsonRejection::JsonSyntaxError(_) => "MALFORMED_JSON",
        JsonRejection::MissingJsonContentType(_) => "UNSUPPORTED_MEDIA_TYPE",
        _ => "BAD_REQUEST",
    };
    let status = rejection.status();
    Problem::new(
        status,
        status.canonical_reason().unwrap_or("Bad Request"),
        rejection.body_text(),
    )
    .with_code(code)
}

/// Numeric `{id}` path segment. Anything else does not name a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub i32);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<i32>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| Self(id))
            .map_err(|_| {
                Problem::new(StatusCode::NOT_FOUND, "Not Found", "No resource matches this path")
                    .with_code("NOT_FOUND")
            })
    }
}

/// Query string pairs in order, repeated keys preserved, plus the request path.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    path: String,
    pairs: Vec<(String, String)>,
}

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::parse(parts.uri.path(), parts.uri.query())
    }
}

impl QueryParams {
    /// # Errors
    /// 400 when the query string is not valid url-encoding.
    pub fn parse(path: &str, query: Option<&str>) -> Result<Self, Problem> {
        let pairs = match query {
            Some(q) => serde_urlencoded::from_str::<Vec<(String, String)>>(q)
                .map_err(|e| bad_request(format!("invalid query string: {e}")))?,
            None => Vec::new(),
        };
        Ok(Self {
            path: path.to_owned(),
            pairs,
        })
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// First non-empty value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    /// Every non-empty value of `key`, in order.
    #[must_use]
    pub fn all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// # Errors
    /// 400 when the value does not parse as `T`.
    pub fn number<T: FromStr>(&self, key: &str) -> Result<Option<T>, Problem> {
        self.get(key)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| bad_request(format!("'{key}' must be a non-negative integer")))
            })
            .transpose()
    }

    /// `1`/`true` and `0`/`false`.
    ///
    /// # Errors
    /// 400 for any other value.
    pub fn flag(&self, key: &str) -> Result<Option<bool>, Problem> {
        self.get(key)
            .map(|raw| match raw.to_ascii_lowercase().as_str() {
                "1" | "true" => Ok(true),
                "0" | "false" => Ok(false),
                _ => Err(bad_request(format!("'{key}' must be 0, 1, true or false"))),
            })
            .transpose()
    }

    /// `page` and `limit`, defaulting to the first page of the configured size.
    ///
    /// # Errors
    /// 400 on non-numeric values and on pages starting past the last
    /// addressable row.
    pub fn page(&self, config: &FoodgramConfig) -> Result<PageRequest, Problem> {
        let page = self.number::<u64>("page")?.unwrap_or(1);
        let limit = self
            .number::<u64>("limit")?
            .unwrap_or(config.default_page_size);
        let request = PageRequest::new(page, limit);
        let effective_limit = request.limit.min(config.max_page_size.max(1));
        match (request.page - 1).checked_mul(effective_limit) {
            Some(offset) if offset < PageRequest::MAX_ROWS => Ok(request),
            _ => Err(bad_request("'page' is out of range")),
        }
    }

    /// Recipe list filters: `author`, repeated `tags`, `is_favorited`,
    /// `is_in_shopping_cart`.
    ///
    /// # Errors
    /// 400 on malformed values.
    pub fn recipe_filter(&self) -> Result<RecipeFilter, Problem> {
        Ok(RecipeFilter {
            author: self.number::<i32>("author")?,
            tags: self.all("tags").into_iter().map(str::to_owned).collect(),
            is_favorited: self.flag("is_favorited")?,
            is_in_shopping_cart: self.flag("is_in_shopping_cart")?,
        })
    }
}
