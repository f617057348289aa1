use std::sync::Arc;

use axum::extract::Extension;
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};

use crate::api::rest::auth::Authz;
use crate::api::rest::error::ApiResult;
use crate::api::rest::extract::QueryParams;
use crate::api::rest::problem::{Problem, bad_request, internal_error};
use crate::domain::ports::{ExportFormat, RenderedDocument};
use crate::domain::service::AppServices;

/// GET `/api/recipes/download_shopping_cart/` - The caller's cart, merged into
/// one shopping list and sent as an attachment.
#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart/",
    tag = "recipes",
    params(("format" = Option<String>, Query, description = "`pdf` (default) or `txt`")),
    responses(
        (status = 200, description = "Shopping list attachment", content_type = "application/pdf"),
        (status = 400, description = "Unknown format", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Not logged in", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(ctx, svc, query))]
pub async fn download_shopping_cart(
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<AppServices>>,
    query: QueryParams,
) -> ApiResult<Response> {
    let format = match query.get("format") {
        Some(raw) => ExportFormat::parse(raw)
            .ok_or_else(|| bad_request(format!("unknown export format '{raw}'")))?,
        None => ExportFormat::default(),
    };
    let document = svc.shopping.export(&ctx, format).await?;
    attachment(document)
}

fn attachment(document: RenderedDocument) -> ApiResult<Response> {
    let disposition =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", document.file_name))
            .map_err(|e| internal_error(format!("invalid attachment name: {e}")))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(document.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}
