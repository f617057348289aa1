//! Page envelopes with relative `next`/`previous` links.

use foodgram_sdk::Page;

use super::dto::PageDto;
use super::extract::QueryParams;

/// Wrap `page` into a `PageDto`, linking neighbours through the request's
/// own path and query with only `page` changed.
pub fn page_dto<T, U>(page: Page<T>, query: &QueryParams) -> PageDto<U>
where
    U: From<T>,
{
    let next = page
        .has_next()
        .then(|| link(query, Some(page.request.page.saturating_add(1))));
    let previous = page.has_previous().then(|| {
        let target = page.request.page - 1;
        link(query, (target > 1).then_some(target))
    });
    PageDto {
        count: page.count,
        next,
        previous,
        results: page.items.into_iter().map(U::from).collect(),
    }
}

/// `None` drops the `page` parameter, which reads as the first page.
fn link(query: &QueryParams, page: Option<u64>) -> String {
    let mut pairs: Vec<(&str, String)> = query
        .pairs()
        .iter()
        .filter(|(k, _)| k != "page")
        .map(|(k, v)| (k.as_str(), v.clone()))
        .collect();
    if let Some(page) = page {
        pairs.push(("page", page.to_string()));
    }
    let encoded = serde_urlencoded::to_string(&pairs).unwrap_or_default();
    if encoded.is_empty() {
        query.path().to_owned()
    } else {
        format!("{}?{encoded}", query.path())
    }
}
