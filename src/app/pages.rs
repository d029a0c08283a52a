//! Pagination aggregator
//!
//! Drives repeated executor calls over a `pageToken`-paginated list endpoint
//! and assembles one aggregate envelope. Pages are fetched strictly
//! sequentially; page N+1 is never requested before page N resolves.

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::app::client::RequestOptions;
use crate::app::envelope::ResponseEnvelope;
use crate::app::executor::RequestExecutor;
use crate::constants::api;

/// Field carrying the cursor to the next page in list responses
const NEXT_PAGE_TOKEN_FIELD: &str = "nextPageToken";

/// Collects a paginated list endpoint into one aggregate envelope
///
/// The first page's envelope is the aggregate carrier; each subsequent
/// page's list payload is appended into it in page order. Non-list envelope
/// fields (status code, headers, raw content) reflect only the final page
/// fetched — intentional, since the aggregate describes the completed walk.
/// A failing page aborts immediately and returns that page's envelope; no
/// partial aggregate is ever returned.
#[derive(Debug, Clone)]
pub struct PaginatedCollector {
    executor: RequestExecutor,
}

impl PaginatedCollector {
    /// Create a collector over an executor
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// Fetch every page of `url` and aggregate the `list_field` arrays
    ///
    /// Each page request carries `pageSize` and, from the second page on,
    /// the `pageToken` returned by its predecessor. Page URLs differ by
    /// query string, so each page caches independently in the executor.
    pub async fn collect(&self, url: &Url, list_field: &str) -> ResponseEnvelope {
        let mut aggregate = self.fetch_page(url, None).await;
        if !aggregate.success {
            return aggregate;
        }

        let mut pages = 1usize;
        let mut next_token = take_next_token(&mut aggregate.data);

        while let Some(token) = next_token {
            let page = self.fetch_page(url, Some(&token)).await;
            if !page.success {
                debug!("page {} of {} failed; discarding aggregate", pages + 1, url);
                return page;
            }
            pages += 1;

            let mut page = page;
            next_token = take_next_token(&mut page.data);
            append_list(&mut aggregate, page, list_field);
        }

        debug!("collected {} page(s) from {}", pages, url);
        aggregate
    }

    async fn fetch_page(&self, url: &Url, token: Option<&str>) -> ResponseEnvelope {
        let mut page_url = url.clone();
        {
            let mut query = page_url.query_pairs_mut();
            query.append_pair(api::PAGE_SIZE_PARAM, &api::PAGE_SIZE.to_string());
            if let Some(token) = token {
                query.append_pair(api::PAGE_TOKEN_PARAM, token);
            }
        }
        self.executor.execute(&page_url, RequestOptions::get()).await
    }
}

/// Remove and return the next-page cursor from a page payload
///
/// The field is consumed whatever its shape, so the aggregate never
/// advertises a page that has already been folded in. An empty or non-string
/// token means the walk is complete.
fn take_next_token(data: &mut Value) -> Option<String> {
    let token = data.as_object_mut()?.remove(NEXT_PAGE_TOKEN_FIELD)?;
    token
        .as_str()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Fold a later page into the aggregate carrier
fn append_list(aggregate: &mut ResponseEnvelope, page: ResponseEnvelope, list_field: &str) {
    let incoming = match page.data.get(list_field).and_then(Value::as_array) {
        Some(list) => list.clone(),
        None => Vec::new(),
    };

    match aggregate
        .data
        .get_mut(list_field)
        .and_then(Value::as_array_mut)
    {
        Some(list) => list.extend(incoming),
        None => {
            if let Some(object) = aggregate.data.as_object_mut() {
                object.insert(list_field.to_string(), Value::Array(incoming));
            }
        }
    }

    // Non-list fields track the page fetched last
    aggregate.code = page.code;
    aggregate.headers = page.headers;
    aggregate.content = page.content;
    aggregate.parsed = page.parsed;
}
