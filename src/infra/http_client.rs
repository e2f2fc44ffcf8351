use crate::app::ports::ApiResponse;
use crate::config::HttpConfig;
use crate::error::{MigrationError, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

// Stop paging even if the registry keeps returning full pages
const MAX_PAGES: u32 = 1_000;

pub fn build_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .build()?;
    Ok(client)
}

/// Join path segments onto a base URL, percent-encoding each segment.
pub fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| MigrationError::Config(format!("invalid base URL '{base_url}': {e}")))?;
    url.path_segments_mut()
        .map_err(|_| MigrationError::Config(format!("base URL '{base_url}' cannot have a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Items of one export page: either a bare array or a `{"data": [...]}` envelope
pub fn page_items(page: Value) -> Vec<Value> {
    match page {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// GET a JSON document. A non-success status means "absent" and yields `None`.
pub async fn get_json(client: &Client, url: Url, token: &str) -> Result<Option<Value>> {
    debug!(url = %url, "GET");
    let response = client
        .get(url.clone())
        .header(AUTHORIZATION, token)
        .header(CONTENT_TYPE, "application/json")
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        debug!(url = %url, status = status.as_u16(), "Treating response as absent");
        return Ok(None);
    }
    let body = response.bytes().await?;
    Ok(Some(serde_json::from_slice(&body)?))
}

pub async fn into_api_response(response: reqwest::Response) -> Result<ApiResponse> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok(ApiResponse { status, body })
}

/// Walk `page=1..max_pages`, flattening items until a short or empty page.
pub async fn collect_pages<F, Fut>(
    page_size: u32,
    max_pages: u32,
    operation: &'static str,
    mut fetch_page: F,
) -> Result<Vec<Value>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<Value>>>,
{
    let mut all = Vec::new();
    for page in 1..=max_pages {
        let items = fetch_page(page).await?;
        let count = items.len();
        all.extend(items);
        debug!(operation, page, count, "Fetched export page");
        if count < page_size as usize {
            return Ok(all);
        }
    }
    warn!(operation, pages = max_pages, "Stopped paging at the page limit");
    Ok(all)
}

/// Page through a registry export. Any non-success page fails the whole
/// listing with `Rejected`.
pub async fn fetch_all_pages<F>(
    client: &Client,
    token: &str,
    page_size: u32,
    operation: &'static str,
    page_url: F,
) -> Result<Vec<Value>>
where
    F: Fn(u32, u32) -> Result<Url>,
{
    collect_pages(page_size, MAX_PAGES, operation, |page| {
        let url = page_url(page, page_size);
        async move {
            let response = client
                .get(url?)
                .header(AUTHORIZATION, token)
                .header(CONTENT_TYPE, "application/json")
                .send()
                .await?;
            if !response.status().is_success() {
                let api = into_api_response(response).await?;
                return Err(MigrationError::Rejected {
                    operation,
                    status: api.status,
                    body: api.body,
                });
            }
            Ok(page_items(response.json::<Value>().await?))
        }
    })
    .await
}
