//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the HTTP client with the configured user agent and timeout
//! - Fetching one page of search results for a keyword at an offset
//! - Streaming an image download to a local file
//!
//! No retries happen at this layer. A failed page fetch aborts the current
//! keyword; a failed image download only skips that candidate. Both
//! policies live in the orchestrator.

use crate::config::SearchConfig;
use crate::SeineError;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Builds the HTTP client used for every request in a run
///
/// # Arguments
///
/// * `search` - Search configuration providing the user agent
/// * `timeout_secs` - Total per-request timeout, pages and images alike
pub fn build_http_client(
    search: &SearchConfig,
    timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(search.user_agent.clone())
        .timeout(Duration::from_secs(timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one page of search-results markup for a keyword
///
/// Issues a single GET against the configured endpoint with the keyword
/// and pagination offset, plus the fixed auxiliary parameters the search
/// engine expects. Non-2xx statuses, timeouts, and network errors all map
/// to an error; the caller treats any of them as fatal for the keyword.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `search` - Search endpoint configuration
/// * `keyword` - The search keyword
/// * `offset` - Pagination offset (number of results to skip)
pub async fn fetch_search_page(
    client: &Client,
    search: &SearchConfig,
    keyword: &str,
    offset: usize,
) -> Result<String, SeineError> {
    let first = offset.to_string();
    let params = [
        ("q", keyword),
        ("first", first.as_str()),
        ("form", "HDRSC2"),
        ("cw", "1116"),
        ("ch", "777"),
    ];

    let response = client
        .get(&search.endpoint)
        .query(&params)
        .send()
        .await
        .map_err(|e| classify_request_error(&search.endpoint, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SeineError::Status {
            url: search.endpoint.clone(),
            status: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| classify_request_error(&search.endpoint, e))
}

/// Downloads an image to `dest`, streaming bytes as they arrive
///
/// On failure the file may exist but be incomplete; callers must not
/// trust it. Success means every received byte was written and flushed.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `image_url` - Direct URL of the image
/// * `dest` - Destination file path (parent directory must exist)
pub async fn download_image(
    client: &Client,
    image_url: &str,
    dest: &Path,
) -> Result<(), SeineError> {
    let mut response = client
        .get(image_url)
        .send()
        .await
        .map_err(|e| classify_request_error(image_url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SeineError::Status {
            url: image_url.to_string(),
            status: status.as_u16(),
        });
    }

    let mut file = tokio::fs::File::create(dest).await?;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| classify_request_error(image_url, e))?
    {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(())
}

/// Maps a reqwest error to the harvester's error taxonomy
fn classify_request_error(url: &str, error: reqwest::Error) -> SeineError {
    if error.is_timeout() {
        SeineError::Timeout {
            url: url.to_string(),
        }
    } else {
        SeineError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
