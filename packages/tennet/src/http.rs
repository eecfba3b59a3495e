//! HTTP client wrapper for downloading TenneT exports.
//!
//! Every request is a single attempt: a non-2xx status or a transport error
//! is returned to the caller as-is.

use reqwest::blocking::Client;

use crate::config::{daily_file_url, export_query, ClientConfig};
use crate::datasets::{Dataset, QueryStyle};
use crate::error::{Result, TennetError};
use crate::planner::DateWindow;

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` with the configured timeout and user agent.
pub fn create_client(config: &ClientConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// Download a URL with optional query parameters.
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `url` - URL to download from
/// * `query` - Query parameters appended to the URL
///
/// # Returns
/// Raw bytes of the response body
pub fn download_bytes(client: &Client, url: &str, query: &[(&str, String)]) -> Result<Vec<u8>> {
    let request = client.get(url).query(query).build()?;
    let requested = request.url().to_string();

    tracing::debug!(url = %requested, "Requesting");

    let response = client.execute(request)?;
    let status = response.status();

    if !status.is_success() {
        tracing::debug!(url = %requested, status = %status, "Request failed");
        return Err(TennetError::Retrieval {
            status: status.as_u16(),
            url: requested,
        });
    }

    let bytes = response.bytes()?;
    Ok(bytes.to_vec())
}

/// Fetch the payload of one window for a dataset.
///
/// Per-day files are addressed by path and must be requested one day at a
/// time; export-page datasets take the window as `datefrom`/`dateto`.
pub fn fetch_window(
    client: &Client,
    config: &ClientConfig,
    dataset: &Dataset,
    window: &DateWindow,
) -> Result<Vec<u8>> {
    match dataset.query_style {
        QueryStyle::LegacyUrl => {
            debug_assert!(window.is_single_day(), "per-day files need single-day windows");
            let url = daily_file_url(&config.xml_base_url, dataset.export_type, window.start);
            download_bytes(client, &url, &[])
        }
        QueryStyle::MonthlyChunked => {
            let query = export_query(dataset.export_type, window.start, window.end);
            download_bytes(client, &config.export_url, &query)
        }
    }
}
