//! Configuration constants, client settings and input validation.

use std::sync::LazyLock;
use std::time::Duration;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{Result, TennetError};

/// Export page serving the monthly-chunked dataset family.
pub const EXPORT_URL: &str =
    "https://www.tennet.org/english/operational_management/export_data.aspx";

/// Base URL of the per-day XML file family and the real-time feeds.
pub const XML_BASE_URL: &str = "https://www.tennet.org/xml";

/// Default HTTP timeout in seconds.
///
/// Monthly export windows can take a while to be rendered server-side.
pub const HTTP_TIMEOUT_SECS: u64 = 60;

/// Output format selector sent to the export page.
pub const EXPORT_FORMAT: &str = "xml";

/// Date format expected by the export page (`datefrom`/`dateto`).
pub const EXPORT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Date format used in per-day file names.
pub const FILE_DATE_FORMAT: &str = "%Y%m%d";

/// User agent string identifying this client.
pub const USER_AGENT: &str = concat!("tennet-client/", env!("CARGO_PKG_VERSION"));

/// Date pattern: YYYY-MM-DD.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Settings for a [`crate::TennetClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Export page for the monthly-chunked family.
    pub export_url: String,
    /// Base URL for per-day files and real-time feeds, without trailing slash.
    pub xml_base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent header value.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            export_url: EXPORT_URL.to_string(),
            xml_base_url: XML_BASE_URL.to_string(),
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Build a configuration from the environment.
    ///
    /// Reads `TENNET_EXPORT_URL`, `TENNET_XML_BASE_URL` and
    /// `TENNET_HTTP_TIMEOUT_SECS`; unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("TENNET_EXPORT_URL") {
            config = config.with_export_url(url);
        }

        if let Ok(url) = std::env::var("TENNET_XML_BASE_URL") {
            config = config.with_xml_base_url(url);
        }

        if let Ok(raw) = std::env::var("TENNET_HTTP_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                TennetError::Config(format!("TENNET_HTTP_TIMEOUT_SECS is not a number: '{raw}'"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_export_url(mut self, url: impl Into<String>) -> Self {
        self.export_url = url.into();
        self
    }

    pub fn with_xml_base_url(mut self, url: impl Into<String>) -> Self {
        self.xml_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Parse a caller-supplied date string (YYYY-MM-DD).
///
/// # Examples
/// ```
/// use tennet_client::config::parse_date;
///
/// assert!(parse_date("2023-01-15").is_ok());
/// assert!(parse_date("15-01-2023").is_err());
/// assert!(parse_date("2023-02-30").is_err()); // Invalid day
/// ```
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    if !DATE_PATTERN.is_match(date_str) {
        return Err(TennetError::InvalidDate(date_str.to_string()));
    }

    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| TennetError::InvalidDate(date_str.to_string()))
}

/// Ensure `start <= end`.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(TennetError::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(())
}

/// Build the URL of a per-day XML file.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use tennet_client::config::daily_file_url;
///
/// let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
/// assert_eq!(
///     daily_file_url("https://www.tennet.org/xml", "laddersize15", date),
///     "https://www.tennet.org/xml/laddersize15/20230101.xml"
/// );
/// ```
pub fn daily_file_url(xml_base_url: &str, category: &str, date: NaiveDate) -> String {
    format!("{xml_base_url}/{category}/{}.xml", date.format(FILE_DATE_FORMAT))
}

/// Build the URL of a fixed real-time feed.
pub fn feed_url(xml_base_url: &str, feed_path: &str) -> String {
    format!("{xml_base_url}/{}", feed_path.trim_start_matches('/'))
}

/// Query parameters for one export-page request.
pub fn export_query(export_type: &str, start: NaiveDate, end: NaiveDate) -> Vec<(&'static str, String)> {
    vec![
        ("exporttype", export_type.to_string()),
        ("format", EXPORT_FORMAT.to_string()),
        ("datefrom", start.format(EXPORT_DATE_FORMAT).to_string()),
        ("dateto", end.format(EXPORT_DATE_FORMAT).to_string()),
        ("submit", "1".to_string()),
    ]
}
