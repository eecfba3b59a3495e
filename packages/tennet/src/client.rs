//! Dataset facade: one entry point per published dataset.

use chrono::{NaiveDate, Utc};
use reqwest::blocking::Client;

use crate::config::{feed_url, ClientConfig};
use crate::datasets::{self, Dataset, ACTUAL_IMBALANCE_FEED, ACTUAL_IMBALANCE_POLICY};
use crate::datetime::{reconstruct, MARKET_TZ};
use crate::error::Result;
use crate::http::{create_client, download_bytes, fetch_window};
use crate::planner::DateWindow;
use crate::table::{Table, Value, DATE_COLUMN};
use crate::xml::parse_xml;

/// Blocking client for TenneT grid data.
///
/// Requests for one query run strictly one after another over a shared
/// connection pool. The first failing window aborts the whole query.
///
/// # Example
/// ```no_run
/// use chrono::NaiveDate;
/// use tennet_client::TennetClient;
///
/// let client = TennetClient::new()?;
/// let start = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
/// let end = NaiveDate::from_ymd_opt(2023, 3, 10).unwrap();
///
/// let prices = client.query_settlement_prices(start, end)?;
/// for row in prices.rows() {
///     println!("{:?} {:?}", row.datetime, row.get("UPWARD_DISPATCH"));
/// }
/// # Ok::<(), tennet_client::TennetError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TennetClient {
    http: Client,
    config: ClientConfig,
}

impl TennetClient {
    /// Client with the default endpoints and timeout.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http = create_client(&config)?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Retrieve and normalize a dataset for `[start, end]`.
    ///
    /// Plans the windows, fetches and parses each one in turn, concatenates
    /// the results and reconstructs `DATETIME` once on the whole table.
    pub fn query(&self, dataset: &Dataset, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        let windows = dataset.plan(start, end)?;

        let mut tables = Vec::with_capacity(windows.len());
        for window in &windows {
            tracing::debug!(dataset = dataset.name, window = %window, "Fetching window");
            let bytes = fetch_window(&self.http, &self.config, dataset, window)?;
            tables.push(parse_xml(&bytes, window)?);
        }

        let table = reconstruct(Table::concat(tables), dataset.ambiguous)?;

        tracing::info!(
            dataset = dataset.name,
            %start,
            %end,
            windows = windows.len(),
            rows = table.len(),
            "Query complete"
        );

        Ok(table)
    }

    /// Retrieve a dataset for a single day.
    pub fn query_day(&self, dataset: &Dataset, date: NaiveDate) -> Result<Table> {
        self.query(dataset, date, date)
    }

    /// Current balance delta and imbalance prices.
    ///
    /// The feed lists today's most recent minutes without a `DATE` column, so
    /// rows are stamped with today's date in market time before their `TIME`
    /// is localized.
    pub fn query_actual_imbalance(&self) -> Result<Table> {
        let today = Utc::now().with_timezone(&MARKET_TZ).date_naive();
        self.actual_imbalance_on(today)
    }

    fn actual_imbalance_on(&self, today: NaiveDate) -> Result<Table> {
        let url = feed_url(&self.config.xml_base_url, ACTUAL_IMBALANCE_FEED);
        let bytes = download_bytes(&self.http, &url, &[])?;

        let mut table = parse_xml(&bytes, &DateWindow::day(today))?;
        if !table.is_empty() {
            table.add_column(DATE_COLUMN);
        }
        for record in table.rows_mut() {
            record.date = Some(today);
            record.insert(DATE_COLUMN, Value::Text(today.to_string()));
        }

        let table = reconstruct(table, ACTUAL_IMBALANCE_POLICY)?;
        tracing::info!(%today, rows = table.len(), "Actual imbalance retrieved");
        Ok(table)
    }

    pub fn query_ladder_size_15(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::LADDER_SIZE_15, start, end)
    }

    pub fn query_ladder_size_total(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::LADDER_SIZE_TOTAL, start, end)
    }

    pub fn query_bid_price_ladder(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::BID_PRICE_LADDER, start, end)
    }

    /// Available aFRR capacity per PTU.
    pub fn query_available_afrr_capacity(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::AVAILABLE_AFRR_CAPACITY, start, end)
    }

    /// Offered aFRR capacity per PTU.
    pub fn query_offered_afrr_capacity(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::OFFERED_AFRR_CAPACITY, start, end)
    }

    pub fn query_imbalance_price(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::IMBALANCE_PRICE, start, end)
    }

    /// Final settlement (imbalance) prices per PTU.
    pub fn query_settlement_prices(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::SETTLEMENT_PRICES, start, end)
    }

    /// Balance delta with prices, per minute.
    pub fn query_balance_delta(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::BALANCE_DELTA, start, end)
    }

    pub fn query_balance_delta_legacy(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::BALANCE_DELTA_LEGACY, start, end)
    }

    pub fn query_measurement_data(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::MEASUREMENT_DATA, start, end)
    }

    pub fn query_available_capacity(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::AVAILABLE_CAPACITY, start, end)
    }

    pub fn query_emergency_power(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::EMERGENCY_POWER, start, end)
    }

    pub fn query_installed_capacity(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::INSTALLED_CAPACITY, start, end)
    }

    pub fn query_reconciliation_prices(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::RECONCILIATION_PRICES, start, end)
    }

    pub fn query_imbalance_volume(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::IMBALANCE_VOLUME, start, end)
    }

    pub fn query_afrr_bid_prices(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::AFRR_BID_PRICES, start, end)
    }

    pub fn query_afrr_activated_volume(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::AFRR_ACTIVATED_VOLUME, start, end)
    }

    pub fn query_regulating_state(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::REGULATING_STATE, start, end)
    }

    /// Cross-border imbalance netting (IGCC) volumes.
    pub fn query_cross_border_balancing(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::CROSS_BORDER_BALANCING, start, end)
    }

    pub fn query_incident_reserve(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        self.query(&datasets::INCIDENT_RESERVE, start, end)
    }
}
