//! Dataset descriptors and the catalog of supported exports.
//!
//! Adding a dataset is a data change: declare a [`Dataset`] constant, list it
//! in [`ALL`] and give it a `query_*` method on the client.

use chrono::NaiveDate;
use serde::Serialize;

use crate::datetime::AmbiguousPolicy;
use crate::error::Result;
use crate::planner::{plan, Chunking, DateWindow};

/// How requests for a dataset are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStyle {
    /// One XML file per day: `{xml_base_url}/{export_type}/{YYYYMMDD}.xml`.
    LegacyUrl,
    /// Export page with `exporttype`/`format`/`datefrom`/`dateto`/`submit`.
    MonthlyChunked,
}

/// Immutable description of one published dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dataset {
    /// Short name used in logs and method names.
    pub name: &'static str,
    /// Export type identifier (file category for [`QueryStyle::LegacyUrl`]).
    pub export_type: &'static str,
    pub query_style: QueryStyle,
    pub chunking: Chunking,
    pub ambiguous: AmbiguousPolicy,
}

impl Dataset {
    const fn daily_file(name: &'static str, category: &'static str) -> Self {
        Self {
            name,
            export_type: category,
            query_style: QueryStyle::LegacyUrl,
            chunking: Chunking::Daily,
            ambiguous: AmbiguousPolicy::Null,
        }
    }

    const fn export(name: &'static str, export_type: &'static str, chunking: Chunking) -> Self {
        Self {
            name,
            export_type,
            query_style: QueryStyle::MonthlyChunked,
            chunking,
            ambiguous: AmbiguousPolicy::Null,
        }
    }

    /// Request windows for `[start, end]` under this dataset's chunking.
    pub fn plan(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DateWindow>> {
        plan(self.chunking, start, end)
    }
}

// Per-day XML files
pub const LADDER_SIZE_15: Dataset = Dataset::daily_file("ladder_size_15", "laddersize15");
pub const LADDER_SIZE_TOTAL: Dataset = Dataset::daily_file("ladder_size_total", "laddersizetotal");
pub const BID_PRICE_LADDER: Dataset = Dataset::daily_file("bid_price_ladder", "priceladder");
pub const AVAILABLE_AFRR_CAPACITY: Dataset = Dataset::daily_file("available_afrr_capacity", "brov");
pub const OFFERED_AFRR_CAPACITY: Dataset = Dataset::daily_file("offered_afrr_capacity", "arov");
pub const IMBALANCE_PRICE: Dataset = Dataset::daily_file("imbalance_price", "imbalanceprice");

// Export page
pub const SETTLEMENT_PRICES: Dataset =
    Dataset::export("settlement_prices", "verrekenprijzen", Chunking::Monthly);
pub const BALANCE_DELTA: Dataset =
    Dataset::export("balance_delta", "balansdelta2017", Chunking::Monthly);
pub const BALANCE_DELTA_LEGACY: Dataset =
    Dataset::export("balance_delta_legacy", "balansdelta", Chunking::Monthly);
pub const MEASUREMENT_DATA: Dataset =
    Dataset::export("measurement_data", "meetgegevens", Chunking::Monthly);
pub const AVAILABLE_CAPACITY: Dataset =
    Dataset::export("available_capacity", "beschikbaarvermogen", Chunking::Monthly);
pub const EMERGENCY_POWER: Dataset =
    Dataset::export("emergency_power", "noodvermogen", Chunking::Single);
pub const INSTALLED_CAPACITY: Dataset =
    Dataset::export("installed_capacity", "opgesteldvermogen", Chunking::Single);
pub const RECONCILIATION_PRICES: Dataset =
    Dataset::export("reconciliation_prices", "reconciliatieprijzen", Chunking::Monthly);
pub const IMBALANCE_VOLUME: Dataset =
    Dataset::export("imbalance_volume", "onbalansvolume", Chunking::Monthly);
pub const AFRR_BID_PRICES: Dataset =
    Dataset::export("afrr_bid_prices", "biedprijsladder", Chunking::Monthly);
pub const AFRR_ACTIVATED_VOLUME: Dataset =
    Dataset::export("afrr_activated_volume", "afrrvolume", Chunking::Monthly);
pub const REGULATING_STATE: Dataset =
    Dataset::export("regulating_state", "regeltoestand", Chunking::Monthly);
pub const CROSS_BORDER_BALANCING: Dataset =
    Dataset::export("cross_border_balancing", "igcc", Chunking::Monthly);
pub const INCIDENT_RESERVE: Dataset =
    Dataset::export("incident_reserve", "noodreservevermogen", Chunking::Single);

/// Every dataset with a date-ranged query.
pub const ALL: &[Dataset] = &[
    LADDER_SIZE_15,
    LADDER_SIZE_TOTAL,
    BID_PRICE_LADDER,
    AVAILABLE_AFRR_CAPACITY,
    OFFERED_AFRR_CAPACITY,
    IMBALANCE_PRICE,
    SETTLEMENT_PRICES,
    BALANCE_DELTA,
    BALANCE_DELTA_LEGACY,
    MEASUREMENT_DATA,
    AVAILABLE_CAPACITY,
    EMERGENCY_POWER,
    INSTALLED_CAPACITY,
    RECONCILIATION_PRICES,
    IMBALANCE_VOLUME,
    AFRR_BID_PRICES,
    AFRR_ACTIVATED_VOLUME,
    REGULATING_STATE,
    CROSS_BORDER_BALANCING,
    INCIDENT_RESERVE,
];

/// Path of the near-real-time balance delta feed, relative to the XML base URL.
pub const ACTUAL_IMBALANCE_FEED: &str = "balancedeltaprices/balans-delta.xml";

/// Ambiguous-time policy of the near-real-time feed.
pub const ACTUAL_IMBALANCE_POLICY: AmbiguousPolicy = AmbiguousPolicy::Infer;

/// Look up a dataset by its short name.
///
/// # Examples
/// ```
/// use tennet_client::datasets::{by_name, QueryStyle};
///
/// let dataset = by_name("settlement_prices").unwrap();
/// assert_eq!(dataset.export_type, "verrekenprijzen");
/// assert_eq!(dataset.query_style, QueryStyle::MonthlyChunked);
/// assert!(by_name("unknown").is_none());
/// ```
#[must_use]
pub fn by_name(name: &str) -> Option<&'static Dataset> {
    ALL.iter().find(|d| d.name == name)
}
