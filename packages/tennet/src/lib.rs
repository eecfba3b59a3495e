//! TenneT client - Download and normalize Dutch grid balancing data.
//!
//! TenneT publishes its balancing datasets (ladder sizes, aFRR capacity,
//! settlement prices, balance delta, ...) as XML exports. This crate
//! retrieves a dataset for an arbitrary date range and returns it as one
//! [`Table`] ordered by a timezone-aware `DATETIME` in Europe/Amsterdam.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use tennet_client::planner::{plan, Chunking};
//!
//! let start = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
//! let end = NaiveDate::from_ymd_opt(2023, 3, 10).unwrap();
//! assert_eq!(plan(Chunking::Monthly, start, end).unwrap().len(), 3);
//! ```
//!
//! # Architecture
//!
//! A query runs Planner → HTTP → Parser → concatenation → Reconstructor:
//!
//! - [`planner`]: splits a date range into request windows
//! - [`http`]: one blocking GET per window, no retries
//! - [`xml`]: `<Record>` payload parsing
//! - [`table`]: the tabular data model
//! - [`datetime`]: `DATETIME` reconstruction and DST handling
//! - [`datasets`]: dataset descriptors and catalog
//! - [`client`]: the per-dataset query facade
//! - [`config`]: endpoints, client settings and date validation
//! - [`error`]: error types and Result alias

pub mod client;
pub mod config;
pub mod datasets;
pub mod datetime;
pub mod error;
pub mod http;
pub mod planner;
pub mod table;
pub mod xml;

pub use client::TennetClient;
pub use config::{parse_date, ClientConfig};
pub use datasets::{Dataset, QueryStyle};
pub use datetime::{reconstruct, AmbiguousPolicy};
pub use error::{ErrorKind, Result, TennetError};
pub use planner::{Chunking, DateWindow};
pub use table::{Record, Table, Value};
