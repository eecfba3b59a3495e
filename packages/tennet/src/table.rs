//! Tabular data model shared by the parser and the datetime reconstructor.
//!
//! A [`Table`] is an ordered list of [`Record`]s with a dataset-consistent
//! column set. Columns vary per dataset, so values are kept in a
//! name-to-[`Value`] map rather than a fixed struct.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Name of the column every dataset carries its calendar date in.
pub const DATE_COLUMN: &str = "DATE";

/// Floats in `[-2^63, 2^63)` fit an `i64` without saturating.
const I64_FLOAT_RANGE: std::ops::Range<f64> = -9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
}

impl Value {
    /// Infer a value from element text: integer, then float, else text.
    ///
    /// # Examples
    /// ```
    /// use tennet_client::table::Value;
    ///
    /// assert_eq!(Value::infer("42"), Value::Integer(42));
    /// assert_eq!(Value::infer("-12.5"), Value::Float(-12.5));
    /// assert_eq!(Value::infer("00:15"), Value::Text("00:15".to_string()));
    /// assert_eq!(Value::infer("  "), Value::Null);
    /// ```
    #[must_use]
    pub fn infer(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self::Null;
        }
        if let Ok(i) = text.parse::<i64>() {
            return Self::Integer(i);
        }
        if let Ok(f) = text.parse::<f64>() {
            if f.is_finite() {
                return Self::Float(f);
            }
        }
        Self::Text(text.to_string())
    }

    /// Integer view of this value; floats with no fractional part qualify.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Float(f) if f.fract() == 0.0 && I64_FLOAT_RANGE.contains(f) => Some(*f as i64),
            Self::Float(_) => None,
            Self::Text(s) => s.trim().parse().ok(),
            Self::Null => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Null => None,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Null => Ok(()),
        }
    }
}

/// One parsed `<Record>` element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    values: HashMap<String, Value>,

    /// Parsed `DATE` column.
    pub date: Option<NaiveDate>,

    /// Derived timestamp; `None` until reconstructed or when unresolvable.
    pub datetime: Option<DateTime<Tz>>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a column value. Missing columns read as `None`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    /// All column values, unordered.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// The normalized table returned to callers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Record>,
    warnings: Vec<String>,
}

impl Table {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from rows, keeping the given column order.
    #[must_use]
    pub fn from_parts(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self {
            columns,
            rows,
            warnings: Vec::new(),
        }
    }

    /// Column names in first-seen order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Register a column name if it is not yet known.
    pub fn add_column(&mut self, column: &str) {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut Vec<Record> {
        &mut self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    pub fn push(&mut self, record: Record) {
        self.rows.push(record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, `Value::Null` where a row lacks it.
    pub fn column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows
            .iter()
            .map(move |row| row.get(column).unwrap_or(&Value::Null))
    }

    /// The `DATETIME` index, in row order.
    #[must_use]
    pub fn datetimes(&self) -> Vec<Option<DateTime<Tz>>> {
        self.rows.iter().map(|row| row.datetime).collect()
    }

    /// Non-fatal data defects noticed while normalizing.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Timestamps that occur on more than one row, ascending.
    #[must_use]
    pub fn duplicate_datetimes(&self) -> Vec<DateTime<Tz>> {
        let mut counts: BTreeMap<DateTime<Tz>, usize> = BTreeMap::new();
        for dt in self.rows.iter().filter_map(|row| row.datetime) {
            *counts.entry(dt).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(dt, _)| dt)
            .collect()
    }

    /// Append another table, unioning the column sets.
    pub fn append(&mut self, other: Table) {
        for column in &other.columns {
            self.add_column(column);
        }
        self.rows.extend(other.rows);
        self.warnings.extend(other.warnings);
    }

    /// Concatenate tables in order.
    #[must_use]
    pub fn concat(tables: impl IntoIterator<Item = Table>) -> Self {
        let mut result = Self::new();
        for table in tables {
            result.append(table);
        }
        result
    }
}
