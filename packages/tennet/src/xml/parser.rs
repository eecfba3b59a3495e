//! Record parser: turns an XML export payload into a [`Table`].
//!
//! Every export carries its rows as repeated `<Record>` elements. Each child
//! element of a record becomes a column named after its tag.

use chrono::{NaiveDate, NaiveDateTime};
use roxmltree::Document;

use super::utils::{bytes_to_string, element_children, find_descendants, get_tag_name, get_text};
use crate::error::{Result, TennetError};
use crate::planner::DateWindow;
use crate::table::{Record, Table, Value, DATE_COLUMN};

/// Tag name of a row element.
pub const RECORD_TAG: &str = "Record";

/// Date layouts seen in the `DATE` column across datasets.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y"];

/// Parse a raw payload for one request window.
pub fn parse_xml(bytes: &[u8], window: &DateWindow) -> Result<Table> {
    let xml = bytes_to_string(bytes, &format!("payload for {window}"));
    parse_records(&xml, window)
}

/// Parse XML text into a table, one row per `<Record>`.
///
/// Zero records is only accepted for a single-day window; a multi-day window
/// without records means the export silently returned nothing.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use tennet_client::planner::DateWindow;
/// use tennet_client::xml::parse_records;
///
/// let day = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
/// let xml = "<Records><Record><DATE>2023-01-01</DATE><PTU>1</PTU></Record></Records>";
/// let table = parse_records(xml, &DateWindow::new(day, day)).unwrap();
///
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.rows()[0].date, Some(day));
/// ```
pub fn parse_records(xml: &str, window: &DateWindow) -> Result<Table> {
    let doc = Document::parse(xml)?;
    let mut table = Table::new();

    for record_node in find_descendants(doc.root_element(), RECORD_TAG) {
        let mut record = Record::new();

        for cell in element_children(record_node) {
            let column = get_tag_name(cell);
            let text = get_text(cell);

            if column == DATE_COLUMN && !text.is_empty() {
                record.date = Some(parse_date_value(&text)?);
            }

            table.add_column(column);
            record.insert(column, Value::infer(&text));
        }

        table.push(record);
    }

    if table.is_empty() && !window.is_single_day() {
        return Err(TennetError::EmptyPayload {
            start: window.start.to_string(),
            end: window.end.to_string(),
        });
    }

    tracing::debug!(
        window = %window,
        rows = table.len(),
        columns = table.columns().len(),
        "Parsed records"
    );

    Ok(table)
}

/// Parse a `DATE` cell into a calendar date.
///
/// Timestamps with a time-of-day part are truncated to their date.
pub fn parse_date_value(text: &str) -> Result<NaiveDate> {
    let text = text.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(date);
        }
    }

    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.date())
        .map_err(|_| TennetError::InvalidValue {
            column: DATE_COLUMN.to_string(),
            value: text.to_string(),
        })
}
