//! XML helpers and the `<Record>` payload parser.

mod parser;
mod utils;

pub use parser::{parse_date_value, parse_records, parse_xml, RECORD_TAG};
pub use utils::{
    bytes_to_string, element_children, find_descendants, get_tag_name, get_text, has_tag,
};
