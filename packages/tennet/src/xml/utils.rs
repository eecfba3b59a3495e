//! XML utility functions for navigating and extracting data from DOM trees.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use tennet_client::xml::get_tag_name;
///
/// let xml = r#"<Records><Record><PTU>1</PTU></Record></Records>"#;
/// let doc = Document::parse(xml).unwrap();
/// let record = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(record), "Record");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Check if a node is an element with a specific tag name.
pub fn has_tag(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && get_tag_name(node) == tag
}

/// Find all descendant elements with the given tag name, in document order.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use tennet_client::xml::find_descendants;
///
/// let xml = r#"<root><Record/><group><Record/></group><other/></root>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// assert_eq!(find_descendants(doc.root_element(), "Record").count(), 2);
/// ```
pub fn find_descendants<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants().filter(move |n| has_tag(*n, tag))
}

/// Get all element children of a node.
///
/// Text nodes, comments and processing instructions are skipped.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Get the text content of a node, trimmed.
///
/// Returns an empty string for elements without text.
pub fn get_text(node: Node<'_, '_>) -> String {
    node.text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Convert downloaded bytes to a string, replacing invalid UTF-8.
///
/// Logs a warning when replacement was necessary.
pub fn bytes_to_string(bytes: &[u8], context: &str) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(e) => {
            tracing::warn!(
                context,
                error = %e,
                "Payload is not valid UTF-8, replacing invalid sequences"
            );
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}
