//! Content-type selection for file responses
//!
//! Extension lookup against the configured table first; unknown extensions
//! fall back to a NUL-byte sniff over the leading bytes of the content.

use std::collections::HashMap;

/// How many leading bytes the binary sniff inspects
const SNIFF_WINDOW: usize = 8000;

/// Look up a MIME type by the file name's extension
pub fn lookup_mime_type<'a>(
    table: &'a HashMap<String, String>,
    name: &str,
) -> Option<&'a str> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    table.get(&ext.to_ascii_lowercase()).map(String::as_str)
}

/// Heuristic: content with a NUL byte in its leading window is binary
pub fn looks_binary(data: &[u8]) -> bool {
    let window = &data[..data.len().min(SNIFF_WINDOW)];
    window.contains(&0)
}

/// Content type for a file response: table lookup, then sniff fallback
pub fn content_type_for(table: &HashMap<String, String>, name: &str, data: &[u8]) -> String {
    if let Some(mime) = lookup_mime_type(table, name) {
        return mime.to_string();
    }
    if looks_binary(data) {
        "application/octet-stream".to_string()
    } else {
        "text/plain".to_string()
    }
}
