use std::collections::BTreeSet;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub const DEFAULT_MIME: &str = "application/octet-stream";

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

pub fn is_passthrough_uri(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://") || value.starts_with("data:")
}

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Splits repeated and comma separated flag values into a set, e.g.
/// `["NLP", "Generative AI,Predictive Analytics"]`.
pub fn parse_criteria_values(values: &[String]) -> Result<BTreeSet<String>, String> {
    let mut out = BTreeSet::new();
    for raw in values.iter() {
        for part in raw.split(',') {
            let item = part.trim();
            if item.is_empty() {
                return Err(format!("empty item in '{raw}'"));
            }
            out.insert(item.to_string());
        }
    }
    Ok(out)
}

pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
