use std::sync::OnceLock;

use regex::Regex;

use super::AssetError;
use crate::utils;

pub const SVG_MIME: &str = "image/svg+xml";
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

pub const DEFAULT_CONTACT_ICON_URL: &str =
    "https://www.ubs.com/content/dam/wcms/icons/fixed/header-buttons/Support-contact.svg";
pub const DEFAULT_SEARCH_ICON_URL: &str =
    "https://www.ubs.com/etc/designs/fit/includes/shared_assets/img/icons/definitions/searchround.20062023.svg";

fn path_element_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<(?:svg:)?path\b[^>]*?(?:/>|>.*?</(?:svg:)?path\s*>)").ok())
        .as_ref()
}

fn markup_noise_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->|<!\[CDATA\[.*?\]\]>").ok())
        .as_ref()
}

/// First `<path>` element of an SVG document, without any `svg:` prefix.
/// Comments and CDATA sections are ignored, both for the path and for the
/// namespace declaration.
pub fn extract_first_path(document: &str) -> Option<String> {
    let document = markup_noise_regex()?.replace_all(document, "");
    if !document.contains(SVG_NAMESPACE) {
        return None;
    }
    let found = path_element_regex()?.find(&document)?;
    Some(found.as_str().replace("svg:path", "path"))
}

pub fn wrap_path(path: &str) -> String {
    format!("<svg xmlns='{SVG_NAMESPACE}' viewBox='0 0 24 24'>{path}</svg>")
}

/// Re-wraps the first path of an icon definitions document as a standalone
/// SVG data URI.
pub fn search_icon_from_definitions(url: &str, document: &str) -> Result<String, AssetError> {
    let path = extract_first_path(document).ok_or_else(|| AssetError::IconPathMissing {
        url: url.to_string(),
    })?;
    Ok(utils::data_uri(SVG_MIME, wrap_path(&path).as_bytes()))
}

async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, AssetError> {
    let resp = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| AssetError::IconFetch {
            url: url.to_string(),
            source: e,
        })?;
    let body = resp.bytes().await.map_err(|e| AssetError::IconFetch {
        url: url.to_string(),
        source: e,
    })?;
    Ok(body.to_vec())
}

pub async fn fetch_contact_icon(client: &reqwest::Client, url: &str) -> Result<String, AssetError> {
    let svg = fetch_bytes(client, url).await?;
    Ok(utils::data_uri(SVG_MIME, &svg))
}

pub async fn fetch_search_icon(client: &reqwest::Client, url: &str) -> Result<String, AssetError> {
    let body = fetch_bytes(client, url).await?;
    let document = String::from_utf8(body).map_err(|e| AssetError::IconEncoding {
        url: url.to_string(),
        source: e,
    })?;
    search_icon_from_definitions(url, &document)
}
