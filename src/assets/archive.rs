use std::path::Path;

use plist::Value;

use crate::utils;

/// One embedded sub-resource of a saved web archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subresource {
    pub url: String,
    pub mime: Option<String>,
    pub data: Vec<u8>,
}

/// An ordered token query against sub-resource URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveLookup {
    pub tokens: Vec<String>,
    pub mime_override: Option<String>,
}

impl ArchiveLookup {
    pub fn new(tokens: &[&str]) -> Self {
        Self {
            tokens: tokens.iter().map(|t| t.to_lowercase()).collect(),
            mime_override: None,
        }
    }

    pub fn with_mime(mut self, mime: &str) -> Self {
        self.mime_override = Some(mime.to_string());
        self
    }

    fn matches(&self, url: &str) -> bool {
        let url = url.to_lowercase();
        self.tokens.iter().all(|t| url.contains(t.as_str()))
    }
}

/// The parsed sub-resource list of a `.webarchive` property list.
///
/// A missing or unreadable archive is represented as an empty archive, so
/// every lookup against it is a plain miss.
#[derive(Clone, Debug, Default)]
pub struct WebArchive {
    resources: Vec<Subresource>,
}

impl WebArchive {
    pub fn open(path: &Path) -> Self {
        match Value::from_file(path) {
            Ok(value) => {
                let archive = Self::from_value(&value);
                tracing::debug!(
                    path = %path.display(),
                    resources = archive.resources.len(),
                    "loaded web archive"
                );
                archive
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "web archive unavailable");
                Self::default()
            }
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let entries = value
            .as_dictionary()
            .and_then(|d| d.get("WebSubresources"))
            .and_then(Value::as_array);
        let resources = match entries {
            Some(entries) => entries
                .iter()
                .filter_map(Value::as_dictionary)
                .map(|d| Subresource {
                    url: d
                        .get("WebResourceURL")
                        .and_then(Value::as_string)
                        .unwrap_or_default()
                        .to_string(),
                    mime: d
                        .get("WebResourceMIMEType")
                        .and_then(Value::as_string)
                        .map(str::to_string),
                    data: d
                        .get("WebResourceData")
                        .and_then(Value::as_data)
                        .map(<[u8]>::to_vec)
                        .unwrap_or_default(),
                })
                .collect(),
            None => Vec::new(),
        };
        Self { resources }
    }

    pub fn from_resources(resources: Vec<Subresource>) -> Self {
        Self { resources }
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// First sub-resource, in stored order, whose URL contains every token.
    pub fn find(&self, lookup: &ArchiveLookup) -> Option<&Subresource> {
        self.resources.iter().find(|r| lookup.matches(&r.url))
    }

    pub fn find_data_uri(&self, lookup: &ArchiveLookup) -> Option<String> {
        let resource = self.find(lookup)?;
        let mime = lookup
            .mime_override
            .as_deref()
            .or(resource.mime.as_deref())
            .unwrap_or(utils::DEFAULT_MIME);
        Some(utils::data_uri(mime, &resource.data))
    }
}
