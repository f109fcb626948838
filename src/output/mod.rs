use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::assets::ResolvedAssets;
use crate::catalog::{CatalogView, EnrichedCard, FilterCriteria};
use crate::page::{self, PageContent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "html" | "htm" => Some(Self::Html),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    None
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetSource {
    Embedded,
    Remote,
    Missing,
}

impl AssetSource {
    pub fn of(uri: &str) -> Self {
        if uri.starts_with("data:") {
            Self::Embedded
        } else if uri.trim().is_empty() {
            Self::Missing
        } else {
            Self::Remote
        }
    }
}

/// Where each page asset came from, without the (large) payloads.
#[derive(Clone, Debug, Serialize)]
pub struct AssetSummary {
    pub logo: AssetSource,
    pub hero: AssetSource,
    pub contact_icon: AssetSource,
    pub search_icon: AssetSource,
    pub font_faces: usize,
}

impl AssetSummary {
    pub fn from_assets(assets: &ResolvedAssets) -> Self {
        Self {
            logo: AssetSource::of(&assets.logo),
            hero: AssetSource::of(&assets.hero),
            contact_icon: AssetSource::of(&assets.contact_icon),
            search_icon: AssetSource::of(&assets.search_icon),
            font_faces: assets.fonts.faces().len(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub criteria: &'a FilterCriteria,
    pub total: usize,
    pub assets: AssetSummary,
    pub cards: &'a [EnrichedCard],
    pub warnings: &'a [String],
}

pub fn render_json(
    assets: &ResolvedAssets,
    criteria: &FilterCriteria,
    view: &CatalogView,
) -> Vec<u8> {
    let report = JsonReport {
        generated_at: Utc::now(),
        criteria,
        total: view.cards.len(),
        assets: AssetSummary::from_assets(assets),
        cards: &view.cards,
        warnings: &view.warnings,
    };
    serde_json::to_vec_pretty(&report).unwrap_or_else(|_| b"{}\n".to_vec())
}

pub fn render_html(
    assets: &ResolvedAssets,
    content: &PageContent,
    criteria: &FilterCriteria,
    view: &CatalogView,
) -> Vec<u8> {
    page::render_page(assets, content, criteria, view).into_bytes()
}

pub fn render(
    format: OutputFormat,
    assets: &ResolvedAssets,
    content: &PageContent,
    criteria: &FilterCriteria,
    view: &CatalogView,
) -> Vec<u8> {
    match format {
        OutputFormat::Html => render_html(assets, content, criteria, view),
        OutputFormat::Json => render_json(assets, criteria, view),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing_and_inference() {
        assert_eq!(OutputFormat::parse(" HTML "), Some(OutputFormat::Html));
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("xml"), None);
        assert_eq!(infer_format_from_path("out/page.htm"), Some(OutputFormat::Html));
        assert_eq!(infer_format_from_path("view.JSON"), Some(OutputFormat::Json));
        assert_eq!(infer_format_from_path("view.txt"), None);
    }

    #[test]
    fn json_report_summarizes_assets() {
        let assets = ResolvedAssets {
            logo: "data:image/svg+xml;base64,AA==".to_string(),
            hero: "https://cdn.example/hero.jpg".to_string(),
            ..ResolvedAssets::default()
        };
        let view = CatalogView {
            cards: Vec::new(),
            warnings: vec!["w".to_string()],
        };
        let bytes = render_json(&assets, &FilterCriteria::default(), &view);
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["assets"]["logo"], "embedded");
        assert_eq!(value["assets"]["hero"], "remote");
        assert_eq!(value["assets"]["search_icon"], "missing");
        assert_eq!(value["assets"]["font_faces"], 0);
        assert_eq!(value["total"], 0);
        assert_eq!(value["warnings"][0], "w");
    }
}
