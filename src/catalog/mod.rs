pub mod image;

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::signing::UrlSigner;
use crate::utils;

pub const UNTITLED: &str = "Untitled application";
pub const PREVIEW_LABEL: &str = "Preview";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog is not a JSON array: {path}")]
    NotAnArray { path: String },
}

// Scalars of any JSON type are kept as text; nested values count as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// One marketplace entry as stored in the catalog document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppCard {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub alt: Option<String>,
    #[serde(default, alias = "aiType", deserialize_with = "lenient_string")]
    pub ai_type: Option<String>,
    #[serde(default, alias = "businessLine", deserialize_with = "lenient_string")]
    pub business_line: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub function: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, alias = "appUrl", deserialize_with = "lenient_string")]
    pub app_url: Option<String>,
    #[serde(default, alias = "demoUrl", deserialize_with = "lenient_string")]
    pub demo_url: Option<String>,
    #[serde(default, alias = "docsUrl", deserialize_with = "lenient_string")]
    pub docs_url: Option<String>,
}

impl AppCard {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }
}

pub fn parse_catalog(path: &str, contents: &str) -> Result<Vec<AppCard>, CatalogError> {
    let doc: Value = serde_json::from_str(contents).map_err(|e| CatalogError::Parse {
        path: path.to_string(),
        source: e,
    })?;
    let Value::Array(entries) = doc else {
        return Err(CatalogError::NotAnArray {
            path: path.to_string(),
        });
    };

    let mut cards = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            tracing::warn!(index = idx, "skipping catalog entry that is not an object");
            continue;
        }
        match serde_json::from_value::<AppCard>(entry) {
            Ok(card) => {
                if card.title.is_none() {
                    tracing::debug!(index = idx, "catalog entry has no title");
                }
                cards.push(card);
            }
            Err(e) => tracing::warn!(index = idx, error = %e, "skipping malformed catalog entry"),
        }
    }
    Ok(cards)
}

pub fn load_catalog(path: &Path) -> Result<Vec<AppCard>, CatalogError> {
    let label = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::Read {
        path: label.clone(),
        source: e,
    })?;
    parse_catalog(&label, &contents)
}

/// Per-view filter selection. Empty sets place no restriction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub search: String,
    pub ai_types: BTreeSet<String>,
    pub business_lines: BTreeSet<String>,
    pub functions: BTreeSet<String>,
}

fn allows(allowed: &BTreeSet<String>, value: Option<&str>) -> bool {
    if allowed.is_empty() {
        return true;
    }
    value.is_some_and(|v| allowed.contains(v))
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.ai_types.is_empty()
            && self.business_lines.is_empty()
            && self.functions.is_empty()
    }

    pub fn matches(&self, card: &AppCard) -> bool {
        if !self.search.is_empty()
            && !card
                .display_title()
                .to_lowercase()
                .contains(&self.search.to_lowercase())
        {
            return false;
        }
        allows(&self.ai_types, card.ai_type.as_deref())
            && allows(&self.business_lines, card.business_line.as_deref())
            && allows(&self.functions, card.function.as_deref())
    }
}

pub fn filter_cards<'a>(catalog: &'a [AppCard], criteria: &FilterCriteria) -> Vec<&'a AppCard> {
    catalog.iter().filter(|c| criteria.matches(c)).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    OpenApp,
    WatchDemo,
    ReadDocs,
}

impl ActionKind {
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::OpenApp => "Open app",
            ActionKind::WatchDemo => "Watch demo",
            ActionKind::ReadDocs => "Read docs",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardAction {
    pub kind: ActionKind,
    pub href: String,
}

/// A card with every display field derived, ready for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnrichedCard {
    pub title: String,
    pub description: String,
    pub alt: String,
    pub image: Option<String>,
    pub status_label: Option<&'static str>,
    pub tags: Vec<String>,
    pub actions: Vec<CardAction>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct CatalogView {
    pub cards: Vec<EnrichedCard>,
    pub warnings: Vec<String>,
}

pub struct EnrichContext<'a> {
    pub signer: &'a dyn UrlSigner,
    pub image_root: Option<&'a Path>,
}

pub fn normalize_status(raw: Option<&str>) -> Option<&'static str> {
    match raw.map(|s| s.trim().to_lowercase()).as_deref() {
        Some("beta") | Some("preview") => Some(PREVIEW_LABEL),
        _ => None,
    }
}

pub fn card_tags(card: &AppCard) -> Vec<String> {
    [card.business_line.as_deref(), card.function.as_deref()]
        .into_iter()
        .filter_map(utils::non_empty)
        .map(str::to_string)
        .collect()
}

pub fn enrich_card(card: &AppCard, ctx: &EnrichContext<'_>, warnings: &mut Vec<String>) -> EnrichedCard {
    let title = card.display_title().to_string();
    let mut actions = Vec::new();

    if let Some(app_url) = utils::non_empty(card.app_url.as_deref()) {
        actions.push(CardAction {
            kind: ActionKind::OpenApp,
            href: app_url.to_string(),
        });
    }
    if let Some(demo) = utils::non_empty(card.demo_url.as_deref()) {
        match ctx.signer.sign(demo) {
            Ok(signed) => actions.push(CardAction {
                kind: ActionKind::WatchDemo,
                href: signed.url,
            }),
            Err(e) => {
                tracing::warn!(card = %title, demo = demo, error = %e, "could not sign demo link");
                warnings.push(format!("Could not generate signed URL for demo: {demo} ({e})"));
            }
        }
    }
    if let Some(docs) = utils::non_empty(card.docs_url.as_deref()) {
        actions.push(CardAction {
            kind: ActionKind::ReadDocs,
            href: docs.to_string(),
        });
    }

    EnrichedCard {
        alt: card.alt.clone().unwrap_or_else(|| title.clone()),
        description: card.description.clone().unwrap_or_default(),
        image: card
            .image
            .as_deref()
            .and_then(|raw| image::resolve_image(raw, ctx.image_root)),
        status_label: normalize_status(card.status.as_deref()),
        tags: card_tags(card),
        actions,
        title,
    }
}

/// Filters the catalog in order and derives display fields for each match.
pub fn filter_and_enrich(
    catalog: &[AppCard],
    criteria: &FilterCriteria,
    ctx: &EnrichContext<'_>,
) -> CatalogView {
    let mut view = CatalogView::default();
    for card in filter_cards(catalog, criteria) {
        let enriched = enrich_card(card, ctx, &mut view.warnings);
        view.cards.push(enriched);
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::{DisabledSigner, SignedUrl, SigningError};

    struct StubSigner;

    impl UrlSigner for StubSigner {
        fn sign(&self, blob: &str) -> Result<SignedUrl, SigningError> {
            Ok(SignedUrl {
                url: format!("https://signed.example/{blob}?sig=abc"),
                expires_at: chrono::Utc::now(),
            })
        }
    }

    fn card(title: &str, ai_type: &str, business_line: &str, function: &str) -> AppCard {
        AppCard {
            title: Some(title.to_string()),
            ai_type: Some(ai_type.to_string()),
            business_line: Some(business_line.to_string()),
            function: Some(function.to_string()),
            ..AppCard::default()
        }
    }

    fn sample_catalog() -> Vec<AppCard> {
        vec![
            card("Risk Summarizer", "NLP", "Investment Bank", "Research"),
            card(
                "KYC Assistant",
                "Predictive Analytics",
                "Wealth Management",
                "KYC & Risk",
            ),
        ]
    }

    fn titles(cards: &[&AppCard]) -> Vec<String> {
        cards.iter().map(|c| c.display_title().to_string()).collect()
    }

    #[test]
    fn search_matches_title_case_insensitively() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            search: "kyc".to_string(),
            ..FilterCriteria::default()
        };
        assert_eq!(titles(&filter_cards(&catalog, &criteria)), vec!["KYC Assistant"]);
    }

    #[test]
    fn business_line_filter_selects_members() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            business_lines: BTreeSet::from(["Investment Bank".to_string()]),
            ..FilterCriteria::default()
        };
        assert_eq!(titles(&filter_cards(&catalog, &criteria)), vec!["Risk Summarizer"]);
    }

    #[test]
    fn empty_criteria_keeps_catalog_order() {
        let mut catalog = sample_catalog();
        catalog.push(card("Risk Summarizer", "NLP", "Investment Bank", "Research"));
        let all = filter_cards(&catalog, &FilterCriteria::default());
        assert_eq!(
            titles(&all),
            vec!["Risk Summarizer", "KYC Assistant", "Risk Summarizer"]
        );
    }

    #[test]
    fn missing_dimension_fails_only_active_filters() {
        let catalog = vec![AppCard {
            title: Some("Loose".to_string()),
            ..AppCard::default()
        }];
        assert_eq!(filter_cards(&catalog, &FilterCriteria::default()).len(), 1);
        let criteria = FilterCriteria {
            functions: BTreeSet::from(["Research".to_string()]),
            ..FilterCriteria::default()
        };
        assert!(filter_cards(&catalog, &criteria).is_empty());
    }

    #[test]
    fn filters_combine_with_and() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            ai_types: BTreeSet::from(["NLP".to_string()]),
            functions: BTreeSet::from(["KYC & Risk".to_string()]),
            ..FilterCriteria::default()
        };
        assert!(filter_cards(&catalog, &criteria).is_empty());
    }

    #[test]
    fn tags_are_business_line_then_function() {
        let mut c = card("A", "NLP", "Wealth Management", "");
        assert_eq!(card_tags(&c), vec!["Wealth Management"]);
        c.business_line = None;
        assert!(card_tags(&c).is_empty());
        c.function = Some("Research".to_string());
        c.business_line = Some("Asset Management".to_string());
        assert_eq!(card_tags(&c), vec!["Asset Management", "Research"]);
    }

    #[test]
    fn status_normalizes_to_preview() {
        assert_eq!(normalize_status(Some("Beta")), Some(PREVIEW_LABEL));
        assert_eq!(normalize_status(Some(" preview ")), Some(PREVIEW_LABEL));
        assert_eq!(normalize_status(Some("Live")), None);
        assert_eq!(normalize_status(None), None);
    }

    #[test]
    fn failed_signing_drops_demo_action() {
        let signer = DisabledSigner::new("missing storage configuration");
        let ctx = EnrichContext {
            signer: &signer,
            image_root: None,
        };
        let c = AppCard {
            title: Some("Demo only".to_string()),
            app_url: Some(String::new()),
            demo_url: Some("demo.mp4".to_string()),
            ..AppCard::default()
        };
        let view = filter_and_enrich(&[c], &FilterCriteria::default(), &ctx);
        assert!(view.cards[0].actions.is_empty());
        assert_eq!(view.warnings.len(), 1);
        assert!(view.warnings[0].contains("demo.mp4"));
    }

    #[test]
    fn actions_are_ordered_primary_demo_docs() {
        let ctx = EnrichContext {
            signer: &StubSigner,
            image_root: None,
        };
        let c = AppCard {
            docs_url: Some("https://docs.example/app".to_string()),
            demo_url: Some(" demo.mp4 ".to_string()),
            app_url: Some("https://apps.example/app".to_string()),
            ..AppCard::default()
        };
        let enriched = enrich_card(&c, &ctx, &mut Vec::new());
        let kinds: Vec<_> = enriched.actions.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![ActionKind::OpenApp, ActionKind::WatchDemo, ActionKind::ReadDocs]
        );
        assert_eq!(enriched.actions[1].href, "https://signed.example/demo.mp4?sig=abc");
    }

    #[test]
    fn missing_title_uses_placeholder() {
        let ctx = EnrichContext {
            signer: &StubSigner,
            image_root: None,
        };
        let enriched = enrich_card(&AppCard::default(), &ctx, &mut Vec::new());
        assert_eq!(enriched.title, UNTITLED);
        assert_eq!(enriched.alt, UNTITLED);
        assert!(enriched.image.is_none());
    }

    #[test]
    fn parse_catalog_tolerates_odd_entries() {
        let json = r#"[
            {"title": "Risk Summarizer", "ai_type": "NLP", "business_line": "Investment Bank"},
            42,
            {"description": "no title", "status": 1, "businessLine": "Wealth Management"}
        ]"#;
        let cards = parse_catalog("apps.json", json).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].display_title(), UNTITLED);
        assert_eq!(cards[1].status.as_deref(), Some("1"));
        assert_eq!(cards[1].business_line.as_deref(), Some("Wealth Management"));
    }

    #[test]
    fn parse_catalog_rejects_non_array() {
        assert!(matches!(
            parse_catalog("apps.json", r#"{"title": "x"}"#),
            Err(CatalogError::NotAnArray { .. })
        ));
    }
}
