pub mod card;
pub mod style;

use serde::{Deserialize, Serialize};

use crate::assets::ResolvedAssets;
use crate::catalog::{CatalogView, FilterCriteria};
use crate::utils::escape_html;

pub use card::{render_card, render_grid, CardVariant};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Background {
    #[default]
    Grey,
    White,
}

impl Background {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "white" => Self::White,
            _ => Self::Grey,
        }
    }

    fn css(self) -> &'static str {
        match self {
            Self::Grey => "var(--mk-gray-light)",
            Self::White => "#ffffff",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionKeys {
    pub band: String,
    pub rail: String,
}

/// Hands out CSS scoping keys for one rendered page.
#[derive(Debug, Default)]
pub struct ScopeKeys {
    seq: usize,
}

impl ScopeKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys for the next section; a caller-supplied name is used verbatim as
    /// the base, otherwise `sect_<n>`.
    pub fn next(&mut self, name: Option<&str>) -> SectionKeys {
        self.seq += 1;
        let base = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None => format!("sect_{}", self.seq),
        };
        SectionKeys {
            band: format!("{base}_band"),
            rail: format!("{base}_rail"),
        }
    }
}

/// Full-width band with a centred content rail.
pub fn section(keys: &SectionKeys, background: Background, inner: &str) -> String {
    let SectionKeys { band, rail } = keys;
    format!(
        "<style>.mk-key-{band}{{ background:{bg}; padding:32px 0; }}\n\
.mk-key-{rail}{{ max-width:var(--grid-container-width); margin:0 auto; padding:0 var(--grid-container-spacing); box-sizing:content-box; }}</style>\n\
<div class=\"mk-key-{band}\"><div class=\"mk-key-{rail}\">\n{inner}</div></div>\n",
        bg = background.css(),
    )
}

pub fn section_spacer(size: Option<&str>) -> String {
    let style = size
        .map(|s| format!("--spacer-size:{};", escape_html(s)))
        .unwrap_or_default();
    format!("<div class='full-bleed section-spacer' style='{style}' aria-hidden='true'></div>\n")
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceItem {
    pub heading: String,
    pub body: String,
    pub link: String,
}

/// Static copy for the page sections around the marketplace.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageContent {
    pub page_title: String,
    pub hero_heading: String,
    pub hero_paragraph: String,
    pub hero_button: String,
    pub services_heading: String,
    pub services: Vec<ServiceItem>,
    pub marketplace_heading: String,
    pub marketplace_intro: String,
    pub listing_heading: String,
    pub governance_note: String,
    pub footer: String,
}

impl Default for PageContent {
    fn default() -> Self {
        let item = |heading: &str, body: &str, link: &str| ServiceItem {
            heading: heading.to_string(),
            body: body.to_string(),
            link: link.to_string(),
        };
        Self {
            page_title: "UBS – United Kingdom (PoC)".to_string(),
            hero_heading: "How can AI transform global wealth?".to_string(),
            hero_paragraph: "The world of AI is evolving rapidly. Discover how UBS leverages cutting-edge AI technologies to enhance your wealth management experience.".to_string(),
            hero_button: "Explore more".to_string(),
            services_heading: "The UBS Innovation Lab".to_string(),
            services: vec![
                item(
                    "Who we are",
                    "A dedicated team of technologists and financial experts driving innovation in wealth management.",
                    "More about us",
                ),
                item(
                    "What the Lab does",
                    "We explore emerging technologies like AI, blockchain, and data analytics to create next-gen financial solutions.",
                    "Our projects",
                ),
                item(
                    "How we work",
                    "Collaborating with startups, academia, and industry leaders to bring cutting-edge solutions to our clients.",
                    "Partnerships",
                ),
            ],
            marketplace_heading: "AI Application Marketplace".to_string(),
            marketplace_intro: "Discover innovative AI applications tailored for wealth management, asset management, and investment banking.".to_string(),
            listing_heading: "All Applications".to_string(),
            governance_note: "These applications provide insights and simulations and are governed by UBS Responsible AI principles.".to_string(),
            footer: "© UBS 1998 - 2025. All rights reserved.".to_string(),
        }
    }
}

fn render_header(assets: &ResolvedAssets) -> String {
    format!(
        r#"<header class="mk-header">
  <img class="mk-header__logo" src="{logo}" alt="Logo"/>
  <div class="mk-header__tools">
    <img src="{search}" alt="Search"/>
    <img src="{contact}" alt="Contact"/>
  </div>
</header>
"#,
        logo = escape_html(&assets.logo),
        search = escape_html(&assets.search_icon),
        contact = escape_html(&assets.contact_icon),
    )
}

fn render_hero(content: &PageContent) -> String {
    format!(
        r##"<section class="mk-hero">
  <div class="mk-hero__panel">
    <h1>{}</h1>
    <p>{}</p>
    <a class="mk-btn-primary" href="#marketplace">{}</a>
  </div>
</section>
"##,
        escape_html(&content.hero_heading),
        escape_html(&content.hero_paragraph),
        escape_html(&content.hero_button),
    )
}

fn render_services(content: &PageContent) -> String {
    let items: String = content
        .services
        .iter()
        .map(|s| {
            format!(
                "<div class='mk-services__item'><h3>{}</h3><p>{}</p><a href='#'>{}</a></div>",
                escape_html(&s.heading),
                escape_html(&s.body),
                escape_html(&s.link)
            )
        })
        .collect();
    format!(
        "<h2>{}</h2>\n<div class='mk-services'>{items}</div>\n",
        escape_html(&content.services_heading)
    )
}

/// One line per active filter dimension, e.g. `Business Line: Investment Bank`.
pub fn criteria_summary(criteria: &FilterCriteria) -> Vec<String> {
    let mut out = Vec::new();
    if !criteria.search.is_empty() {
        out.push(format!("Search: {}", criteria.search));
    }
    let dims = [
        ("AI Type", &criteria.ai_types),
        ("Business Line", &criteria.business_lines),
        ("Function", &criteria.functions),
    ];
    for (label, values) in dims {
        if !values.is_empty() {
            let joined = values.iter().cloned().collect::<Vec<_>>().join(", ");
            out.push(format!("{label}: {joined}"));
        }
    }
    out
}

fn render_toolbar(content: &PageContent, criteria: &FilterCriteria) -> String {
    let filters: String = criteria_summary(criteria)
        .iter()
        .map(|line| format!("<span class='mk-card__tag'>{}</span>", escape_html(line)))
        .collect();
    format!(
        "<h2 id='marketplace'>{}</h2>\n<p>{}</p>\n<div class='mk-card__tags'>{filters}</div>\n",
        escape_html(&content.marketplace_heading),
        escape_html(&content.marketplace_intro),
    )
}

fn render_listing(content: &PageContent, view: &CatalogView) -> String {
    let warnings: String = view
        .warnings
        .iter()
        .map(|w| format!("<div class='mk-warning' role='alert'>{}</div>\n", escape_html(w)))
        .collect();
    format!(
        "<h3>{}</h3>\n{warnings}{}\n{}<p>{}</p>\n",
        escape_html(&content.listing_heading),
        render_grid(&view.cards, 3, CardVariant::Tile),
        section_spacer(None),
        escape_html(&content.governance_note),
    )
}

/// Renders the complete page for one view.
pub fn render_page(
    assets: &ResolvedAssets,
    content: &PageContent,
    criteria: &FilterCriteria,
    view: &CatalogView,
) -> String {
    let mut keys = ScopeKeys::new();
    let css = style::page_css(&assets.fonts.css(), &assets.hero);

    let mut body = String::new();
    body.push_str(&render_header(assets));
    body.push_str(&render_hero(content));
    body.push_str(&section_spacer(None));
    body.push_str(&section(
        &keys.next(None),
        Background::White,
        &render_services(content),
    ));
    body.push_str(&section_spacer(None));
    body.push_str(&section(
        &keys.next(Some("mk_toolbar")),
        Background::Grey,
        &render_toolbar(content, criteria),
    ));
    body.push_str(&section(
        &keys.next(None),
        Background::White,
        &render_listing(content, view),
    ));
    body.push_str(&section_spacer(None));
    body.push_str(&format!(
        "<footer class=\"mk-footer\">{}</footer>\n",
        escape_html(&content.footer)
    ));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1"/>
<title>{title}</title>
<style>
{css}
</style>
</head>
<body>
{body}</body>
</html>
"#,
        title = escape_html(&content.page_title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EnrichedCard;

    #[test]
    fn scope_keys_count_per_context() {
        let mut keys = ScopeKeys::new();
        assert_eq!(keys.next(None).band, "sect_1_band");
        assert_eq!(keys.next(Some("toolbar")).rail, "toolbar_rail");
        assert_eq!(keys.next(None).band, "sect_3_band");

        let mut fresh = ScopeKeys::new();
        assert_eq!(fresh.next(None).band, "sect_1_band");
    }

    #[test]
    fn section_uses_background_and_keys() {
        let mut keys = ScopeKeys::new();
        let html = section(&keys.next(Some("x")), Background::parse("grey"), "<p>hi</p>");
        assert!(html.contains(".mk-key-x_band{ background:var(--mk-gray-light);"));
        assert!(html.contains("<div class=\"mk-key-x_rail\">"));
        let white = section(&keys.next(None), Background::parse("WHITE"), "");
        assert!(white.contains("background:#ffffff"));
    }

    #[test]
    fn spacer_carries_size() {
        assert!(section_spacer(Some("24px")).contains("--spacer-size:24px;"));
        assert!(section_spacer(None).contains("style=''"));
    }

    #[test]
    fn criteria_summary_lists_active_dimensions() {
        let criteria = FilterCriteria {
            search: "kyc".to_string(),
            functions: ["Research".to_string(), "Advisory".to_string()]
                .into_iter()
                .collect(),
            ..FilterCriteria::default()
        };
        assert_eq!(
            criteria_summary(&criteria),
            vec!["Search: kyc", "Function: Advisory, Research"]
        );
    }

    #[test]
    fn page_embeds_assets_warnings_and_cards() {
        let assets = ResolvedAssets {
            logo: "data:image/svg+xml;base64,PHN2Zy8+".to_string(),
            hero: "https://cdn.example/hero.jpg".to_string(),
            contact_icon: "data:image/svg+xml;base64,Yw==".to_string(),
            search_icon: "data:image/svg+xml;base64,cw==".to_string(),
            fonts: Default::default(),
        };
        let view = CatalogView {
            cards: vec![EnrichedCard {
                title: "Risk Summarizer".to_string(),
                description: String::new(),
                alt: "Risk Summarizer".to_string(),
                image: None,
                status_label: None,
                tags: vec![],
                actions: vec![],
            }],
            warnings: vec!["Could not generate signed URL for demo: d.mp4".to_string()],
        };
        let html = render_page(&assets, &PageContent::default(), &FilterCriteria::default(), &view);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("data:image/svg+xml;base64,PHN2Zy8+"));
        assert!(html.contains("url('https://cdn.example/hero.jpg')"));
        assert!(html.contains("Risk Summarizer"));
        assert!(html.contains("role='alert'"));
        assert!(html.contains("mk-key-mk_toolbar_band"));
    }

    #[test]
    fn hero_button_jumps_to_marketplace() {
        let content = PageContent {
            hero_button: "Go <now>".to_string(),
            ..PageContent::default()
        };
        let hero = render_hero(&content);
        assert!(hero.contains(r##"<a class="mk-btn-primary" href="#marketplace">Go &lt;now&gt;</a>"##));
        assert!(hero.trim_end().ends_with("</section>"));

        let html = render_page(
            &ResolvedAssets::default(),
            &content,
            &FilterCriteria::default(),
            &CatalogView::default(),
        );
        assert!(html.contains(r##"href="#marketplace""##));
        assert!(html.contains("<h2 id='marketplace'>"));
    }
}
