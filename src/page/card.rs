use crate::catalog::{ActionKind, CardAction, EnrichedCard};
use crate::utils::escape_html;

const CHEVRON: &str = r#"<svg class="mk-chev" viewBox="0 0 16 16" aria-hidden="true" focusable="false"><path d="M5 3l5 5-5 5"></path></svg>"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardVariant {
    /// Featured side-by-side layout.
    Row { clamp_width: bool },
    /// Grid tile, image on top.
    Tile,
    /// Compact featured card with a kicker line.
    Feature,
}

impl CardVariant {
    pub fn parse(value: &str, clamp_width: bool) -> Self {
        match value.trim().to_lowercase().as_str() {
            "row" => Self::Row { clamp_width },
            "feature" => Self::Feature,
            _ => Self::Tile,
        }
    }

    fn classes(self) -> String {
        match self {
            Self::Row { clamp_width: true } => "mk-card mk-card--row mk-card--clamp".to_string(),
            Self::Row { clamp_width: false } => "mk-card mk-card--row".to_string(),
            Self::Tile => "mk-card mk-card--tile".to_string(),
            Self::Feature => "mk-card mk-card--feature".to_string(),
        }
    }
}

fn render_action(action: &CardAction) -> String {
    let href = escape_html(&action.href);
    match action.kind {
        ActionKind::OpenApp => format!(
            "<a href='{href}' target='_blank' rel='noopener noreferrer' class='mk-btn-primary'>{}</a>",
            action.kind.label()
        ),
        ActionKind::WatchDemo => format!("<a href='{href}'>{} {CHEVRON}</a>", action.kind.label()),
        ActionKind::ReadDocs => format!(
            "<a href='{href}' target='_blank' rel='noopener noreferrer'>{} {CHEVRON}</a>",
            action.kind.label()
        ),
    }
}

pub fn render_card(card: &EnrichedCard, variant: CardVariant, top_margin_px: u32) -> String {
    let title = escape_html(&card.title);
    let desc = escape_html(&card.description);
    let alt = escape_html(&card.alt);
    let img = escape_html(card.image.as_deref().unwrap_or_default());

    let status = card
        .status_label
        .map(|s| format!("<span class='mk-card__status'>{s}</span>"))
        .unwrap_or_default();

    let tags = if card.tags.is_empty() {
        String::new()
    } else {
        let spans: String = card
            .tags
            .iter()
            .map(|t| format!("<span class='mk-card__tag'>{}</span>", escape_html(t)))
            .collect();
        format!("<div class='mk-card__tags'>{spans}</div>")
    };

    let actions = if card.actions.is_empty() {
        String::new()
    } else {
        let links: String = card.actions.iter().map(render_action).collect();
        format!("<div class='mk-card__actions'>{links}</div>")
    };

    let kicker = if variant == CardVariant::Feature {
        "<div class='mk-feature-kicker'>Featured application</div>"
    } else {
        ""
    };

    format!(
        r#"<div class="{classes}" style="margin-top:{top_margin_px}px">
  <div class="mk-card__thumbwrap">
    <img src="{img}" alt="{alt}" class="mk-card__thumb"/>
    {status}
  </div>
  <div class="mk-card__body">
    {kicker}<h3 class="mk-card__title">{title}</h3>
    <p class="mk-card__desc">{desc}</p>
    {tags}
    {actions}
  </div>
</div>
"#,
        classes = variant.classes(),
    )
}

/// Lays cards out round-robin over `columns` columns, keeping input order
/// within each column.
pub fn render_grid(cards: &[EnrichedCard], columns: usize, variant: CardVariant) -> String {
    let columns = columns.max(1);
    let mut cols: Vec<String> = vec![String::new(); columns];
    for (i, card) in cards.iter().enumerate() {
        cols[i % columns].push_str(&render_card(card, variant, 16));
    }
    let inner: String = cols
        .into_iter()
        .map(|c| format!("<div class='mk-grid__col'>{c}</div>"))
        .collect();
    format!("<div class='mk-grid' style='--mk-cols:{columns}'>{inner}</div>")
}
