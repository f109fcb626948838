pub mod archive;
pub mod icons;

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

pub use archive::{ArchiveLookup, Subresource, WebArchive};

pub const FONT_WOFF2: &str = "font/woff2";
pub const TEXT_FONT_FAMILY: &str = "FrutigerforUBSWeb";
pub const ICON_FONT_FAMILY: &str = "ubs-icons";

pub const DEFAULT_LOGO_URL: &str = "https://www.ubs.com/etc/designs/fit/img/UBS_Logo_Semibold.svg";
pub const DEFAULT_HERO_URL: &str = "https://www.ubs.com/content/homepage/uk/en/new-promotions/gwr2025/jcr:content/promotion/image-l.3840.jpg/1750249353973.jpg";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to fetch icon: {url}: {source}")]
    IconFetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("icon document is not valid UTF-8: {url}: {source}")]
    IconEncoding {
        url: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("no svg path element found in icon definitions: {url}")]
    IconPathMissing { url: String },

    #[error("mandatory asset '{name}' could not be resolved (fallback url: '{fallback}')")]
    MandatoryAsset { name: String, fallback: String },
}

/// What a descriptor falls back to once every archive lookup missed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetFallback {
    /// Mandatory asset: link the remote copy instead of embedding it.
    Url(String),
    /// Optional asset: leave it out.
    Omit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetDescriptor {
    pub name: String,
    /// Primary lookup first, then the fallback chain, in order.
    pub lookups: Vec<ArchiveLookup>,
    pub fallback: AssetFallback,
}

impl AssetDescriptor {
    pub fn new(name: &str, lookups: Vec<ArchiveLookup>, fallback: AssetFallback) -> Self {
        Self {
            name: name.to_string(),
            lookups,
            fallback,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "uri", rename_all = "snake_case")]
pub enum Resolution {
    Embedded(String),
    Remote(String),
    Missing,
}

impl Resolution {
    pub fn uri(&self) -> Option<&str> {
        match self {
            Resolution::Embedded(uri) | Resolution::Remote(uri) => Some(uri.as_str()),
            Resolution::Missing => None,
        }
    }
}

/// Runs each strategy in order and returns the first `Some`.
pub fn first_success<T, I, F>(strategies: I) -> Option<T>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Option<T>,
{
    strategies.into_iter().find_map(|strategy| strategy())
}

pub struct AssetResolver {
    archive: WebArchive,
}

impl AssetResolver {
    pub fn new(archive: WebArchive) -> Self {
        Self { archive }
    }

    pub fn open(path: &Path) -> Self {
        Self::new(WebArchive::open(path))
    }

    pub fn archive(&self) -> &WebArchive {
        &self.archive
    }

    pub fn resolve(&self, descriptor: &AssetDescriptor) -> Resolution {
        let embedded = first_success(descriptor.lookups.iter().map(|lookup| {
            move || {
                let found = self.archive.find_data_uri(lookup);
                if found.is_none() {
                    tracing::debug!(asset = %descriptor.name, tokens = ?lookup.tokens, "archive miss");
                }
                found
            }
        }));
        match (embedded, &descriptor.fallback) {
            (Some(uri), _) => {
                tracing::debug!(asset = %descriptor.name, "embedded from archive");
                Resolution::Embedded(uri)
            }
            (None, AssetFallback::Url(url)) => {
                tracing::info!(asset = %descriptor.name, url = %url, "using remote fallback");
                Resolution::Remote(url.clone())
            }
            (None, AssetFallback::Omit) => Resolution::Missing,
        }
    }

    /// Resolves a mandatory descriptor, failing when neither the archive nor
    /// its fallback URL yields a usable reference.
    pub fn resolve_mandatory(&self, descriptor: &AssetDescriptor) -> Result<String, AssetError> {
        let fallback = match &descriptor.fallback {
            AssetFallback::Url(url) => url.clone(),
            AssetFallback::Omit => String::new(),
        };
        match self.resolve(descriptor) {
            Resolution::Embedded(uri) => Ok(uri),
            Resolution::Remote(url) if reqwest::Url::parse(&url).is_ok() => Ok(url),
            _ => Err(AssetError::MandatoryAsset {
                name: descriptor.name.clone(),
                fallback,
            }),
        }
    }

    pub fn resolve_fonts(&self, descriptors: &FontDescriptors) -> FontSet {
        let pick = |d: &AssetDescriptor| self.resolve(d).uri().map(str::to_string);
        FontSet {
            light: pick(&descriptors.light),
            regular: pick(&descriptors.regular),
            medium: pick(&descriptors.medium),
            icons: pick(&descriptors.icons),
        }
    }
}

pub fn logo_descriptor(fallback_url: &str) -> AssetDescriptor {
    AssetDescriptor::new(
        "logo",
        vec![ArchiveLookup::new(&["ubs_", "logo", "semibold", ".svg"])],
        AssetFallback::Url(fallback_url.to_string()),
    )
}

pub fn hero_descriptor(fallback_url: &str) -> AssetDescriptor {
    AssetDescriptor::new(
        "hero",
        vec![ArchiveLookup::new(&["promotion", "image-l", ".jpg"])],
        AssetFallback::Url(fallback_url.to_string()),
    )
}

fn font_lookups(variants: &[&str]) -> Vec<ArchiveLookup> {
    variants
        .iter()
        .map(|v| ArchiveLookup::new(&["frutiger", *v, ".woff2"]).with_mime(FONT_WOFF2))
        .collect()
}

#[derive(Clone, Debug)]
pub struct FontDescriptors {
    pub light: AssetDescriptor,
    pub regular: AssetDescriptor,
    pub medium: AssetDescriptor,
    pub icons: AssetDescriptor,
}

impl Default for FontDescriptors {
    fn default() -> Self {
        Self {
            light: AssetDescriptor::new(
                "font-light",
                font_lookups(&["-lt", "light"]),
                AssetFallback::Omit,
            ),
            regular: AssetDescriptor::new(
                "font-regular",
                font_lookups(&["-rg", "regular", "roman"]),
                AssetFallback::Omit,
            ),
            medium: AssetDescriptor::new(
                "font-medium",
                font_lookups(&["-md", "medium"]),
                AssetFallback::Omit,
            ),
            icons: AssetDescriptor::new(
                "font-icons",
                vec![ArchiveLookup::new(&["ubs-homepagev3-font-icons", ".woff2"])
                    .with_mime(FONT_WOFF2)],
                AssetFallback::Omit,
            ),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FontSet {
    pub light: Option<String>,
    pub regular: Option<String>,
    pub medium: Option<String>,
    pub icons: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FontFace {
    pub family: &'static str,
    pub weight: u16,
    pub display: &'static str,
    pub src: String,
}

impl FontFace {
    fn text(weight: u16, src: &str) -> Self {
        Self {
            family: TEXT_FONT_FAMILY,
            weight,
            display: "swap",
            src: src.to_string(),
        }
    }

    pub fn to_css(&self) -> String {
        format!(
            "@font-face{{font-family:'{}';font-style:normal;font-weight:{};font-display:{};src:url({}) format('woff2');}}",
            self.family, self.weight, self.display, self.src
        )
    }
}

impl FontSet {
    /// Font faces in emission order: light, regular, medium, light aliased to
    /// 400 when regular is missing, then the icon font.
    pub fn faces(&self) -> Vec<FontFace> {
        let mut faces = Vec::new();
        if let Some(src) = self.light.as_deref() {
            faces.push(FontFace::text(300, src));
        }
        if let Some(src) = self.regular.as_deref() {
            faces.push(FontFace::text(400, src));
        }
        if let Some(src) = self.medium.as_deref() {
            faces.push(FontFace::text(500, src));
        }
        if let (Some(src), None) = (self.light.as_deref(), self.regular.as_deref()) {
            faces.push(FontFace::text(400, src));
        }
        if let Some(src) = self.icons.as_deref() {
            faces.push(FontFace {
                family: ICON_FONT_FAMILY,
                weight: 300,
                display: "block",
                src: src.to_string(),
            });
        }
        faces
    }

    pub fn css(&self) -> String {
        self.faces()
            .iter()
            .map(FontFace::to_css)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Every asset the page needs, resolved once at startup.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ResolvedAssets {
    pub logo: String,
    pub hero: String,
    pub contact_icon: String,
    pub search_icon: String,
    pub fonts: FontSet,
}
