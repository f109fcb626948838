use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task;
use tokio::time::Instant;

use crate::assets::{
    self, icons, AssetError, AssetResolver, FontDescriptors, ResolvedAssets, WebArchive,
};
use crate::catalog::{self, CatalogError, CatalogView, EnrichContext, FilterCriteria};
use crate::signing::{self, StorageCredentials, UrlSigner};

pub const DEFAULT_ARCHIVE_PATH: &str = "UBS website.webarchive";
pub const DEFAULT_CATALOG_PATH: &str = "apps.json";

#[derive(Clone, Debug)]
pub struct Options {
    pub archive_path: PathBuf,
    pub catalog_path: PathBuf,
    pub timeout_seconds: usize,
    pub logo_fallback_url: String,
    pub hero_fallback_url: String,
    pub contact_icon_url: String,
    pub search_icon_url: String,
    pub credentials: StorageCredentials,
    pub link_validity_seconds: i64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            archive_path: PathBuf::from(DEFAULT_ARCHIVE_PATH),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            timeout_seconds: 10,
            logo_fallback_url: assets::DEFAULT_LOGO_URL.to_string(),
            hero_fallback_url: assets::DEFAULT_HERO_URL.to_string(),
            contact_icon_url: icons::DEFAULT_CONTACT_ICON_URL.to_string(),
            search_icon_url: icons::DEFAULT_SEARCH_ICON_URL.to_string(),
            credentials: StorageCredentials::default(),
            link_validity_seconds: signing::DEFAULT_VALIDITY_SECS,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid timeout {value}, expected positive integer")]
    InvalidTimeout { value: usize },

    #[error("invalid link validity {value}s, expected positive integer within range")]
    InvalidLinkValidity { value: i64 },

    #[error("catalog path is empty")]
    MissingCatalog,

    #[error("{source}")]
    Asset {
        #[source]
        source: AssetError,
    },

    #[error("{source}")]
    Catalog {
        #[source]
        source: CatalogError,
    },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("task join failed: {source}")]
    TaskJoin {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl From<AssetError> for RunnerError {
    fn from(source: AssetError) -> Self {
        RunnerError::Asset { source }
    }
}

impl From<CatalogError> for RunnerError {
    fn from(source: CatalogError) -> Self {
        RunnerError::Catalog { source }
    }
}

#[derive(Clone, Debug)]
pub struct StartupResult {
    pub started_at: Instant,
    pub elapsed: Duration,
    pub assets: ResolvedAssets,
    pub archive_resources: usize,
    pub warnings: Vec<String>,
}

#[derive(Clone)]
pub struct Runner {
    options: Options,
    signer: Arc<dyn UrlSigner>,
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        if options.timeout_seconds == 0 {
            return Err(RunnerError::InvalidTimeout {
                value: options.timeout_seconds,
            });
        }
        let validity = Some(options.link_validity_seconds)
            .filter(|secs| *secs > 0)
            .and_then(chrono::Duration::try_seconds)
            .ok_or(RunnerError::InvalidLinkValidity {
                value: options.link_validity_seconds,
            })?;
        if options.catalog_path.as_os_str().is_empty() {
            return Err(RunnerError::MissingCatalog);
        }
        let signer: Arc<dyn UrlSigner> = Arc::from(signing::signer_from_credentials(
            &options.credentials,
            validity,
        ));
        Ok(Self { options, signer })
    }

    /// Replaces the signer built from the configured credentials.
    pub fn with_signer(mut self, signer: Arc<dyn UrlSigner>) -> Self {
        self.signer = signer;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Resolves every page asset once: archive lookups first, then the two
    /// remote icons fetched concurrently.
    pub async fn startup(&self) -> Result<StartupResult, RunnerError> {
        let started_at = Instant::now();
        let mut warnings = Vec::new();

        let archive_path = self.options.archive_path.clone();
        let archive = task::spawn_blocking(move || WebArchive::open(&archive_path))
            .await
            .map_err(|e| RunnerError::TaskJoin { source: e })?;
        let archive_resources = archive.len();
        if archive.is_empty() {
            tracing::info!(path = %self.options.archive_path.display(), "archive empty or unreadable, using remote fallbacks");
        }

        let resolver = AssetResolver::new(archive);
        let logo =
            resolver.resolve_mandatory(&assets::logo_descriptor(&self.options.logo_fallback_url))?;
        let hero =
            resolver.resolve_mandatory(&assets::hero_descriptor(&self.options.hero_fallback_url))?;
        let fonts = resolver.resolve_fonts(&FontDescriptors::default());
        tracing::info!(faces = fonts.faces().len(), "fonts resolved");

        let client = build_http_client(self.options.timeout_seconds)?;
        let (contact, search) = futures::join!(
            icons::fetch_contact_icon(&client, &self.options.contact_icon_url),
            icons::fetch_search_icon(&client, &self.options.search_icon_url),
        );

        let contact_icon = match contact {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!(error = %e, "contact icon unavailable");
                warnings.push(format!("Contact icon unavailable: {e}"));
                String::new()
            }
        };
        let search_icon = search?;

        Ok(StartupResult {
            started_at,
            elapsed: started_at.elapsed(),
            assets: ResolvedAssets {
                logo,
                hero,
                contact_icon,
                search_icon,
                fonts,
            },
            archive_resources,
            warnings,
        })
    }

    /// Reads the catalog and produces the enriched view for one criteria set.
    /// Demo links are signed fresh on every call.
    pub async fn render_view(&self, criteria: &FilterCriteria) -> Result<CatalogView, RunnerError> {
        let path = self.options.catalog_path.clone();
        let criteria = criteria.clone();
        let signer = Arc::clone(&self.signer);

        let view = task::spawn_blocking(move || -> Result<CatalogView, CatalogError> {
            let cards = catalog::load_catalog(&path)?;
            let ctx = EnrichContext {
                signer: signer.as_ref(),
                image_root: path.parent(),
            };
            Ok(catalog::filter_and_enrich(&cards, &criteria, &ctx))
        })
        .await
        .map_err(|e| RunnerError::TaskJoin { source: e })??;

        tracing::debug!(
            cards = view.cards.len(),
            warnings = view.warnings.len(),
            "view rendered"
        );
        Ok(view)
    }
}

fn build_http_client(timeout_seconds: usize) -> Result<reqwest::Client, RunnerError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        )),
    );

    let timeout = Duration::from_secs(timeout_seconds.try_into().unwrap_or(10));
    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| RunnerError::HttpClientBuild { source: e })
}
