use std::path::Path;
use std::sync::Arc;

use plist::{Dictionary, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::assets::{self, AssetResolver, FontDescriptors, Resolution};
use crate::catalog::{ActionKind, CatalogError, FilterCriteria};
use crate::runner::{Options, Runner, RunnerError};
use crate::signing::{SignedUrl, SigningError, UrlSigner};

struct StubSigner;

impl UrlSigner for StubSigner {
    fn sign(&self, blob: &str) -> Result<SignedUrl, SigningError> {
        Ok(SignedUrl {
            url: format!("https://acct.blob.core.windows.net/demos/{blob}?sv=stub"),
            expires_at: chrono::Utc::now(),
        })
    }
}

fn subresource(url: &str, mime: Option<&str>, data: &[u8]) -> Value {
    let mut d = Dictionary::new();
    d.insert("WebResourceURL".to_string(), Value::String(url.to_string()));
    if let Some(mime) = mime {
        d.insert(
            "WebResourceMIMEType".to_string(),
            Value::String(mime.to_string()),
        );
    }
    d.insert("WebResourceData".to_string(), Value::Data(data.to_vec()));
    Value::Dictionary(d)
}

fn write_archive(path: &Path, resources: Vec<Value>) {
    let mut root = Dictionary::new();
    root.insert("WebSubresources".to_string(), Value::Array(resources));
    Value::Dictionary(root).to_file_binary(path).unwrap();
}

/// Serves `body` as an SVG to every connection; returns the base URL.
async fn serve_svg(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: image/svg+xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    format!("http://{addr}")
}

fn icon_options(dir: &Path, contact_icon_url: String, search_icon_url: String) -> Options {
    Options {
        archive_path: dir.join("missing.webarchive"),
        catalog_path: dir.join("apps.json"),
        timeout_seconds: 5,
        contact_icon_url,
        search_icon_url,
        ..Options::default()
    }
}

#[test]
fn archive_on_disk_embeds_logo_and_light_font() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site.webarchive");
    write_archive(
        &path,
        vec![
            subresource(
                "https://www.ubs.com/etc/designs/fit/img/UBS_Logo_Semibold.svg",
                Some("image/svg+xml"),
                b"<svg/>",
            ),
            subresource(
                "https://www.ubs.com/fonts/FrutigerforUBSWeb-Lt.woff2",
                Some("application/octet-stream"),
                b"lt",
            ),
        ],
    );

    let resolver = AssetResolver::open(&path);
    assert_eq!(resolver.archive().len(), 2);

    let logo = resolver.resolve(&assets::logo_descriptor(assets::DEFAULT_LOGO_URL));
    assert_eq!(
        logo,
        Resolution::Embedded(crate::utils::data_uri("image/svg+xml", b"<svg/>"))
    );

    let hero = resolver.resolve(&assets::hero_descriptor(assets::DEFAULT_HERO_URL));
    assert_eq!(hero, Resolution::Remote(assets::DEFAULT_HERO_URL.to_string()));

    let fonts = resolver.resolve_fonts(&FontDescriptors::default());
    let faces = fonts.faces();
    assert_eq!(faces.len(), 2);
    assert_eq!((faces[0].weight, faces[1].weight), (300, 400));
    assert!(faces[0].src.starts_with("data:font/woff2;base64,"));
}

#[test]
fn missing_archive_uses_remote_fallbacks() {
    let resolver = AssetResolver::open(Path::new("/definitely/not/here.webarchive"));
    assert!(resolver.archive().is_empty());
    let logo = resolver
        .resolve_mandatory(&assets::logo_descriptor(assets::DEFAULT_LOGO_URL))
        .unwrap();
    assert_eq!(logo, assets::DEFAULT_LOGO_URL);
    assert!(resolver.resolve_fonts(&FontDescriptors::default()).css().is_empty());
}

#[tokio::test]
async fn startup_fails_when_mandatory_fallback_is_unusable() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Runner::new(Options {
        archive_path: dir.path().join("missing.webarchive"),
        catalog_path: dir.path().join("apps.json"),
        logo_fallback_url: String::new(),
        ..Options::default()
    })
    .unwrap();
    let err = runner.startup().await.unwrap_err();
    assert!(matches!(
        err,
        RunnerError::Asset {
            source: crate::assets::AssetError::MandatoryAsset { .. }
        }
    ));
}

#[tokio::test]
async fn render_view_filters_and_enriches_catalog() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("kyc.png"), b"png").unwrap();
    let catalog = r#"[
        {"title": "Risk Summarizer", "aiType": "NLP", "businessLine": "Investment Bank",
         "function": "Research", "status": "beta", "demoUrl": "risk.mp4",
         "appUrl": "https://apps.example/risk"},
        {"title": "KYC Assistant", "aiType": "Predictive Analytics",
         "businessLine": "Wealth Management", "function": "KYC & Risk",
         "image": "kyc.png", "docsUrl": "https://docs.example/kyc"}
    ]"#;
    let catalog_path = dir.path().join("apps.json");
    std::fs::write(&catalog_path, catalog).unwrap();

    let runner = Runner::new(Options {
        catalog_path,
        ..Options::default()
    })
    .unwrap()
    .with_signer(Arc::new(StubSigner));

    let all = runner.render_view(&FilterCriteria::default()).await.unwrap();
    assert_eq!(all.cards.len(), 2);
    assert!(all.warnings.is_empty());

    let risk = &all.cards[0];
    assert_eq!(risk.status_label, Some("Preview"));
    assert_eq!(risk.tags, vec!["Investment Bank", "Research"]);
    assert_eq!(risk.actions[1].kind, ActionKind::WatchDemo);
    assert!(risk.actions[1].href.ends_with("/demos/risk.mp4?sv=stub"));

    let kyc = &all.cards[1];
    assert_eq!(
        kyc.image.as_deref(),
        Some(crate::utils::data_uri("image/png", b"png").as_str())
    );

    let criteria = FilterCriteria {
        search: "kyc".to_string(),
        ..FilterCriteria::default()
    };
    let filtered = runner.render_view(&criteria).await.unwrap();
    assert_eq!(filtered.cards.len(), 1);
    assert_eq!(filtered.cards[0].title, "KYC Assistant");
}

#[tokio::test]
async fn unconfigured_signing_surfaces_warning() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_path = dir.path().join("apps.json");
    std::fs::write(&catalog_path, r#"[{"title": "Demo", "demoUrl": "demo.mp4"}]"#).unwrap();

    let runner = Runner::new(Options {
        catalog_path,
        ..Options::default()
    })
    .unwrap();
    let view = runner.render_view(&FilterCriteria::default()).await.unwrap();
    assert!(view.cards[0].actions.is_empty());
    assert_eq!(view.warnings.len(), 1);
    assert!(view.warnings[0].starts_with("Could not generate signed URL for demo: demo.mp4"));
}

#[tokio::test]
async fn malformed_catalog_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_path = dir.path().join("apps.json");
    std::fs::write(&catalog_path, "{ not json").unwrap();
    let runner = Runner::new(Options {
        catalog_path,
        ..Options::default()
    })
    .unwrap();
    let err = runner
        .render_view(&FilterCriteria::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RunnerError::Catalog {
            source: CatalogError::Parse { .. }
        }
    ));
}

#[tokio::test]
async fn rendered_page_carries_view_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_path = dir.path().join("apps.json");
    std::fs::write(&catalog_path, r#"[{"title": "Demo", "demoUrl": "demo.mp4"}]"#).unwrap();
    let runner = Runner::new(Options {
        catalog_path,
        ..Options::default()
    })
    .unwrap();
    let criteria = FilterCriteria::default();
    let view = runner.render_view(&criteria).await.unwrap();

    let assets = crate::assets::ResolvedAssets {
        logo: assets::DEFAULT_LOGO_URL.to_string(),
        hero: assets::DEFAULT_HERO_URL.to_string(),
        ..Default::default()
    };
    let html = String::from_utf8(crate::output::render(
        crate::output::OutputFormat::Html,
        &assets,
        &crate::page::PageContent::default(),
        &criteria,
        &view,
    ))
    .unwrap();
    assert!(html.contains("Could not generate signed URL for demo: demo.mp4"));
    assert!(html.contains("AI Application Marketplace"));
    assert!(!html.contains("Watch demo"));
}

#[tokio::test]
async fn search_icon_without_path_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let base = serve_svg(r#"<svg xmlns="http://www.w3.org/2000/svg"><circle r="4"/></svg>"#).await;
    let runner = Runner::new(icon_options(
        dir.path(),
        format!("{base}/contact.svg"),
        format!("{base}/defs.svg"),
    ))
    .unwrap();
    let err = runner.startup().await.unwrap_err();
    match err {
        RunnerError::Asset {
            source: crate::assets::AssetError::IconPathMissing { url },
        } => assert!(url.ends_with("/defs.svg")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_contact_icon_degrades_to_warning() {
    let dir = tempfile::tempdir().unwrap();
    let base = serve_svg(
        r#"<svg xmlns="http://www.w3.org/2000/svg"><symbol id="s"><path d="M1 1"/></symbol></svg>"#,
    )
    .await;
    let runner = Runner::new(icon_options(
        dir.path(),
        "http://127.0.0.1:1/contact.svg".to_string(),
        format!("{base}/defs.svg"),
    ))
    .unwrap();
    let startup = runner.startup().await.unwrap();
    assert!(startup.assets.contact_icon.is_empty());
    assert!(startup.assets.search_icon.starts_with("data:image/svg+xml;base64,"));
    assert_eq!(startup.assets.logo, assets::DEFAULT_LOGO_URL);
    assert_eq!(startup.warnings.len(), 1);
    assert!(startup.warnings[0].starts_with("Contact icon unavailable"));
}
