use std::path::{Path, PathBuf};

use crate::utils;

pub const DEFAULT_IMAGE_MIME: &str = "image/png";

fn local_candidate(raw: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = PathBuf::from(raw);
    match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path,
    }
}

/// Resolves a card image reference to something an `<img src>` can use.
///
/// Absolute URLs and data URIs pass through untouched, existing local files
/// are inlined as data URIs, anything else resolves to `None`. Relative paths
/// are looked up under `base_dir` when one is given.
pub fn resolve_image(raw: &str, base_dir: Option<&Path>) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if utils::is_passthrough_uri(raw) {
        return Some(raw.to_string());
    }

    let path = local_candidate(raw, base_dir);
    if !path.is_file() {
        tracing::debug!(image = raw, "card image not found");
        return None;
    }
    match std::fs::read(&path) {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&path)
                .first_raw()
                .unwrap_or(DEFAULT_IMAGE_MIME);
            Some(utils::data_uri(mime, &bytes))
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "failed to read card image");
            None
        }
    }
}
