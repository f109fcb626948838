use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(alias = "webarchive")]
    pub archive: Option<String>,
    #[serde(alias = "apps")]
    pub catalog: Option<String>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub timeout: Option<usize>,
    pub link_validity: Option<i64>,
    pub search: Option<String>,
    pub ai_types: Option<Vec<String>>,
    pub business_lines: Option<Vec<String>>,
    pub functions: Option<Vec<String>>,
    pub storage_account: Option<String>,
    pub storage_key: Option<String>,
    pub storage_container: Option<String>,
    pub logo_fallback_url: Option<String>,
    pub hero_fallback_url: Option<String>,
    pub contact_icon_url: Option<String>,
    pub search_icon_url: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".showcase").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn parse_config(contents: &str, path: &Path) -> Result<ConfigFile, String> {
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str::<ConfigFile>(contents)
        .map_err(|e| format!("failed to parse config '{}': {e}", path.display()))
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents, path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# Showcase config
#
# Location (default):
#   ~/.showcase/config.yml

# Input
archive: "./UBS website.webarchive"
catalog: ./apps.json

# Output (optional, stdout when unset)
# output: ./showcase.html
# output_format: html

# Remote fetches
timeout: 10
# logo_fallback_url: https://www.ubs.com/etc/designs/fit/img/UBS_Logo_Semibold.svg
# hero_fallback_url: https://cdn.example/hero.jpg
# contact_icon_url: https://cdn.example/contact.svg
# search_icon_url: https://cdn.example/icons.svg

# Filters (optional)
# search: kyc
# ai_types: [NLP]
# business_lines: [Wealth Management, Investment Bank]
# functions: [Research]

# Blob storage for signed demo links.
# Prefer the AZURE_STORAGE_* environment variables for the key.
# storage_account: demoaccount
# storage_container: demos
# storage_key: ""
link_validity: 3600

# Output styling
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &Path) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}
