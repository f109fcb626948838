use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use thiserror::Error;

pub const SAS_VERSION: &str = "2021-08-06";
pub const DEFAULT_VALIDITY_SECS: i64 = 60 * 60;

pub const ENV_ACCOUNT_NAME: &str = "AZURE_STORAGE_ACCOUNT_NAME";
pub const ENV_ACCOUNT_KEY: &str = "AZURE_STORAGE_ACCOUNT_KEY";
pub const ENV_CONTAINER_NAME: &str = "AZURE_STORAGE_CONTAINER_NAME";

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("missing storage configuration: {}", .missing.join(", "))]
    MissingConfig { missing: Vec<&'static str> },

    #[error("storage account key is not valid base64: {source}")]
    InvalidKey {
        #[source]
        source: base64::DecodeError,
    },

    #[error("link validity {seconds}s puts the expiry out of range")]
    ExpiryOutOfRange { seconds: i64 },

    #[error("invalid blob name '{blob}'")]
    InvalidBlobName { blob: String },

    #[error("invalid blob url for account '{account}': {reason}")]
    InvalidUrl { account: String, reason: String },

    #[error("signing unavailable: {reason}")]
    Unavailable { reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues time-limited read links for private blobs.
pub trait UrlSigner: Send + Sync {
    fn sign(&self, blob: &str) -> Result<SignedUrl, SigningError>;
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct StorageCredentials {
    pub account: Option<String>,
    pub key: Option<String>,
    pub container: Option<String>,
}

impl std::fmt::Debug for StorageCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageCredentials")
            .field("account", &self.account)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("container", &self.container)
            .finish()
    }
}

impl StorageCredentials {
    pub fn missing(&self) -> Vec<&'static str> {
        let blank = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or_default().is_empty();
        let mut out = Vec::new();
        if blank(&self.account) {
            out.push(ENV_ACCOUNT_NAME);
        }
        if blank(&self.key) {
            out.push(ENV_ACCOUNT_KEY);
        }
        if blank(&self.container) {
            out.push(ENV_CONTAINER_NAME);
        }
        out
    }
}

/// Blob service SAS signer (read permission, HTTPS blob endpoint).
#[derive(Clone)]
pub struct SasSigner {
    account: String,
    key: Vec<u8>,
    container: String,
    validity: Duration,
}

impl std::fmt::Debug for SasSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SasSigner")
            .field("account", &self.account)
            .field("container", &self.container)
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

impl SasSigner {
    pub fn from_credentials(credentials: &StorageCredentials) -> Result<Self, SigningError> {
        let missing = credentials.missing();
        if !missing.is_empty() {
            return Err(SigningError::MissingConfig { missing });
        }
        let field = |v: &Option<String>| v.as_deref().unwrap_or_default().trim().to_string();
        let key = BASE64
            .decode(field(&credentials.key))
            .map_err(|e| SigningError::InvalidKey { source: e })?;
        Ok(Self {
            account: field(&credentials.account),
            key,
            container: field(&credentials.container),
            validity: Duration::seconds(DEFAULT_VALIDITY_SECS),
        })
    }

    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    fn string_to_sign(&self, blob: &str, expiry: &str) -> String {
        let canonical = format!("/blob/{}/{}/{}", self.account, self.container, blob);
        [
            "r",
            "",
            expiry,
            canonical.as_str(),
            "",
            "",
            "",
            SAS_VERSION,
            "b",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
        ]
        .join("\n")
    }

    fn signature(&self, payload: &str) -> Result<String, SigningError> {
        // HMAC accepts keys of any length, including empty ones.
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.key).map_err(|e| {
            SigningError::Unavailable {
                reason: e.to_string(),
            }
        })?;
        mac.update(payload.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }

    pub fn sign_at(&self, blob: &str, now: DateTime<Utc>) -> Result<SignedUrl, SigningError> {
        let blob = blob.trim().trim_start_matches('/');
        if blob.is_empty() {
            return Err(SigningError::InvalidBlobName {
                blob: blob.to_string(),
            });
        }

        let expires_at = now
            .checked_add_signed(self.validity)
            .ok_or(SigningError::ExpiryOutOfRange {
                seconds: self.validity.num_seconds(),
            })?;
        let expiry = expires_at.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let sig = self.signature(&self.string_to_sign(blob, &expiry))?;

        let invalid_url = |reason: String| SigningError::InvalidUrl {
            account: self.account.clone(),
            reason,
        };
        let mut url =
            reqwest::Url::parse(&format!("https://{}.blob.core.windows.net/", self.account))
                .map_err(|e| invalid_url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid_url("url cannot carry a path".to_string()))?
            .pop_if_empty()
            .push(&self.container)
            .extend(blob.split('/'));
        url.query_pairs_mut()
            .append_pair("se", &expiry)
            .append_pair("sp", "r")
            .append_pair("sv", SAS_VERSION)
            .append_pair("sr", "b")
            .append_pair("sig", &sig);

        Ok(SignedUrl {
            url: url.to_string(),
            expires_at,
        })
    }
}

impl UrlSigner for SasSigner {
    fn sign(&self, blob: &str) -> Result<SignedUrl, SigningError> {
        self.sign_at(blob, Utc::now())
    }
}

/// Stand-in used when credentials are absent or unusable; every request
/// fails with the original configuration error.
#[derive(Clone, Debug)]
pub struct DisabledSigner {
    reason: String,
}

impl DisabledSigner {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl UrlSigner for DisabledSigner {
    fn sign(&self, _blob: &str) -> Result<SignedUrl, SigningError> {
        Err(SigningError::Unavailable {
            reason: self.reason.clone(),
        })
    }
}

pub fn signer_from_credentials(
    credentials: &StorageCredentials,
    validity: Duration,
) -> Box<dyn UrlSigner> {
    match SasSigner::from_credentials(credentials) {
        Ok(signer) => Box::new(signer.with_validity(validity)),
        Err(e) => {
            tracing::warn!(error = %e, "demo links will not be signed");
            Box::new(DisabledSigner::new(e.to_string()))
        }
    }
}
