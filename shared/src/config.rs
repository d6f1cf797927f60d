use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const API_URL_ENV: &str = "RETINACARE_API_URL";

const UPLOADS_SEGMENT: &str = "uploads";
const PROCESSED_SEGMENT: &str = "processed";

/// Backend root, validated once and stored without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Empty);
        }

        let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
            url: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        let scheme = parsed.scheme().to_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::UnsupportedScheme(scheme));
        }

        if parsed.host_str().is_none() {
            return Err(ConfigError::MissingHost(trimmed.to_string()));
        }

        Ok(Self(parsed.as_str().trim_end_matches('/').to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins an absolute API path such as `/history/3`.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self(DEFAULT_API_URL.to_string())
    }
}

impl std::fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: BaseUrl,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: BaseUrl::parse(base_url)?,
        })
    }

    /// Unset or blank falls back to the local development backend.
    pub fn from_env_value(value: Option<&str>) -> Result<Self, ConfigError> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Self::new(v),
            _ => Ok(Self::default()),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_value(std::env::var(API_URL_ENV).ok().as_deref())
    }

    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        self.base_url.join(path)
    }

    /// URL of an image the backend stored under `image_path`.
    #[must_use]
    pub fn asset_url(&self, image_path: &str) -> String {
        self.base_url.join(image_path)
    }

    /// The backend writes the preprocessed scan next to the upload, swapping the
    /// first `uploads` segment for `processed`.
    #[must_use]
    pub fn processed_asset_url(&self, image_path: &str) -> String {
        self.asset_url(&image_path.replacen(UPLOADS_SEGMENT, PROCESSED_SEGMENT, 1))
    }
}
