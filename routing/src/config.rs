use std::{env, fmt};

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

/// Where the routing provider lives and how to authenticate against it.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    base_url: String,
    api_key: String,
    language: Option<String>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("language", &self.language)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            language: None,
        }
    }

    /// Reads `ORS_API_KEY` (required), `ORS_BASE_URL` and `ORS_LANGUAGE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("ORS_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key.trim());
        if let Some(url) = lookup("ORS_BASE_URL") {
            reqwest::Url::parse(&url).map_err(|err| ConfigError::InvalidBaseUrl {
                url: url.clone(),
                reason: err.to_string(),
            })?;
            config = config.with_base_url(url);
        }
        if let Some(language) = lookup("ORS_LANGUAGE").filter(|l| !l.trim().is_empty()) {
            config = config.with_language(language.trim());
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
