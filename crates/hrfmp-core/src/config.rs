//! Client configuration.
//!
//! [`FmpConfig`] carries everything the client needs at construction time:
//! the API base URL, the API key and the directory holding previously saved
//! price files. Nothing is hard-coded in the client itself.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{DataError, Result};

/// Default base URL of the FMP API.
pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com/api/";

/// Default directory scanned for saved price files.
pub const DEFAULT_PRICE_DIR: &str = "data/price full/";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "FMP_API_KEY";
/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "FMP_BASE_URL";
/// Environment variable overriding the price directory. An empty value disables the lookup.
pub const ENV_PRICE_DIR: &str = "FMP_PRICE_DIR";

/// Configuration for an FMP client.
#[derive(Clone, PartialEq, Eq)]
pub struct FmpConfig {
    base_url: String,
    api_key: String,
    price_dir: Option<PathBuf>,
}

impl fmt::Debug for FmpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmpConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("price_dir", &self.price_dir)
            .finish()
    }
}

impl FmpConfig {
    /// Create a configuration with the default base URL and price directory.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            price_dir: Some(PathBuf::from(DEFAULT_PRICE_DIR)),
        }
    }

    /// Build a configuration from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    /// `FMP_API_KEY` is required; `FMP_BASE_URL` and `FMP_PRICE_DIR` are optional.
    ///
    /// # Errors
    /// Returns [`DataError::Config`] if the API key is missing or empty.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns [`DataError::Config`] if the API key is missing or empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(ENV_API_KEY)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| DataError::Config(format!("{ENV_API_KEY} is not set")))?;

        let mut config = Self::new(api_key.trim());
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(base_url.trim());
        }
        if let Some(dir) = lookup(ENV_PRICE_DIR) {
            config.price_dir = (!dir.is_empty()).then(|| PathBuf::from(dir));
        }
        Ok(config)
    }

    /// Override the base URL. A trailing slash is added if missing.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    /// Set the directory scanned for saved price files.
    #[must_use]
    pub fn with_price_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.price_dir = Some(dir.into());
        self
    }

    /// Disable the saved price-file lookup.
    #[must_use]
    pub fn without_price_dir(mut self) -> Self {
        self.price_dir = None;
        self
    }

    /// Base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// API key sent as the `apikey` query parameter.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Directory scanned for saved price files, if enabled.
    #[must_use]
    pub fn price_dir(&self) -> Option<&Path> {
        self.price_dir.as_deref()
    }
}
