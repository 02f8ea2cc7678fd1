//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `SITE_BASE_URL` - Base URL the pages are served from (default: `http://localhost:8000/`)
//! - `SITE_HOME_PAGE` - Home page, relative to the base (default: `mochileros_viajeros.html`)
//! - `SITE_LOGIN_PAGE` - Login/registration page (default: `acceso.html`)
//! - `SITE_CONFIRMATION_PAGE` - Purchase confirmation page (default: `compra.html`)
//! - `SITE_STORAGE_PATH` - File backing durable storage (default: `.mochileros/local_storage.json`)
//! - `CAROUSEL_INTERVAL_MS` - Time between automatic slide advances (default: 3000)
//! - `REDIRECT_DELAY_MS` - Delay before redirecting after registration (default: 1200)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/";
const DEFAULT_HOME_PAGE: &str = "mochileros_viajeros.html";
const DEFAULT_LOGIN_PAGE: &str = "acceso.html";
const DEFAULT_CONFIRMATION_PAGE: &str = "compra.html";
const DEFAULT_STORAGE_PATH: &str = ".mochileros/local_storage.json";
const DEFAULT_CAROUSEL_INTERVAL_MS: u64 = 3000;
const DEFAULT_REDIRECT_DELAY_MS: u64 = 1200;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Base URL every page is resolved against
    pub base_url: Url,
    /// Landing page; logout and refused entries go here
    pub home_url: Url,
    /// Page holding the login and registration forms
    pub login_url: Url,
    /// Purchase confirmation page
    pub confirmation_url: Url,
    /// File backing durable storage
    pub storage_path: PathBuf,
    /// Time between automatic slide advances
    pub carousel_interval: Duration,
    /// Delay before redirecting after a registration
    pub redirect_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let base_url = parse_url(
            "SITE_BASE_URL",
            &env.or_default("SITE_BASE_URL", DEFAULT_BASE_URL),
        )?;
        let home_url = env.page(&base_url, "SITE_HOME_PAGE", DEFAULT_HOME_PAGE)?;
        let login_url = env.page(&base_url, "SITE_LOGIN_PAGE", DEFAULT_LOGIN_PAGE)?;
        let confirmation_url =
            env.page(&base_url, "SITE_CONFIRMATION_PAGE", DEFAULT_CONFIRMATION_PAGE)?;

        Ok(Self {
            home_url,
            login_url,
            confirmation_url,
            storage_path: PathBuf::from(env.or_default("SITE_STORAGE_PATH", DEFAULT_STORAGE_PATH)),
            carousel_interval: env.millis("CAROUSEL_INTERVAL_MS", DEFAULT_CAROUSEL_INTERVAL_MS)?,
            redirect_delay: env.millis("REDIRECT_DELAY_MS", DEFAULT_REDIRECT_DELAY_MS)?,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            base_url,
        })
    }

    /// Whether `current` is the login page, ignoring query and fragment.
    #[must_use]
    pub fn is_login_page(&self, current: &Url) -> bool {
        current.path() == self.login_url.path()
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_url(DEFAULT_BASE_URL),
            home_url: default_url(&format!("{DEFAULT_BASE_URL}{DEFAULT_HOME_PAGE}")),
            login_url: default_url(&format!("{DEFAULT_BASE_URL}{DEFAULT_LOGIN_PAGE}")),
            confirmation_url: default_url(&format!("{DEFAULT_BASE_URL}{DEFAULT_CONFIRMATION_PAGE}")),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            carousel_interval: Duration::from_millis(DEFAULT_CAROUSEL_INTERVAL_MS),
            redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a duration given in milliseconds. Zero is rejected.
    fn millis(&self, key: &str, default: u64) -> Result<Duration, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(Duration::from_millis(default));
        };
        match raw.trim().parse::<u64>() {
            Ok(0) => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must be greater than zero".to_string(),
            )),
            Ok(ms) => Ok(Duration::from_millis(ms)),
            Err(e) => Err(ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        }
    }

    /// Resolve a page against the base URL.
    fn page(&self, base: &Url, key: &str, default: &str) -> Result<Url, ConfigError> {
        let page = self.or_default(key, default);
        base.join(&page)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    // A base without a trailing slash would drop its last segment on join.
    let value = if value.ends_with('/') {
        value.to_string()
    } else {
        format!("{value}/")
    };
    Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

// Only called with compile-time constants.
fn default_url(value: &str) -> Url {
    Url::parse(value).expect("Invalid default URL")
}
