//! Client configuration loaded via OrthoConfig.

use std::sync::Arc;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::ports::Notifier;
use crate::domain::SessionContext;
use crate::outbound::ReqwestTransport;
use crate::query::{DEFAULT_FRESH_FOR, Hooks, QueryCache};

/// Backend origin used when none is configured.
pub const DEFAULT_API_URL: &str = "https://asideka-core-service-310046503952.us-central1.run.app";

/// `User-Agent` sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("asideka-client/", env!("CARGO_PKG_VERSION"));

/// Errors raised while loading settings or wiring the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Layered configuration could not be read.
    #[error("failed to load client settings: {message}")]
    Load {
        /// Loader message.
        message: String,
    },
    /// The configured API URL does not parse.
    #[error("invalid API URL {url:?}: {reason}")]
    InvalidUrl {
        /// Rejected value.
        url: String,
        /// Parser message.
        reason: String,
    },
    /// The configured API URL is not HTTP(S).
    #[error("API URL must use http or https, got {scheme:?}")]
    UnsupportedScheme {
        /// Rejected scheme.
        scheme: String,
    },
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {message}")]
    Transport {
        /// Builder message.
        message: String,
    },
}

/// Settings controlling where and how the client talks to the backend.
///
/// Read from `ASIDEKA_API_URL`, `ASIDEKA_USER_AGENT` and
/// `ASIDEKA_CACHE_FRESH_SECS`. Unset values fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ASIDEKA")]
pub struct ClientSettings {
    /// Backend origin override.
    pub api_url: Option<String>,
    /// `User-Agent` override.
    pub user_agent: Option<String>,
    /// Query freshness window in seconds.
    pub cache_fresh_secs: Option<u64>,
}

impl ClientSettings {
    /// Load settings from the environment and configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a source is malformed.
    pub fn from_environment() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("asideka")]).map_err(|error| {
            ConfigError::Load {
                message: error.to_string(),
            }
        })
    }

    /// Validated backend origin.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] or
    /// [`ConfigError::UnsupportedScheme`] for unusable values.
    pub fn api_url(&self) -> Result<Url, ConfigError> {
        let raw = self.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        let url = Url::parse(raw).map_err(|error| ConfigError::InvalidUrl {
            url: raw.to_owned(),
            reason: error.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::UnsupportedScheme {
                scheme: other.to_owned(),
            }),
        }
    }

    /// Configured `User-Agent`, falling back to the crate default.
    pub fn user_agent(&self) -> &str {
        self.user_agent
            .as_deref()
            .filter(|agent| !agent.trim().is_empty())
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Query freshness window, falling back to 30 seconds.
    pub fn cache_fresh_for(&self) -> Duration {
        self.cache_fresh_secs
            .map_or(DEFAULT_FRESH_FOR, Duration::from_secs)
    }

    /// Build hooks over a real HTTP transport using these settings.
    ///
    /// # Errors
    ///
    /// Returns URL validation failures and [`ConfigError::Transport`] when
    /// the HTTP client cannot be built.
    pub fn connect(
        &self,
        session: SessionContext,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Hooks, ConfigError> {
        let base = self.api_url()?;
        let transport =
            ReqwestTransport::new(&base, self.user_agent()).map_err(|error| {
                ConfigError::Transport {
                    message: error.to_string(),
                }
            })?;
        let cache = Arc::new(QueryCache::new(
            Arc::new(mockable::DefaultClock),
            self.cache_fresh_for(),
        ));
        Ok(Hooks::connect(Arc::new(transport), session, cache, notifier))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for client configuration parsing.

    use super::*;

    use env_lock::lock_env;
    use rstest::rstest;

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("ASIDEKA_API_URL", None::<String>),
            ("ASIDEKA_USER_AGENT", None::<String>),
            ("ASIDEKA_CACHE_FRESH_SECS", None::<String>),
        ]);

        let settings = ClientSettings::from_environment().expect("config should load");
        assert_eq!(
            settings.api_url().expect("default URL is valid").as_str(),
            "https://asideka-core-service-310046503952.us-central1.run.app/"
        );
        assert_eq!(settings.user_agent(), DEFAULT_USER_AGENT);
        assert_eq!(settings.cache_fresh_for(), Duration::from_secs(30));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("ASIDEKA_API_URL", Some("http://localhost:8080".to_owned())),
            ("ASIDEKA_USER_AGENT", Some("asideka-tests".to_owned())),
            ("ASIDEKA_CACHE_FRESH_SECS", Some("5".to_owned())),
        ]);

        let settings = ClientSettings::from_environment().expect("config should load");
        assert_eq!(
            settings.api_url().expect("valid URL").as_str(),
            "http://localhost:8080/"
        );
        assert_eq!(settings.user_agent(), "asideka-tests");
        assert_eq!(settings.cache_fresh_for(), Duration::from_secs(5));
    }

    #[rstest]
    #[case("ftp://files.example.test", ConfigError::UnsupportedScheme { scheme: "ftp".to_owned() })]
    #[case("not a url", ConfigError::InvalidUrl {
        url: "not a url".to_owned(),
        reason: "relative URL without a base".to_owned(),
    })]
    fn unusable_urls_are_rejected(#[case] raw: &str, #[case] expected: ConfigError) {
        let settings = ClientSettings {
            api_url: Some(raw.to_owned()),
            ..ClientSettings::default()
        };
        assert_eq!(settings.api_url(), Err(expected));
    }

    #[rstest]
    fn blank_user_agent_falls_back() {
        let settings = ClientSettings {
            user_agent: Some("  ".to_owned()),
            ..ClientSettings::default()
        };
        assert_eq!(settings.user_agent(), DEFAULT_USER_AGENT);
    }
}
