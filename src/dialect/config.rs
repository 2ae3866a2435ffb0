use serde::{Deserialize, Serialize};

use super::url::{ConnectTarget, parse_libsql_url};
use crate::client::LibsqlClient;
use crate::error::{DialectError, Result};

/// Environment variable read by [`DialectConfig::from_env`] for the database URL.
pub const URL_ENV: &str = "LIBSQL_URL";
/// Environment variable read by [`DialectConfig::from_env`] for the auth token.
pub const AUTH_TOKEN_ENV: &str = "LIBSQL_AUTH_TOKEN";

/// URL-based connection settings, loadable from a config file.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlConfig {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl UrlConfig {
    /// Parse the URL and settle the credential: a token embedded in the URL wins over
    /// `auth_token`.
    ///
    /// # Errors
    ///
    /// See [`parse_libsql_url`].
    pub fn resolve(&self) -> Result<(ConnectTarget, Option<String>)> {
        let parsed = parse_libsql_url(&self.url)?;
        let auth_token = parsed.auth_token.or_else(|| self.auth_token.clone());
        Ok((parsed.target, auth_token))
    }
}

impl std::fmt::Debug for UrlConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlConfig")
            .field("url", &self.url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// How the dialect gets its transport client.
#[derive(Debug, Clone)]
pub enum DialectConfig {
    /// Use a client the caller already opened. The dialect never closes it.
    Client(LibsqlClient),
    /// Open a client from a URL. The driver closes it on destroy.
    Url(UrlConfig),
}

impl DialectConfig {
    #[must_use]
    pub fn client(client: LibsqlClient) -> Self {
        DialectConfig::Client(client)
    }

    pub fn url(url: impl Into<String>) -> Self {
        DialectConfig::Url(UrlConfig {
            url: url.into(),
            auth_token: None,
        })
    }

    pub fn url_with_token(url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        DialectConfig::Url(UrlConfig {
            url: url.into(),
            auth_token: Some(auth_token.into()),
        })
    }

    /// Build a config from independently optional inputs.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::Configuration`] when neither or both of `client` and `url`
    /// are given, or when a token accompanies a client.
    pub fn from_parts(
        client: Option<LibsqlClient>,
        url: Option<String>,
        auth_token: Option<String>,
    ) -> Result<Self> {
        match (client, url) {
            (Some(client), None) => {
                if auth_token.is_some() {
                    return Err(DialectError::Configuration(
                        "authToken only applies together with `url`".to_string(),
                    ));
                }
                Ok(DialectConfig::Client(client))
            }
            (None, Some(url)) => Ok(DialectConfig::Url(UrlConfig { url, auth_token })),
            (Some(_), Some(_)) => Err(DialectError::Configuration(
                "specify either `client` or `url` in the dialect config, not both".to_string(),
            )),
            (None, None) => Err(DialectError::Configuration(
                "please specify either `client` or `url` in the dialect config".to_string(),
            )),
        }
    }

    /// Read [`URL_ENV`] and, optionally, [`AUTH_TOKEN_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::Configuration`] when [`URL_ENV`] is unset or not unicode.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(URL_ENV)
            .map_err(|e| DialectError::Configuration(format!("{URL_ENV}: {e}")))?;
        let auth_token = std::env::var(AUTH_TOKEN_ENV).ok().filter(|t| !t.is_empty());
        Self::from_parts(None, Some(url), auth_token)
    }

    #[must_use]
    pub fn builder() -> DialectConfigBuilder {
        DialectConfigBuilder::default()
    }
}

impl From<UrlConfig> for DialectConfig {
    fn from(config: UrlConfig) -> Self {
        DialectConfig::Url(config)
    }
}

impl From<LibsqlClient> for DialectConfig {
    fn from(client: LibsqlClient) -> Self {
        DialectConfig::Client(client)
    }
}

/// Fluent builder for [`DialectConfig`].
#[derive(Debug, Clone, Default)]
pub struct DialectConfigBuilder {
    client: Option<LibsqlClient>,
    url: Option<String>,
    auth_token: Option<String>,
}

impl DialectConfigBuilder {
    #[must_use]
    pub fn client(mut self, client: LibsqlClient) -> Self {
        self.client = Some(client);
        self
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(auth_token.into());
        self
    }

    /// # Errors
    ///
    /// See [`DialectConfig::from_parts`].
    pub fn build(self) -> Result<DialectConfig> {
        DialectConfig::from_parts(self.client, self.url, self.auth_token)
    }
}
