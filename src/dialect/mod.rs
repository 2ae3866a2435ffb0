//! Configuration entry point for query builders.
//!
//! - `config`: client-or-URL configuration
//! - `url`: libSQL URL parsing
//! - `sqlite`: the SQLite adapter, query compiler and introspector

#[cfg(feature = "libsql")]
pub mod config;
pub mod sqlite;
pub mod url;

#[cfg(feature = "libsql")]
pub use config::{DialectConfig, DialectConfigBuilder, UrlConfig};
pub use sqlite::{SqliteAdapter, SqliteIntrospector, SqliteQueryCompiler};
pub use url::{ConnectTarget, ParsedUrl, parse_libsql_url};

#[cfg(feature = "libsql")]
pub use facade::{LibsqlDialect, LibsqlDriver};

#[cfg(feature = "libsql")]
mod facade {
    use tracing::debug;

    use super::config::DialectConfig;
    use super::sqlite::{SqliteAdapter, SqliteIntrospector, SqliteQueryCompiler};
    use crate::client::LibsqlClient;
    use crate::driver::SessionDriver;
    use crate::error::Result;
    use crate::transport::TransportClient;

    /// Driver produced by [`LibsqlDialect::create_driver`].
    pub type LibsqlDriver = SessionDriver<LibsqlClient>;

    /// libSQL dialect: builds the driver and hands out the SQLite components.
    ///
    /// ```rust,no_run
    /// use libsql_dialect::prelude::*;
    ///
    /// # async fn run() -> Result<(), DialectError> {
    /// let dialect = LibsqlDialect::new(DialectConfig::url("file:app.db"));
    /// let driver = dialect.create_driver().await?;
    /// driver.init().await?;
    /// let mut conn = driver.acquire_connection().await?;
    /// conn.execute_query(&CompiledQuery::raw("SELECT 1")).await?;
    /// driver.release_connection(conn).await?;
    /// driver.destroy().await?;
    /// # Ok(())
    /// # }
    /// ```
    #[derive(Debug, Clone)]
    pub struct LibsqlDialect {
        config: DialectConfig,
    }

    impl LibsqlDialect {
        #[must_use]
        pub fn new(config: DialectConfig) -> Self {
            Self { config }
        }

        #[must_use]
        pub fn config(&self) -> &DialectConfig {
            &self.config
        }

        /// Build the driver.
        ///
        /// A configured client is borrowed and stays open after the driver is destroyed.
        /// A URL is parsed, its `authToken` parameter taking precedence over the separate
        /// token, and the client opened from it is owned by the driver.
        ///
        /// # Errors
        ///
        /// [`crate::DialectError::Configuration`] for an unusable URL (before any I/O), or
        /// the libsql error when opening the client fails.
        pub async fn create_driver(&self) -> Result<LibsqlDriver> {
            match &self.config {
                DialectConfig::Client(client) => {
                    debug!(transport = %client.kind(), "using caller-supplied libsql client");
                    Ok(SessionDriver::borrowed(client.clone()))
                }
                DialectConfig::Url(url_config) => {
                    let (target, auth_token) = url_config.resolve()?;
                    let client = LibsqlClient::open(&target, auth_token).await?;
                    Ok(SessionDriver::owned(client))
                }
            }
        }

        #[must_use]
        pub fn create_adapter(&self) -> SqliteAdapter {
            SqliteAdapter
        }

        #[must_use]
        pub fn create_query_compiler(&self) -> SqliteQueryCompiler {
            SqliteQueryCompiler
        }

        #[must_use]
        pub fn create_introspector<'d>(
            &self,
            driver: &'d LibsqlDriver,
        ) -> SqliteIntrospector<'d, LibsqlDriver> {
            SqliteIntrospector::new(driver)
        }
    }
}
