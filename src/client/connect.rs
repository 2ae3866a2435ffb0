use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::client::session::LibsqlSession;
use crate::dialect::url::ConnectTarget;
use crate::error::{DialectError, Result};
use crate::transport::{TransportClient, TransportKind};

/// Transport client over a `libsql::Database`.
///
/// Cloning is cheap and every clone refers to the same database, so a caller can hand a
/// clone to the dialect and keep using its own copy. [`TransportClient::close`] drops the
/// database for every clone; sessions opened before the close keep working until they
/// are released.
#[derive(Clone)]
pub struct LibsqlClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    kind: TransportKind,
    db: RwLock<Option<libsql::Database>>,
}

impl std::fmt::Debug for LibsqlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibsqlClient")
            .field("kind", &self.inner.kind)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl LibsqlClient {
    /// Wrap an already built database.
    #[must_use]
    pub fn from_database(db: libsql::Database, kind: TransportKind) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                kind,
                db: RwLock::new(Some(db)),
            }),
        }
    }

    /// Open (or create) an embedded database at `path`.
    ///
    /// # Errors
    ///
    /// Returns the libsql error if the database cannot be opened.
    pub async fn open_local(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let db = libsql::Builder::new_local(path.as_str()).build().await?;
        debug!(%path, "opened embedded libsql database");
        Ok(Self::from_database(db, TransportKind::Embedded))
    }

    /// Connect to a Hrana server at an `http`/`https` endpoint.
    ///
    /// # Errors
    ///
    /// Returns the libsql error if the client cannot be built.
    pub async fn open_remote(
        url: impl Into<String>,
        auth_token: Option<String>,
        kind: TransportKind,
    ) -> Result<Self> {
        let db = libsql::Builder::new_remote(url.into(), auth_token.unwrap_or_default())
            .build()
            .await?;
        debug!(transport = %kind, "opened remote libsql client");
        Ok(Self::from_database(db, kind))
    }

    /// Open whatever `target` names.
    ///
    /// # Errors
    ///
    /// See [`LibsqlClient::open_local`] and [`LibsqlClient::open_remote`].
    pub async fn open(target: &ConnectTarget, auth_token: Option<String>) -> Result<Self> {
        match target {
            ConnectTarget::Local { path } => Self::open_local(path.clone()).await,
            ConnectTarget::Remote { kind, url } => {
                Self::open_remote(url.clone(), auth_token, *kind).await
            }
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.read_db().is_none()
    }

    fn read_db(&self) -> RwLockReadGuard<'_, Option<libsql::Database>> {
        match self.inner.db.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_db(&self) -> RwLockWriteGuard<'_, Option<libsql::Database>> {
        match self.inner.db.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn connect(&self) -> Result<libsql::Connection> {
        let guard = self.read_db();
        let db = guard.as_ref().ok_or(DialectError::ClientClosed)?;
        Ok(db.connect()?)
    }
}

#[async_trait]
impl TransportClient for LibsqlClient {
    type Session = LibsqlSession;

    fn kind(&self) -> TransportKind {
        self.inner.kind
    }

    async fn open_session(&self) -> Result<LibsqlSession> {
        let conn = self.connect()?;
        Ok(LibsqlSession::new(conn, self.inner.kind))
    }

    async fn close(&self) -> Result<()> {
        let db = self.write_db().take();
        if db.is_some() {
            debug!(transport = %self.inner.kind, "libsql database closed");
        }
        Ok(())
    }
}
