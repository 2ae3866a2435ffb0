use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::connection::{DatabaseConnection, SessionConnection};
use crate::error::{DialectError, Result};
use crate::transport::TransportClient;

/// Driver contract consumed by the query builder.
#[async_trait]
pub trait Driver: Send + Sync {
    type Connection: DatabaseConnection;

    /// Warm-up hook, called once before the first connection is acquired.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::DriverDestroyed`] after [`Driver::destroy`].
    async fn init(&self) -> Result<()>;

    /// # Errors
    ///
    /// Returns [`DialectError::DriverDestroyed`] after [`Driver::destroy`], or the
    /// transport's failure to open a session.
    async fn acquire_connection(&self) -> Result<Self::Connection>;

    /// # Errors
    ///
    /// See [`SessionConnection::begin_transaction`].
    async fn begin_transaction(&self, connection: &mut Self::Connection) -> Result<()>;

    /// # Errors
    ///
    /// See [`SessionConnection::commit_transaction`].
    async fn commit_transaction(&self, connection: &mut Self::Connection) -> Result<()>;

    /// # Errors
    ///
    /// See [`SessionConnection::rollback_transaction`].
    async fn rollback_transaction(&self, connection: &mut Self::Connection) -> Result<()>;

    /// # Errors
    ///
    /// Returns the transport's failure to close the session.
    async fn release_connection(&self, connection: Self::Connection) -> Result<()>;

    /// Tear the driver down. Safe to call more than once.
    ///
    /// # Errors
    ///
    /// Returns the transport's failure to close an owned client.
    async fn destroy(&self) -> Result<()>;
}

/// Who is responsible for closing the transport client.
#[derive(Debug)]
pub enum ClientHandle<C> {
    /// Built by this crate from a URL; closed on destroy.
    Owned(C),
    /// Supplied by the caller; never closed here.
    Borrowed(C),
}

impl<C> ClientHandle<C> {
    #[must_use]
    pub fn get(&self) -> &C {
        match self {
            ClientHandle::Owned(client) | ClientHandle::Borrowed(client) => client,
        }
    }

    #[must_use]
    pub fn is_owned(&self) -> bool {
        matches!(self, ClientHandle::Owned(_))
    }
}

/// Driver lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Uninitialized,
    Ready,
    Destroyed,
}

/// [`Driver`] over any [`TransportClient`]: one session per acquired connection.
#[derive(Debug)]
pub struct SessionDriver<C: TransportClient> {
    client: ClientHandle<C>,
    state: Mutex<DriverState>,
}

impl<C: TransportClient> SessionDriver<C> {
    #[must_use]
    pub fn new(client: ClientHandle<C>) -> Self {
        Self {
            client,
            state: Mutex::new(DriverState::Uninitialized),
        }
    }

    /// Driver that closes `client` on destroy.
    #[must_use]
    pub fn owned(client: C) -> Self {
        Self::new(ClientHandle::Owned(client))
    }

    /// Driver that leaves `client` open on destroy.
    #[must_use]
    pub fn borrowed(client: C) -> Self {
        Self::new(ClientHandle::Borrowed(client))
    }

    #[must_use]
    pub fn client(&self) -> &C {
        self.client.get()
    }

    #[must_use]
    pub fn owns_client(&self) -> bool {
        self.client.is_owned()
    }

    #[must_use]
    pub fn state(&self) -> DriverState {
        *self.lock_state()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, DriverState> {
        // No code path panics while holding the guard; recover the value if one ever does.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn ensure_live(&self) -> Result<()> {
        if *self.lock_state() == DriverState::Destroyed {
            return Err(DialectError::DriverDestroyed);
        }
        Ok(())
    }
}

#[async_trait]
impl<C: TransportClient> Driver for SessionDriver<C> {
    type Connection = SessionConnection<C::Session>;

    async fn init(&self) -> Result<()> {
        let mut state = self.lock_state();
        match *state {
            DriverState::Destroyed => Err(DialectError::DriverDestroyed),
            DriverState::Uninitialized | DriverState::Ready => {
                *state = DriverState::Ready;
                debug!(transport = %self.client().kind(), "driver initialized");
                Ok(())
            }
        }
    }

    async fn acquire_connection(&self) -> Result<Self::Connection> {
        self.ensure_live()?;
        let session = self.client().open_session().await?;
        debug!(transport = %self.client().kind(), "connection acquired");
        Ok(SessionConnection::new(session))
    }

    async fn begin_transaction(&self, connection: &mut Self::Connection) -> Result<()> {
        connection.begin_transaction().await
    }

    async fn commit_transaction(&self, connection: &mut Self::Connection) -> Result<()> {
        connection.commit_transaction().await
    }

    async fn rollback_transaction(&self, connection: &mut Self::Connection) -> Result<()> {
        connection.rollback_transaction().await
    }

    async fn release_connection(&self, connection: Self::Connection) -> Result<()> {
        connection.release().await?;
        debug!("connection released");
        Ok(())
    }

    async fn destroy(&self) -> Result<()> {
        {
            let mut state = self.lock_state();
            if *state == DriverState::Destroyed {
                debug!("driver already destroyed");
                return Ok(());
            }
            *state = DriverState::Destroyed;
        }
        match &self.client {
            ClientHandle::Owned(client) => {
                client.close().await?;
                info!(transport = %client.kind(), "closed owned transport client");
            }
            ClientHandle::Borrowed(_) => {
                debug!("leaving caller-supplied transport client open");
            }
        }
        Ok(())
    }
}
