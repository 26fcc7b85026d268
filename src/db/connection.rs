use crate::error::VerifierError;
use sqlx::any::{AnyConnectOptions, install_default_drivers};
use sqlx::{AnyConnection, ConnectOptions, Connection};
use std::ops::{Deref, DerefMut};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// A connection owned by exactly one verification call.
///
/// Prefer [`ScopedConnection::close`]; dropping the handle also releases the
/// underlying socket or file, just without waiting for the shutdown.
pub struct ScopedConnection {
    conn: AnyConnection,
    _guard: OpenGuard,
}

/// Keeps the shared open-connection count in step with live handles.
struct OpenGuard(Arc<AtomicUsize>);

impl OpenGuard {
    fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for OpenGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Open a fresh connection to `database_url`, counted in `open`.
pub async fn open(
    database_url: &str,
    open: &Arc<AtomicUsize>,
) -> Result<ScopedConnection, VerifierError> {
    install_default_drivers();

    let opts = AnyConnectOptions::from_str(database_url).map_err(VerifierError::Connection)?;
    let conn = opts.connect().await.map_err(VerifierError::Connection)?;
    let guard = OpenGuard::acquire(open);
    debug!(backend = conn.backend_name(), "datastore connection opened");

    Ok(ScopedConnection {
        conn,
        _guard: guard,
    })
}

impl ScopedConnection {
    /// Gracefully shut the connection down. The handle is released either way.
    pub async fn close(self) -> Result<(), VerifierError> {
        let ScopedConnection { conn, _guard: guard } = self;
        let res = conn.close().await.map_err(VerifierError::Connection);
        drop(guard);
        debug!(ok = res.is_ok(), "datastore connection closed");
        res
    }
}

impl Deref for ScopedConnection {
    type Target = AnyConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl DerefMut for ScopedConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}
