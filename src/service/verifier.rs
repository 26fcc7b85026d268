use crate::config::Config;
use crate::db::{self, ScopedConnection, UserRecord, lookup_query};
use crate::error::VerifierError;
use sqlx::Row;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// A login/secret pair supplied by a caller. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub login: String,
    secret: String,
}

impl Credential {
    pub fn new(login: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            secret: secret.into(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("login", &self.login)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Outcome of a verification that keeps bad credentials apart from
/// datastore failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Authenticated { display_name: Option<String> },
    Rejected,
    Unavailable,
}

impl Verification {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Verification::Authenticated { .. })
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verification::Authenticated {
                display_name: Some(name),
            } => write!(f, "authenticated ({name})"),
            Verification::Authenticated { display_name: None } => f.write_str("authenticated"),
            Verification::Rejected => f.write_str("rejected"),
            Verification::Unavailable => f.write_str("unavailable"),
        }
    }
}

/// Checks credentials against the users table, one connection per call.
#[derive(Clone)]
pub struct CredentialVerifier {
    database_url: Arc<str>,
    query: Arc<str>,
    open: Arc<AtomicUsize>,
}

impl CredentialVerifier {
    pub fn new(config: &Config) -> Result<Self, VerifierError> {
        config.table.validate()?;
        Ok(Self {
            database_url: Arc::from(config.database_url.as_str()),
            query: Arc::from(lookup_query(&config.table)),
            open: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Number of connections this verifier currently holds open.
    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// Open a new connection with the service-account configuration.
    pub async fn connect(&self) -> Result<ScopedConnection, VerifierError> {
        db::open(&self.database_url, &self.open).await
    }

    /// Run the lookup and surface any datastore error to the caller.
    ///
    /// The connection is closed before returning on every path.
    pub async fn lookup(
        &self,
        login: &str,
        secret: &str,
    ) -> Result<Option<UserRecord>, VerifierError> {
        let mut conn = self.connect().await?;

        let fetched = sqlx::query(&self.query)
            .bind(login)
            .bind(secret)
            .persistent(false)
            .fetch_optional(&mut *conn)
            .await;

        if let Err(e) = conn.close().await {
            warn!(error = %e, "failed to close datastore connection cleanly");
        }

        let Some(row) = fetched.map_err(VerifierError::Query)? else {
            return Ok(None);
        };
        // A matched row authenticates even when the name column is not text.
        let display_name = row
            .try_get::<Option<String>, _>(0)
            .inspect_err(|e| warn!(error = %e, "display name column did not decode as text"))
            .unwrap_or(None);
        Ok(Some(UserRecord { display_name }))
    }

    /// Tri-state verification. Datastore errors become `Unavailable`.
    pub async fn verify_detailed(&self, login: &str, secret: &str) -> Verification {
        match self.lookup(login, secret).await {
            Ok(Some(record)) => {
                debug!(login, "credentials accepted");
                Verification::Authenticated {
                    display_name: record.display_name,
                }
            }
            Ok(None) => {
                debug!(login, "credentials rejected");
                Verification::Rejected
            }
            Err(e) => {
                debug!(login, "credential lookup did not complete");
                warn!(error = %e, "credential verification failed");
                Verification::Unavailable
            }
        }
    }

    /// `true` only when a row matches both login and secret.
    ///
    /// Any datastore failure also yields `false`; use
    /// [`verify_detailed`](Self::verify_detailed) to tell the two apart.
    pub async fn verify(&self, login: &str, secret: &str) -> bool {
        self.verify_detailed(login, secret).await.is_authenticated()
    }

    pub async fn verify_credential_detailed(&self, credential: &Credential) -> Verification {
        self.verify_detailed(&credential.login, credential.secret())
            .await
    }
}

impl fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("query", &self.query)
            .field("open_connections", &self.open_connections())
            .finish_non_exhaustive()
    }
}
