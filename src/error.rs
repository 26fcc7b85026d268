use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum VerifierError {
    #[error("Datastore connection error: {0}")]
    Connection(#[source] SqlxError),

    #[error("Datastore query error: {0}")]
    Query(#[source] SqlxError),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),
}

impl VerifierError {
    /// True for failures of the datastore itself rather than of local setup.
    pub fn is_datastore(&self) -> bool {
        matches!(self, VerifierError::Connection(_) | VerifierError::Query(_))
    }
}

impl From<figment::Error> for VerifierError {
    fn from(e: figment::Error) -> Self {
        VerifierError::Config(Box::new(e))
    }
}
