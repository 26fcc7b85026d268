//! Runtime configuration, loaded from `VERIFIER_*` environment variables.
//!
//! Nested keys use `__`, e.g. `VERIFIER_TABLE__NAME=users`.

use crate::db::UserTable;
use crate::error::VerifierError;
use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::Deserialize;
use std::fmt;
use url::Url;

pub const ENV_PREFIX: &str = "VERIFIER_";

#[derive(Clone, Deserialize)]
pub struct Config {
    /// Datastore URL, including the service-account credentials.
    pub database_url: String,
    pub loglevel: String,
    pub table: UserTable,
}

fn default_loglevel() -> String {
    "info".to_string()
}

impl Config {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            loglevel: default_loglevel(),
            table: UserTable::default(),
        }
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::default("loglevel", default_loglevel()))
            .merge(Serialized::default("table", UserTable::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, VerifierError> {
        Ok(Self::figment().extract()?)
    }

    /// The database URL with any password replaced, safe to log.
    pub fn redacted_database_url(&self) -> String {
        match Url::parse(&self.database_url) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("***"));
                }
                url.to_string()
            }
            Err(_) => "<unparseable>".to_string(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.redacted_database_url())
            .field("loglevel", &self.loglevel)
            .field("table", &self.table)
            .finish()
    }
}
