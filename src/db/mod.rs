//! Database module: connection handling and the users-table query contract.
//!
//! Layout:
//! - `connection.rs`: per-call scoped connections, no pooling
//! - `models.rs`: table identifiers and the matched row
//! - `schema.rs`: SQL text for the lookup

pub mod connection;
pub mod models;
pub mod schema;

pub use connection::{ScopedConnection, open};
pub use models::{UserRecord, UserTable};
pub use schema::lookup_query;
