//! SQL text for the credential lookup.
//! Both the SQLite and MySQL backends accept `?` placeholders.

use super::models::UserTable;

/// Build the read-only lookup statement for `table`.
///
/// Only validated identifiers end up in the text; login and secret are
/// always bound as the two `?` parameters, in that order.
pub fn lookup_query(table: &UserTable) -> String {
    format!(
        "SELECT {name} FROM {table} WHERE {login} = ? AND {secret} = ?",
        name = table.display_name_column,
        table = table.name,
        login = table.login_column,
        secret = table.secret_column,
    )
}
