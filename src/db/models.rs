use crate::error::VerifierError;
use serde::{Deserialize, Serialize};

/// Table and column names of the externally owned users table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserTable {
    pub name: String,
    pub login_column: String,
    pub secret_column: String,
    pub display_name_column: String,
}

impl Default for UserTable {
    fn default() -> Self {
        Self {
            name: "usuarios".to_string(),
            login_column: "login".to_string(),
            secret_column: "senha".to_string(),
            display_name_column: "nome".to_string(),
        }
    }
}

impl UserTable {
    /// Reject any name that is not a plain SQL identifier.
    pub fn validate(&self) -> Result<(), VerifierError> {
        [
            &self.name,
            &self.login_column,
            &self.secret_column,
            &self.display_name_column,
        ]
        .into_iter()
        .try_for_each(|ident| {
            if is_identifier(ident) {
                Ok(())
            } else {
                Err(VerifierError::InvalidIdentifier(ident.clone()))
            }
        })
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The matched row; only the display name is read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_valid() {
        assert!(UserTable::default().validate().is_ok());
    }

    #[test]
    fn rejects_injected_table_name() {
        let table = UserTable {
            name: "usuarios; DROP TABLE usuarios".to_string(),
            ..UserTable::default()
        };
        match table.validate() {
            Err(VerifierError::InvalidIdentifier(name)) => {
                assert_eq!(name, "usuarios; DROP TABLE usuarios")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn identifier_rules() {
        assert!(is_identifier("_users2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2users"));
        assert!(!is_identifier("nome\""));
        assert!(!is_identifier("user name"));
    }
}
