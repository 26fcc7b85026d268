pub mod verifier;

pub use verifier::{Credential, CredentialVerifier, Verification};
