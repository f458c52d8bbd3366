//! Secret handling utilities.
//!
//! Re-exports secrecy types used for API keys and webhook URLs.

pub use secrecy::{ExposeSecret, SecretString};
