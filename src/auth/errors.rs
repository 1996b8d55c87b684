//! auth::errors
//!
//! Credential resolution error types.
//!
//! # Design
//!
//! Error messages MUST NOT contain tokens or passwords. Variants carry
//! only the context needed to tell the operator what to fix.
//!
//! # Example
//!
//! ```
//! use ghexport::auth::AuthError;
//!
//! let err = AuthError::MissingPassword("octocat".to_string());
//! assert!(err.to_string().contains("octocat"));
//! ```

use thiserror::Error;

/// Errors from resolving credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A username was given but no password could be obtained.
    #[error("no password for user '{0}'. Pass --password or set GITHUB_PASSWORD.")]
    MissingPassword(String),

    /// Reading the password from the terminal failed.
    #[error("failed to read password: {0}")]
    Prompt(String),
}
